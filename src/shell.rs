use std::io::{self, BufRead, Write};

use crate::app::GoalMind;
use crate::report::ratings_table;

pub const INTRO: &str = "Welcome to GoalMind! Type help or ? to list commands.";
pub const PROMPT: &str = ">> ";

const HELP: &str = "\
Commands:
  searchplayer <player name>          show a player's team, position and goal propensity
  searchteam <team name>              show a team's ELO
  scoreprob \"<player>\" \"<team>\"       probability that a player scores versus a team
  ratings [n]                         top n teams by ELO (default 10)
  help | ?                            this list
  exit | quit                         leave the shell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a> {
    app: &'a GoalMind,
    show_prompt: bool,
}

impl<'a> Shell<'a> {
    pub fn new(app: &'a GoalMind) -> Self {
        Self {
            app,
            show_prompt: true,
        }
    }

    pub fn without_prompt(mut self) -> Self {
        self.show_prompt = false;
        self
    }

    /// Reads commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> io::Result<()> {
        if self.show_prompt {
            writeln!(out, "{INTRO}")?;
        }
        let mut lines = input.lines();
        loop {
            if self.show_prompt {
                write!(out, "{PROMPT}")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            if self.execute(&line?, out)? == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    pub fn execute<W: Write>(&self, line: &str, out: &mut W) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd.to_ascii_lowercase().as_str() {
            "searchplayer" => self.search_player(rest, out)?,
            "searchteam" => self.search_team(rest, out)?,
            "scoreprob" => self.score_prob(rest, out)?,
            "ratings" => self.ratings(rest, out)?,
            "help" | "?" => writeln!(out, "{HELP}")?,
            "exit" | "quit" => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
            _ => writeln!(out, "*** Unknown syntax: {line}")?,
        }
        Ok(Flow::Continue)
    }

    fn search_player<W: Write>(&self, arg: &str, out: &mut W) -> io::Result<()> {
        match self.app.find_player(strip_quotes(arg)) {
            Some(player) => writeln!(out, "{player}"),
            None => writeln!(out, "Player not found!"),
        }
    }

    fn search_team<W: Write>(&self, arg: &str, out: &mut W) -> io::Result<()> {
        match self.app.find_team(strip_quotes(arg)) {
            Some(team) => writeln!(out, "Team found. ELO: {:.2}", team.rating),
            None => writeln!(out, "Team not found!"),
        }
    }

    fn score_prob<W: Write>(&self, arg: &str, out: &mut W) -> io::Result<()> {
        let Some(args) = split_args(arg) else {
            return writeln!(out, "Error: invalid syntax");
        };
        let [player, team] = args.as_slice() else {
            return writeln!(out, "Error: you must provide 2 arguments");
        };
        match self.app.estimate_scoring_probability(player, team) {
            Ok(est) => writeln!(out, "Goal probability: {:.4}", est.probability),
            Err(missing) => writeln!(out, "Error: {missing}"),
        }
    }

    fn ratings<W: Write>(&self, arg: &str, out: &mut W) -> io::Result<()> {
        let n = if arg.is_empty() {
            10
        } else {
            match arg.parse::<usize>() {
                Ok(n) => n,
                Err(_) => return writeln!(out, "Error: expected a number of teams"),
            }
        };
        for row in ratings_table(self.app.teams()).into_iter().take(n) {
            writeln!(out, "{:>3}. {:<28} {:>8.2}", row.rank, row.team, row.rating)?;
        }
        Ok(())
    }
}

fn strip_quotes(arg: &str) -> &str {
    let t = arg.trim();
    t.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(t)
}

/// Whitespace-separated words; single or double quotes group words.
/// Returns `None` on an unterminated quote.
pub fn split_args(raw: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in raw.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => cur.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    out.push(std::mem::take(&mut cur));
                    in_word = false;
                }
            }
            None => {
                cur.push(ch);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return None;
    }
    if in_word {
        out.push(cur);
    }
    Some(out)
}
