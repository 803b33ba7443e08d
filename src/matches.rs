use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// Actual score from the home side's point of view.
    pub fn home_score(self) -> f64 {
        match self {
            Outcome::Home => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Away => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    home_team_name: String,
    away_team_name: String,
    home_goals: u32,
    away_goals: u32,
    date: Option<NaiveDate>,
}

impl Match {
    pub fn new(
        home_team_name: impl Into<String>,
        away_team_name: impl Into<String>,
        home_goals: u32,
        away_goals: u32,
    ) -> Self {
        Self {
            home_team_name: home_team_name.into(),
            away_team_name: away_team_name.into(),
            home_goals,
            away_goals,
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn home_team_name(&self) -> &str {
        &self.home_team_name
    }

    pub fn away_team_name(&self) -> &str {
        &self.away_team_name
    }

    pub fn home_goals(&self) -> u32 {
        self.home_goals
    }

    pub fn away_goals(&self) -> u32 {
        self.away_goals
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn outcome(&self) -> Outcome {
        if self.home_goals > self.away_goals {
            Outcome::Home
        } else if self.home_goals < self.away_goals {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }

    /// 1.0 home win, 0.0 away win, 0.5 draw.
    pub fn result(&self) -> f64 {
        self.outcome().home_score()
    }
}

/// Matches in registration order. Replay order is exactly this order.
#[derive(Debug, Clone, Default)]
pub struct MatchHistory {
    matches: Vec<Match>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, m: Match) {
        self.matches.push(m);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }
}

impl From<Vec<Match>> for MatchHistory {
    fn from(matches: Vec<Match>) -> Self {
        Self { matches }
    }
}

impl FromIterator<Match> for MatchHistory {
    fn from_iter<I: IntoIterator<Item = Match>>(iter: I) -> Self {
        Self {
            matches: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MatchHistory {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}
