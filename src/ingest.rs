//! CSV loaders for match results and player season statistics.
//!
//! Numeric player columns are coerced with a zero default here so the model
//! only ever sees finite floats. Malformed match rows are dropped at this
//! boundary with a warning.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::config::parse_date;
use crate::matches::Match;
use crate::player::{Player, PlayerStats};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub kept: usize,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct MatchRow {
    #[serde(rename = "MatchDate", default)]
    match_date: String,
    #[serde(rename = "HomeTeam", default)]
    home_team: String,
    #[serde(rename = "AwayTeam", default)]
    away_team: String,
    #[serde(rename = "FTHome", default)]
    ft_home: String,
    #[serde(rename = "FTAway", default)]
    ft_away: String,
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    #[serde(rename = "Player Name", default)]
    name: String,
    #[serde(rename = "Player Team", default)]
    team: String,
    #[serde(rename = "Position 1", default)]
    position: String,
    #[serde(rename = "Mins Played", default, deserialize_with = "lenient_f64")]
    mins_played: f64,
    #[serde(rename = "tacklePerGame", default, deserialize_with = "lenient_f64")]
    tackles: f64,
    #[serde(rename = "foulsPerGame", default, deserialize_with = "lenient_f64")]
    fouls: f64,
    #[serde(rename = "interceptionPerGame", default, deserialize_with = "lenient_f64")]
    interceptions: f64,
    #[serde(rename = "xGPerNinety", default, deserialize_with = "lenient_f64")]
    xg_per_90: f64,
    #[serde(rename = "shotsPerGame", default, deserialize_with = "lenient_f64")]
    shots: f64,
    #[serde(rename = "xGPerShot", default, deserialize_with = "lenient_f64")]
    xg_per_shot: f64,
    #[serde(rename = "keyPassPerGame", default, deserialize_with = "lenient_f64")]
    key_passes: f64,
    #[serde(rename = "dribbleWonPerGame", default, deserialize_with = "lenient_f64")]
    dribbles_won: f64,
    #[serde(rename = "rating", default, deserialize_with = "lenient_f64")]
    rating: f64,
    #[serde(rename = "goal", default, deserialize_with = "lenient_f64")]
    goals: f64,
    #[serde(rename = "assistTotal", default, deserialize_with = "lenient_f64")]
    assists: f64,
}

impl PlayerRow {
    fn into_player(self) -> Option<Player> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let stats = PlayerStats {
            minutes_played: self.mins_played,
            tackles_per_game: self.tackles,
            fouls_per_game: self.fouls,
            interceptions_per_game: self.interceptions,
            xg_per_90: self.xg_per_90,
            shots_per_game: self.shots,
            xg_per_shot: self.xg_per_shot,
            key_passes_per_game: self.key_passes,
            dribbles_won_per_game: self.dribbles_won,
            rating: self.rating,
            goals: self.goals,
            assists: self.assists,
        };
        Some(Player::new(
            name,
            self.team.trim(),
            self.position.trim(),
            stats,
        ))
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(coerce_f64).unwrap_or(0.0))
}

/// Missing, non-numeric or non-finite text becomes 0.0.
pub fn coerce_f64(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Goal counts: integers or integral floats such as "2.0".
pub fn parse_goals(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<u32>() {
        return Some(v);
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Some(v as u32)
    } else {
        None
    }
}

/// Reads matches played strictly after `start_date` (all matches when
/// `None`), sorted chronologically with file order kept for equal dates.
pub fn load_matches_from_reader<R: Read>(
    reader: R,
    start_date: Option<NaiveDate>,
) -> Result<(Vec<Match>, LoadSummary)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut summary = LoadSummary::default();
    let mut out: Vec<Match> = Vec::new();

    for (idx, record) in rdr.deserialize::<MatchRow>().enumerate() {
        summary.rows_read += 1;
        let row = match record {
            Ok(row) => row,
            Err(err) => {
                warn!(row = idx + 1, "unreadable match row: {err}");
                summary.skipped += 1;
                continue;
            }
        };

        let date = parse_date(&row.match_date);
        if let Some(cutoff) = start_date {
            match date {
                Some(d) if d > cutoff => {}
                Some(_) => continue,
                None => {
                    warn!(row = idx + 1, date = %row.match_date, "match date unparseable");
                    summary.skipped += 1;
                    continue;
                }
            }
        }

        let home = row.home_team.trim();
        let away = row.away_team.trim();
        let (Some(hg), Some(ag)) = (parse_goals(&row.ft_home), parse_goals(&row.ft_away)) else {
            warn!(row = idx + 1, home, away, "match goals missing or non-numeric");
            summary.skipped += 1;
            continue;
        };
        if home.is_empty() || away.is_empty() {
            warn!(row = idx + 1, home, away, "match team name missing");
            summary.skipped += 1;
            continue;
        }

        let mut m = Match::new(home, away, hg, ag);
        if let Some(d) = date {
            m = m.with_date(d);
        }
        out.push(m);
    }

    // Stable: equal dates keep file order. Undated rows sort first.
    out.sort_by_key(|m| m.date());
    summary.kept = out.len();
    info!(
        read = summary.rows_read,
        kept = summary.kept,
        skipped = summary.skipped,
        "matches loaded"
    );
    Ok((out, summary))
}

pub fn load_matches_from_path(
    path: &Path,
    start_date: Option<NaiveDate>,
) -> Result<(Vec<Match>, LoadSummary)> {
    let file =
        File::open(path).with_context(|| format!("open matches file {}", path.display()))?;
    load_matches_from_reader(file, start_date)
        .with_context(|| format!("read matches file {}", path.display()))
}

pub fn load_players_from_reader<R: Read>(reader: R) -> Result<(Vec<Player>, LoadSummary)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut summary = LoadSummary::default();
    let mut out = Vec::new();

    for (idx, record) in rdr.deserialize::<PlayerRow>().enumerate() {
        summary.rows_read += 1;
        match record {
            Ok(row) => match row.into_player() {
                Some(player) => out.push(player),
                None => {
                    warn!(row = idx + 1, "player row without a name");
                    summary.skipped += 1;
                }
            },
            Err(err) => {
                warn!(row = idx + 1, "unreadable player row: {err}");
                summary.skipped += 1;
            }
        }
    }

    summary.kept = out.len();
    info!(
        read = summary.rows_read,
        kept = summary.kept,
        skipped = summary.skipped,
        "players loaded"
    );
    Ok((out, summary))
}

pub fn load_players_from_path(path: &Path) -> Result<(Vec<Player>, LoadSummary)> {
    let file =
        File::open(path).with_context(|| format!("open players file {}", path.display()))?;
    load_players_from_reader(file).with_context(|| format!("read players file {}", path.display()))
}
