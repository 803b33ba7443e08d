use std::path::PathBuf;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use tracing::warn;

use crate::elo::EloConfig;

pub const DEFAULT_PLAYERS_PATH: &str = "import/Football_Player_Data-Analysis.csv";
pub const DEFAULT_MATCHES_PATH: &str = "import/Matches.csv";
pub const DEFAULT_START_DATE: &str = "2020-08-01";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub players_path: PathBuf,
    pub matches_path: PathBuf,
    /// Only matches strictly after this date are replayed.
    pub start_date: Option<NaiveDate>,
    pub elo: EloConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            players_path: PathBuf::from(DEFAULT_PLAYERS_PATH),
            matches_path: PathBuf::from(DEFAULT_MATCHES_PATH),
            start_date: parse_date(DEFAULT_START_DATE),
            elo: EloConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable
    /// values keep their defaults.
    pub fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(path) = non_empty(get("GOALMIND_PLAYERS_PATH")) {
            cfg.players_path = PathBuf::from(path);
        }
        if let Some(path) = non_empty(get("GOALMIND_MATCHES_PATH")) {
            cfg.matches_path = PathBuf::from(path);
        }
        if let Some(raw) = get("GOALMIND_START_DATE") {
            match parse_start_date(&raw) {
                Ok(date) => cfg.start_date = date,
                Err(err) => warn!(value = %raw, "ignoring GOALMIND_START_DATE: {err}"),
            }
        }
        if let Some(k) = parse_f64_var(&get, "GOALMIND_ELO_K") {
            cfg.elo.k = k;
        }
        if let Some(adv) = parse_f64_var(&get, "GOALMIND_HOME_ADVANTAGE") {
            cfg.elo.home_adv_pts = adv;
        }
        if let Some(level) = non_empty(get("GOALMIND_LOG")) {
            cfg.log_level = level;
        }
        cfg
    }
}

/// Empty text disables the filter.
pub fn parse_start_date(raw: &str) -> Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_date(trimmed)
        .map(Some)
        .ok_or_else(|| anyhow!("expected YYYY-MM-DD, got {trimmed:?}"))
}

/// Accepts `YYYY-MM-DD`, ignoring any time suffix.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn non_empty(val: Option<String>) -> Option<String> {
    val.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_f64_var<F>(get: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = non_empty(get(key))?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(key, value = %raw, "ignoring non-numeric config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_vars() {
        let cfg = from_map(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.elo.k, 25.0);
        assert_eq!(cfg.elo.home_adv_pts, 40.0);
        assert_eq!(cfg.start_date, NaiveDate::from_ymd_opt(2020, 8, 1));
    }

    #[test]
    fn overrides_and_bad_values() {
        let cfg = from_map(&[
            ("GOALMIND_ELO_K", "32"),
            ("GOALMIND_HOME_ADVANTAGE", "lots"),
            ("GOALMIND_START_DATE", ""),
            ("GOALMIND_MATCHES_PATH", "data/m.csv"),
        ]);
        assert_eq!(cfg.elo.k, 32.0);
        assert_eq!(cfg.elo.home_adv_pts, 40.0);
        assert_eq!(cfg.start_date, None);
        assert_eq!(cfg.matches_path, PathBuf::from("data/m.csv"));
    }

    #[test]
    fn date_with_time_suffix() {
        assert_eq!(
            parse_date("2021-03-14 15:00:00"),
            NaiveDate::from_ymd_opt(2021, 3, 14)
        );
        assert_eq!(parse_date("14/03/2021"), None);
    }
}
