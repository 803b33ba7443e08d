use std::collections::HashMap;
use std::fmt;

use crate::scoring;

/// Season statistics, already coerced to finite floats by the loader.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStats {
    pub minutes_played: f64,
    pub tackles_per_game: f64,
    pub fouls_per_game: f64,
    pub interceptions_per_game: f64,
    pub xg_per_90: f64,
    pub shots_per_game: f64,
    pub xg_per_shot: f64,
    pub key_passes_per_game: f64,
    pub dribbles_won_per_game: f64,
    pub rating: f64,
    pub goals: f64,
    pub assists: f64,
}

/// Role bucket derived from a raw position code.
///
/// Variants are declared in match precedence: when a code lists several
/// positions, the earliest variant present wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PositionRole {
    Forward,
    AttackingMidfield,
    CentralMidfield,
    Defender,
    Goalkeeper,
    Unknown,
}

impl PositionRole {
    pub fn weight(self) -> f64 {
        match self {
            PositionRole::Forward => 0.25,
            PositionRole::AttackingMidfield => 0.15,
            PositionRole::CentralMidfield => 0.0,
            PositionRole::Defender => -0.15,
            PositionRole::Goalkeeper => -0.30,
            PositionRole::Unknown => 0.0,
        }
    }

    /// Parses codes such as `"ST"`, `"cam"`, `"AM(CLR),FW"` or `"D(C)"`.
    pub fn parse(raw: &str) -> Self {
        split_codes(raw)
            .into_iter()
            .map(classify_code)
            .min()
            .unwrap_or(PositionRole::Unknown)
    }
}

// Splits on separators outside brackets so "D(C,L)" stays one code.
fn split_codes(raw: &str) -> Vec<String> {
    let upper = raw.trim().to_ascii_uppercase();
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut depth = 0usize;
    for ch in upper.chars() {
        match ch {
            '(' => {
                depth += 1;
                cur.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                cur.push(ch);
            }
            ',' | '/' | ';' | '|' if depth == 0 => push_code(&mut out, &mut cur),
            c if c.is_whitespace() && depth == 0 => push_code(&mut out, &mut cur),
            c if c.is_whitespace() => {}
            _ => cur.push(ch),
        }
    }
    push_code(&mut out, &mut cur);
    out
}

fn push_code(out: &mut Vec<String>, cur: &mut String) {
    if !cur.is_empty() {
        out.push(std::mem::take(cur));
    }
}

fn classify_code(code: String) -> PositionRole {
    // Bracketed notation: prefix names the line, brackets the side.
    let head = code.split('(').next().unwrap_or_default();
    if code.contains('(') {
        return match head {
            "FW" | "AM" => PositionRole::Forward,
            "M" => PositionRole::AttackingMidfield,
            "DM" => PositionRole::CentralMidfield,
            "D" => PositionRole::Defender,
            "GK" => PositionRole::Goalkeeper,
            _ => PositionRole::Unknown,
        };
    }
    match head {
        "ST" | "CF" | "LW" | "RW" | "SS" | "FW" | "F" | "FORWARD" | "STRIKER" | "AM" | "AMC"
        | "AML" | "AMR" => PositionRole::Forward,
        "CAM" | "RM" | "LM" | "M" | "MC" | "ML" | "MR" => PositionRole::AttackingMidfield,
        "CM" | "CDM" | "DMC" | "DM" => PositionRole::CentralMidfield,
        "CB" | "LB" | "RB" | "LWB" | "RWB" | "WB" | "DC" | "DL" | "DR" | "D" => {
            PositionRole::Defender
        }
        "GK" | "GOALKEEPER" => PositionRole::Goalkeeper,
        _ => PositionRole::Unknown,
    }
}

pub fn position_weight(raw: &str) -> f64 {
    PositionRole::parse(raw).weight()
}

/// Per-90 rate; zero when minutes are not positive or the rate is not finite.
pub fn per_90(total: f64, minutes: f64) -> f64 {
    if minutes.is_nan() || minutes <= 0.0 {
        return 0.0;
    }
    let rate = total / (minutes / 90.0);
    if rate.is_finite() { rate } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    name: String,
    team: String,
    position: String,
    role: PositionRole,
    stats: PlayerStats,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        position: impl Into<String>,
        stats: PlayerStats,
    ) -> Self {
        let position = position.into();
        let role = PositionRole::parse(&position);
        Self {
            name: name.into(),
            team: team.into(),
            position,
            role,
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn role(&self) -> PositionRole {
        self.role
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn goals_per_90(&self) -> f64 {
        per_90(self.stats.goals, self.stats.minutes_played)
    }

    pub fn assists_per_90(&self) -> f64 {
        per_90(self.stats.assists, self.stats.minutes_played)
    }

    pub fn form_index(&self) -> f64 {
        0.5 * self.stats.xg_per_90 + 0.3 * self.goals_per_90() + 0.2 * self.assists_per_90()
    }

    pub fn position_weight(&self) -> f64 {
        self.role.weight()
    }

    pub fn defensive_penalty(&self) -> f64 {
        self.stats.tackles_per_game + self.stats.interceptions_per_game + self.stats.fouls_per_game
    }

    pub fn prob_goal(&self) -> f64 {
        scoring::scoring_propensity(self)
    }

    pub fn will_score(&self) -> bool {
        scoring::will_score(self)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} | Prob Goal: {:.2}",
            self.name,
            self.team,
            self.position,
            self.prob_goal()
        )
    }
}

/// Players keyed by exact name; a later insert replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct PlayerStore {
    players: HashMap<String, Player>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: Player) -> Option<Player> {
        self.players.insert(player.name.clone(), player)
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }
}

impl FromIterator<Player> for PlayerStore {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        let mut store = Self::new();
        for p in iter {
            store.insert(p);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_lookup_is_case_insensitive() {
        assert_eq!(position_weight("st"), 0.25);
        assert_eq!(position_weight("ST"), 0.25);
        assert_eq!(position_weight("XX"), 0.0);
        assert_eq!(position_weight(""), 0.0);
    }

    #[test]
    fn bracketed_codes() {
        assert_eq!(PositionRole::parse("AM(CLR)"), PositionRole::Forward);
        assert_eq!(PositionRole::parse("M(CLR)"), PositionRole::AttackingMidfield);
        assert_eq!(PositionRole::parse("D(C,L)"), PositionRole::Defender);
        assert_eq!(PositionRole::parse("DMC"), PositionRole::CentralMidfield);
        assert_eq!(PositionRole::parse("gk"), PositionRole::Goalkeeper);
    }

    #[test]
    fn first_group_wins_for_multi_codes() {
        assert_eq!(PositionRole::parse("D(CR),DMC"), PositionRole::CentralMidfield);
        assert_eq!(PositionRole::parse("M(CLR), FW"), PositionRole::Forward);
        assert_eq!(PositionRole::parse("CB/GK"), PositionRole::Defender);
    }

    #[test]
    fn wing_backs_are_defenders() {
        assert_eq!(PositionRole::parse("LWB"), PositionRole::Defender);
        assert_eq!(PositionRole::parse("rwb"), PositionRole::Defender);
    }

    #[test]
    fn zero_minutes_means_zero_rates() {
        let p = Player::new(
            "Ghost",
            "Nowhere",
            "ST",
            PlayerStats {
                goals: 12.0,
                assists: 4.0,
                ..Default::default()
            },
        );
        assert_eq!(p.goals_per_90(), 0.0);
        assert_eq!(p.assists_per_90(), 0.0);
    }

    #[test]
    fn negative_minutes_means_zero_rates() {
        assert_eq!(per_90(5.0, -90.0), 0.0);
        assert_eq!(per_90(5.0, f64::MIN_POSITIVE), 0.0);
    }

    #[test]
    fn per_90_rate() {
        assert!((per_90(10.0, 1800.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn store_replaces_by_name() {
        let mut store = PlayerStore::new();
        store.insert(Player::new("A", "X", "ST", PlayerStats::default()));
        let prev = store.insert(Player::new("A", "Y", "CB", PlayerStats::default()));
        assert_eq!(prev.map(|p| p.team().to_string()), Some("X".to_string()));
        assert_eq!(store.get("A").map(|p| p.team()), Some("Y"));
        assert_eq!(store.len(), 1);
    }
}
