use std::collections::HashMap;

use serde::Serialize;

pub const ELO_BASE: f64 = 10.0;
pub const ELO_SCALE: f64 = 400.0;
pub const INITIAL_RATING: f64 = 1500.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    name: String,
    pub rating: f64,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: INITIAL_RATING,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elo expected score of this team against `opponent_rating`.
    /// `home_advantage` is added to this side's rating for the calculation only.
    pub fn win_probability(&self, opponent_rating: f64, home_advantage: f64) -> f64 {
        expected_score(self.rating + home_advantage, opponent_rating)
    }
}

/// Logistic expectation of `r_a` against `r_b`.
pub fn expected_score(r_a: f64, r_b: f64) -> f64 {
    1.0 / (1.0 + ELO_BASE.powf((r_b - r_a) / ELO_SCALE))
}

/// Teams keyed by name. Teams are only ever added, never removed.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: HashMap<String, Team>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: an existing team keeps its current rating.
    pub fn register(&mut self, name: &str) -> &mut Team {
        self.teams
            .entry(name.to_string())
            .or_insert_with(|| Team::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&Team> {
        self.teams.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Team> {
        self.teams.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.teams.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn reset_ratings(&mut self) {
        for team in self.teams.values_mut() {
            team.rating = INITIAL_RATING;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_without_advantage_is_even() {
        let a = Team::new("A");
        assert!((a.win_probability(1500.0, 0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn home_advantage_shifts_expectation() {
        let a = Team::new("A");
        let p = a.win_probability(1500.0, 40.0);
        assert!((p - 0.5573).abs() < 1e-4);
    }

    #[test]
    fn register_is_idempotent() {
        let mut reg = TeamRegistry::new();
        reg.register("Inter").rating = 1612.0;
        reg.register("Inter");
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("Inter").map(|t| t.rating), Some(1612.0));
    }

    #[test]
    fn missing_team_is_none() {
        let reg = TeamRegistry::new();
        assert!(reg.get("Nobody").is_none());
    }

    #[test]
    fn reset_restores_initial_rating() {
        let mut reg = TeamRegistry::new();
        reg.register("Roma").rating = 1440.0;
        reg.reset_ratings();
        assert_eq!(reg.get("Roma").map(|t| t.rating), Some(INITIAL_RATING));
    }
}
