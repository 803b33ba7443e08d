use anyhow::{Context, Result};
use serde::Serialize;

use crate::team::TeamRegistry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRatingRow {
    pub rank: usize,
    pub team: String,
    pub rating: f64,
}

/// Highest rating first; equal ratings ordered by name.
pub fn ratings_table(teams: &TeamRegistry) -> Vec<TeamRatingRow> {
    let mut rows: Vec<(&str, f64)> = teams.iter().map(|t| (t.name(), t.rating)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows.into_iter()
        .enumerate()
        .map(|(idx, (team, rating))| TeamRatingRow {
            rank: idx + 1,
            team: team.to_string(),
            rating,
        })
        .collect()
}

pub fn ratings_json(teams: &TeamRegistry) -> Result<String> {
    serde_json::to_string_pretty(&ratings_table(teams)).context("serialize ratings table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_by_rating_then_name() {
        let mut teams = TeamRegistry::new();
        teams.register("Bari");
        teams.register("Atalanta");
        teams.register("Como").rating = 1550.0;
        let rows = ratings_table(&teams);
        let names: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(names, vec!["Como", "Atalanta", "Bari"]);
        assert_eq!(rows[2].rank, 3);
    }

    #[test]
    fn json_contains_rows() {
        let mut teams = TeamRegistry::new();
        teams.register("Como");
        let json = ratings_json(&teams).expect("serializes");
        let v: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(v[0]["team"], "Como");
        assert_eq!(v[0]["rating"], 1500.0);
    }
}
