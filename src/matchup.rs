use std::fmt;

use crate::player::{Player, PlayerStore};
use crate::scoring::{clamp_unit, scoring_propensity};
use crate::team::{ELO_BASE, ELO_SCALE, INITIAL_RATING, Team, TeamRegistry};

/// Which side of a matchup lookup was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Player(String),
    Team(String),
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFound::Player(_) => write!(f, "Player not found"),
            NotFound::Team(_) => write!(f, "Team not found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringEstimate {
    pub player: String,
    pub opponent: String,
    pub opponent_rating: f64,
    pub propensity: f64,
    pub defense_factor: f64,
    pub probability: f64,
}

/// Opponent strength on the Elo curve, centred on the league average rating.
pub fn defense_factor(opponent_rating: f64) -> f64 {
    1.0 / (1.0 + ELO_BASE.powf((opponent_rating - INITIAL_RATING) / ELO_SCALE))
}

/// Doubled so an average opponent leaves the propensity unchanged.
pub fn adjusted_defense_factor(opponent_rating: f64) -> f64 {
    defense_factor(opponent_rating) * 2.0
}

pub fn probability_against(player: &Player, opponent: &Team) -> ScoringEstimate {
    let propensity = scoring_propensity(player);
    let factor = adjusted_defense_factor(opponent.rating);
    ScoringEstimate {
        player: player.name().to_string(),
        opponent: opponent.name().to_string(),
        opponent_rating: opponent.rating,
        propensity,
        defense_factor: factor,
        probability: clamp_unit(propensity * factor),
    }
}

/// Resolves names against borrowed stores; never mutates either.
#[derive(Debug, Clone, Copy)]
pub struct MatchupProbabilityEstimator<'a> {
    players: &'a PlayerStore,
    teams: &'a TeamRegistry,
}

impl<'a> MatchupProbabilityEstimator<'a> {
    pub fn new(players: &'a PlayerStore, teams: &'a TeamRegistry) -> Self {
        Self { players, teams }
    }

    /// The player is resolved first; an unknown player short-circuits before
    /// any team lookup.
    pub fn estimate(&self, player_name: &str, team_name: &str) -> Result<ScoringEstimate, NotFound> {
        let player = self
            .players
            .get(player_name)
            .ok_or_else(|| NotFound::Player(player_name.to_string()))?;
        let team = self
            .teams
            .get(team_name)
            .ok_or_else(|| NotFound::Team(team_name.to_string()))?;
        Ok(probability_against(player, team))
    }
}
