//! Opponent-independent scoring propensity of a player.
//!
//! The propensity is a linear index clamped into [0, 1], not a logistic
//! transform: scores outside the unit interval saturate.

use crate::player::Player;

const W_XG_PER_90: f64 = 0.30;
const W_SHOTS: f64 = 0.25;
const W_XG_PER_SHOT: f64 = 0.15;
const W_KEY_PASSES: f64 = 0.10;
const W_DRIBBLES: f64 = 0.05;
const W_RATING: f64 = 0.05;
const W_DEFENSIVE: f64 = 0.10;
const W_FORM: f64 = 0.4;

pub const WILL_SCORE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub raw: f64,
    pub position_weight: f64,
    pub form_index: f64,
    pub goal_score: f64,
    pub propensity: f64,
}

pub fn goal_score_raw(player: &Player) -> f64 {
    let s = player.stats();
    W_XG_PER_90 * s.xg_per_90
        + W_SHOTS * s.shots_per_game
        + W_XG_PER_SHOT * s.xg_per_shot
        + W_KEY_PASSES * s.key_passes_per_game
        + W_DRIBBLES * s.dribbles_won_per_game
        + W_RATING * s.rating
        - W_DEFENSIVE * player.defensive_penalty()
}

pub fn goal_score(player: &Player) -> f64 {
    goal_score_raw(player) + player.position_weight() + W_FORM * player.form_index()
}

pub fn scoring_propensity(player: &Player) -> f64 {
    clamp_unit(goal_score(player))
}

/// Threshold classification; not used by the matchup estimate.
pub fn will_score(player: &Player) -> bool {
    scoring_propensity(player) > WILL_SCORE_THRESHOLD
}

pub fn breakdown(player: &Player) -> ScoreBreakdown {
    let raw = goal_score_raw(player);
    let position_weight = player.position_weight();
    let form_index = player.form_index();
    let goal_score = raw + position_weight + W_FORM * form_index;
    ScoreBreakdown {
        raw,
        position_weight,
        form_index,
        goal_score,
        propensity: clamp_unit(goal_score),
    }
}

/// Clamp into [0, 1]; NaN maps to 0.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
