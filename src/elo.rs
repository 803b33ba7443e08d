use tracing::{debug, trace};

use crate::error::ModelError;
use crate::matches::Match;
use crate::team::TeamRegistry;

pub const DEFAULT_K: f64 = 25.0;
pub const DEFAULT_HOME_ADVANTAGE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EloConfig {
    pub k: f64,
    pub home_adv_pts: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            home_adv_pts: DEFAULT_HOME_ADVANTAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchUpdate {
    pub expected_home: f64,
    pub home_delta: f64,
    pub away_delta: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateSummary {
    pub matches_applied: usize,
    pub max_abs_delta: f64,
}

/// Sequential Elo replay over a match history.
///
/// Every update reads the *current* ratings of both sides, so the final
/// ratings depend on the order of the history. Calling [`run_update`] twice
/// on the same registry applies the rule twice: it is cumulative, not a
/// recomputation. Use [`replay_from_scratch`] when a rerun must reproduce the
/// ratings of a single pass.
///
/// The home advantage only biases the expectation toward the home side; it
/// is never stored in, or subtracted back from, either rating.
///
/// [`run_update`]: EloRatingEngine::run_update
/// [`replay_from_scratch`]: EloRatingEngine::replay_from_scratch
#[derive(Debug, Clone, Default)]
pub struct EloRatingEngine {
    cfg: EloConfig,
    passes: usize,
}

impl EloRatingEngine {
    pub fn new(cfg: EloConfig) -> Self {
        Self { cfg, passes: 0 }
    }

    pub fn config(&self) -> EloConfig {
        self.cfg
    }

    /// Number of completed full passes over a history.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub(crate) fn mark_pass(&mut self) {
        self.passes += 1;
    }

    /// Applies one match. Unseen teams are registered at the initial rating.
    pub fn apply(
        &self,
        registry: &mut TeamRegistry,
        m: &Match,
    ) -> Result<MatchUpdate, ModelError> {
        validate(m)?;
        let home = m.home_team_name();
        let away = m.away_team_name();

        let eh = registry.register(home).rating;
        let ea = registry.register(away).rating;

        let expected_home = registry
            .register(home)
            .win_probability(ea, self.cfg.home_adv_pts);
        let expected_away = 1.0 - expected_home;
        let result = m.result();

        let home_delta = self.cfg.k * (result - expected_home);
        let away_delta = self.cfg.k * ((1.0 - result) - expected_away);
        registry.register(home).rating = eh + home_delta;
        registry.register(away).rating = ea + away_delta;

        trace!(
            home,
            away,
            expected_home,
            home_delta,
            away_delta,
            "elo update"
        );

        Ok(MatchUpdate {
            expected_home,
            home_delta,
            away_delta,
        })
    }

    /// Replays `matches` in the given order. Stops at the first malformed
    /// match; updates applied before it are kept.
    pub fn run_update<'a, I>(
        &mut self,
        registry: &mut TeamRegistry,
        matches: I,
    ) -> Result<UpdateSummary, ModelError>
    where
        I: IntoIterator<Item = &'a Match>,
    {
        let mut summary = UpdateSummary::default();
        for m in matches {
            let update = self.apply(registry, m)?;
            summary.matches_applied += 1;
            summary.max_abs_delta = summary
                .max_abs_delta
                .max(update.home_delta.abs())
                .max(update.away_delta.abs());
        }
        self.mark_pass();
        debug!(
            applied = summary.matches_applied,
            pass = self.passes,
            "elo replay complete"
        );
        Ok(summary)
    }

    /// Resets every registered team to the initial rating, then replays.
    pub fn replay_from_scratch<'a, I>(
        &mut self,
        registry: &mut TeamRegistry,
        matches: I,
    ) -> Result<UpdateSummary, ModelError>
    where
        I: IntoIterator<Item = &'a Match>,
    {
        registry.reset_ratings();
        self.run_update(registry, matches)
    }
}

fn validate(m: &Match) -> Result<(), ModelError> {
    let home = m.home_team_name().trim();
    let away = m.away_team_name().trim();
    let reason = if home.is_empty() {
        Some("missing home team name")
    } else if away.is_empty() {
        Some("missing away team name")
    } else if home == away {
        Some("team cannot play itself")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ModelError::MalformedMatch {
            home: m.home_team_name().to_string(),
            away: m.away_team_name().to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
