use anyhow::Result;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::elo::{EloConfig, EloRatingEngine, UpdateSummary};
use crate::ingest;
use crate::matches::{Match, MatchHistory};
use crate::matchup::{MatchupProbabilityEstimator, NotFound, ScoringEstimate};
use crate::player::{Player, PlayerStore};
use crate::team::{Team, TeamRegistry};

/// Owns the team registry, the match history and the player store, and
/// drives the rating engine over them.
#[derive(Debug, Clone, Default)]
pub struct GoalMind {
    teams: TeamRegistry,
    matches: MatchHistory,
    players: PlayerStore,
    engine: EloRatingEngine,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchReport {
    pub update: UpdateSummary,
    pub skipped: usize,
}

impl GoalMind {
    pub fn new(cfg: EloConfig) -> Self {
        Self {
            engine: EloRatingEngine::new(cfg),
            ..Default::default()
        }
    }

    /// Loads both CSV files named in `cfg`; ratings are not updated yet.
    pub fn load(cfg: &AppConfig) -> Result<Self> {
        let mut app = Self::new(cfg.elo);
        let (players, _) = ingest::load_players_from_path(&cfg.players_path)?;
        for p in players {
            app.register_player(p);
        }
        let (matches, _) = ingest::load_matches_from_path(&cfg.matches_path, cfg.start_date)?;
        for m in matches {
            app.register_match(m);
        }
        info!(
            players = app.players.len(),
            matches = app.matches.len(),
            teams = app.teams.len(),
            "data registered"
        );
        Ok(app)
    }

    pub fn register_player(&mut self, player: Player) {
        self.players.insert(player);
    }

    /// Appends to the history; named teams exist from this point on.
    pub fn register_match(&mut self, m: Match) {
        for name in [m.home_team_name(), m.away_team_name()] {
            if !name.trim().is_empty() {
                self.teams.register(name);
            }
        }
        self.matches.push(m);
    }

    /// One pass of the whole history. Not idempotent: each call applies
    /// every match again on top of the current ratings. Malformed matches
    /// are skipped and logged.
    pub fn update_all_elo(&mut self) -> BatchReport {
        let mut report = BatchReport::default();
        for m in self.matches.iter() {
            match self.engine.apply(&mut self.teams, m) {
                Ok(up) => {
                    report.update.matches_applied += 1;
                    report.update.max_abs_delta = report
                        .update
                        .max_abs_delta
                        .max(up.home_delta.abs())
                        .max(up.away_delta.abs());
                }
                Err(err) => {
                    warn!("skipping match: {err}");
                    report.skipped += 1;
                }
            }
        }
        self.engine.mark_pass();
        info!(
            applied = report.update.matches_applied,
            skipped = report.skipped,
            "elo ratings updated"
        );
        report
    }

    /// Resets every team to the initial rating, then runs one pass.
    pub fn replay_from_scratch(&mut self) -> BatchReport {
        self.teams.reset_ratings();
        self.update_all_elo()
    }

    pub fn find_player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn find_team(&self, name: &str) -> Option<&Team> {
        self.teams.get(name)
    }

    pub fn estimate_scoring_probability(
        &self,
        player_name: &str,
        team_name: &str,
    ) -> Result<ScoringEstimate, NotFound> {
        MatchupProbabilityEstimator::new(&self.players, &self.teams).estimate(player_name, team_name)
    }

    pub fn teams(&self) -> &TeamRegistry {
        &self.teams
    }

    pub fn matches(&self) -> &MatchHistory {
        &self.matches
    }

    pub fn players(&self) -> &PlayerStore {
        &self.players
    }

    pub fn engine(&self) -> &EloRatingEngine {
        &self.engine
    }
}
