pub mod app;
pub mod config;
pub mod elo;
pub mod error;
pub mod ingest;
pub mod matches;
pub mod matchup;
pub mod player;
pub mod report;
pub mod scoring;
pub mod shell;
pub mod team;
