use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use goalmind::app::GoalMind;
use goalmind::config::{AppConfig, DEFAULT_LOG_LEVEL, parse_start_date};
use goalmind::shell::{Flow, Shell};

/// Elo team ratings and player goal probabilities from match and player CSVs.
#[derive(Debug, Parser)]
#[command(name = "goalmind", version)]
struct Cli {
    /// Player statistics CSV (overrides GOALMIND_PLAYERS_PATH)
    #[arg(long)]
    players: Option<PathBuf>,

    /// Match results CSV (overrides GOALMIND_MATCHES_PATH)
    #[arg(long)]
    matches: Option<PathBuf>,

    /// Replay only matches after this date, YYYY-MM-DD; empty replays all
    #[arg(long)]
    start_date: Option<String>,

    /// Elo K factor
    #[arg(long)]
    k: Option<f64>,

    /// Home advantage in rating points
    #[arg(long)]
    home_advantage: Option<f64>,

    /// Log filter when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Run a shell command and exit; may be repeated
    #[arg(long = "command", short = 'c')]
    commands: Vec<String>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cli = Cli::parse();
    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("GOALMIND_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    init_tracing(&level);
    let cfg = resolve_config(&cli)?;

    let mut app = GoalMind::load(&cfg)?;
    app.update_all_elo();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.commands.is_empty() {
        Shell::new(&app)
            .run(io::stdin().lock(), &mut out)
            .context("shell i/o")?;
    } else {
        let shell = Shell::new(&app).without_prompt();
        for line in &cli.commands {
            if shell.execute(line, &mut out).context("shell i/o")? == Flow::Exit {
                break;
            }
        }
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut cfg = AppConfig::from_env();
    if let Some(path) = &cli.players {
        cfg.players_path = path.clone();
    }
    if let Some(path) = &cli.matches {
        cfg.matches_path = path.clone();
    }
    if let Some(raw) = &cli.start_date {
        cfg.start_date = parse_start_date(raw).context("--start-date")?;
    }
    if let Some(k) = cli.k {
        cfg.elo.k = k;
    }
    if let Some(adv) = cli.home_advantage {
        cfg.elo.home_adv_pts = adv;
    }
    if let Some(level) = &cli.log_level {
        cfg.log_level = level.clone();
    }
    Ok(cfg)
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
