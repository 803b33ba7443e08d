use std::path::PathBuf;

use chrono::NaiveDate;

use goalmind::app::GoalMind;
use goalmind::config::AppConfig;
use goalmind::elo::EloConfig;
use goalmind::ingest::{load_matches_from_path, load_players_from_path};
use goalmind::matchup::NotFound;
use goalmind::shell::Shell;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn loaded_app() -> GoalMind {
    let cfg = AppConfig {
        players_path: fixture("players.csv"),
        matches_path: fixture("matches.csv"),
        start_date: NaiveDate::from_ymd_opt(2020, 8, 1),
        elo: EloConfig::default(),
        log_level: "off".to_string(),
    };
    let mut app = GoalMind::load(&cfg).expect("fixtures load");
    app.update_all_elo();
    app
}

fn run_shell(app: &GoalMind, input: &str) -> String {
    let mut out = Vec::new();
    Shell::new(app)
        .without_prompt()
        .run(input.as_bytes(), &mut out)
        .expect("write to vec");
    String::from_utf8(out).expect("utf8 output")
}

#[test]
fn match_fixture_is_filtered_and_chronological() {
    let (matches, summary) =
        load_matches_from_path(&fixture("matches.csv"), NaiveDate::from_ymd_opt(2020, 8, 1))
            .expect("fixture parses");
    assert_eq!(summary.rows_read, 9);
    assert_eq!(summary.kept, 7);
    assert_eq!(summary.skipped, 1);
    assert_eq!(matches[0].home_team_name(), "Fiorentina");
    assert_eq!(matches[6].home_team_name(), "Cagliari");
    assert_eq!(matches[6].result(), 1.0);
    assert!(matches.windows(2).all(|w| w[0].date() <= w[1].date()));
}

#[test]
fn player_fixture_coerces_missing_values() {
    let (players, summary) = load_players_from_path(&fixture("players.csv")).expect("parses");
    assert_eq!(summary.kept, 5);
    let bench = players
        .iter()
        .find(|p| p.name() == "Bench Warmer")
        .expect("bench player present");
    assert_eq!(bench.stats().rating, 0.0);
    assert_eq!(bench.goals_per_90(), 0.0);
    assert_eq!(bench.assists_per_90(), 0.0);
    assert!(bench.prob_goal() >= 0.0);
}

#[test]
fn teams_outside_the_window_are_never_registered() {
    let app = loaded_app();
    assert!(app.find_team("Parma").is_none());
    assert!(app.find_team("Napoli").is_some());
    assert!(app.find_team("Atalanta").map(|t| t.rating).is_some());
}

#[test]
fn stronger_defence_lowers_goal_probability() {
    let app = loaded_app();
    let vs_juve = app
        .estimate_scoring_probability("Joao Pedro", "Juventus")
        .expect("both known");
    let vs_torino = app
        .estimate_scoring_probability("Joao Pedro", "Torino")
        .expect("both known");
    let juve = app.find_team("Juventus").map(|t| t.rating).expect("juve");
    let torino = app.find_team("Torino").map(|t| t.rating).expect("torino");
    assert!(juve > torino);
    assert!(vs_juve.defense_factor < vs_torino.defense_factor);
    assert!(vs_juve.probability <= vs_torino.probability);
}

#[test]
fn lookups_report_absence() {
    let app = loaded_app();
    assert!(app.find_player("Nobody").is_none());
    assert_eq!(
        app.estimate_scoring_probability("Nobody", "Roma"),
        Err(NotFound::Player("Nobody".to_string()))
    );
    assert_eq!(
        app.estimate_scoring_probability("Duvan Zapata", "Parma"),
        Err(NotFound::Team("Parma".to_string()))
    );
}

#[test]
fn shell_session() {
    let app = loaded_app();
    let out = run_shell(
        &app,
        "searchteam Nowhere\n\
         searchplayer Nobody\n\
         scoreprob \"Duvan Zapata\"\n\
         scoreprob \"Duvan Zapata\n\
         scoreprob \"Nobody\" \"Roma\"\n\
         scoreprob \"Duvan Zapata\" \"Roma\"\n\
         exit\n\
         searchteam Roma\n",
    );
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Team not found!");
    assert_eq!(lines[1], "Player not found!");
    assert_eq!(lines[2], "Error: you must provide 2 arguments");
    assert_eq!(lines[3], "Error: invalid syntax");
    assert_eq!(lines[4], "Error: Player not found");
    assert!(lines[5].starts_with("Goal probability: "));
    assert_eq!(lines[6], "Goodbye!");
    assert_eq!(lines.len(), 7);
}

#[test]
fn shell_search_commands_print_details() {
    let app = loaded_app();
    let out = run_shell(&app, "searchteam Roma\nsearchplayer Chris Smalling\nratings 3\n");
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("Team found. ELO: "));
    assert!(lines[1].starts_with("Chris Smalling (Roma) - D(C) | Prob Goal: "));
    assert_eq!(lines.len(), 5);
    assert!(lines[2].trim_start().starts_with("1. "));
}
