#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn catalyst(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("catalyst").unwrap();
    cmd.current_dir(dir.path())
        .env("CATALYST_ROOT", dir.path())
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn init(dir: &TempDir) {
    catalyst(dir).arg("init").assert().success();
}

/// Run with `--json` and parse stdout.
fn json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = catalyst(dir).arg("--json").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "catalyst {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Create a goal with one tactic; returns the tactic id.
fn goal_with_tactic(dir: &TempDir, frequency: &str, target: &str) -> String {
    json(dir, &["goal", "add", "Ship v1"]);
    let added = json(
        dir,
        &["tactic", "add", "1", "Write code", "--frequency", frequency, "--target", target],
    );
    added["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// catalyst init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_cycle() {
    let dir = TempDir::new().unwrap();
    catalyst(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .catalyst/config.yaml"));

    assert!(dir.path().join(".catalyst/config.yaml").exists());
    let doc = std::fs::read_to_string(dir.path().join(".catalyst/cycle.json")).unwrap();
    let cycle: serde_json::Value = serde_json::from_str(&doc).unwrap();
    assert_eq!(cycle["executions"].as_array().unwrap().len(), 12);
    assert_eq!(cycle["onboardingCompleted"], false);
}

#[test]
fn init_is_idempotent_and_keeps_cycle() {
    let dir = TempDir::new().unwrap();
    let first = json(&dir, &["init"]);
    let second = json(&dir, &["init"]);
    assert_eq!(first["cycleCreated"], true);
    assert_eq!(second["cycleCreated"], false);
    assert_eq!(second["configCreated"], false);
    assert_eq!(first["cycleId"], second["cycleId"]);
}

// ---------------------------------------------------------------------------
// catalyst status / vision
// ---------------------------------------------------------------------------

#[test]
fn status_reports_fresh_cycle() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let summary = json(&dir, &["status"]);
    assert_eq!(summary["currentWeek"], 1);
    assert_eq!(summary["daysLeft"], 84);
    assert_eq!(summary["streak"], 0);
    assert_eq!(summary["chart"].as_array().unwrap().len(), 12);

    catalyst(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1 of 12"))
        .stdout(predicate::str::contains("No goals yet"));
}

#[test]
fn vision_set_and_show() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir)
        .args(["vision", "set", "Build a calm, profitable studio", "--complete-onboarding"])
        .assert()
        .success();

    let shown = json(&dir, &["vision", "show"]);
    assert_eq!(shown["vision"], "Build a calm, profitable studio");
    assert_eq!(shown["onboardingCompleted"], true);
}

#[test]
fn vision_prompts_fall_back_without_api_key() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let prompts = json(&dir, &["vision", "prompts"]);
    assert_eq!(prompts["fallback"], true);
    assert_eq!(prompts["prompts"].as_array().unwrap().len(), 5);
}

// ---------------------------------------------------------------------------
// catalyst goal / tactic
// ---------------------------------------------------------------------------

#[test]
fn fourth_goal_is_not_applied() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    for title in ["Health", "Wealth", "Craft"] {
        catalyst(&dir).args(["goal", "add", title]).assert().success();
    }
    catalyst(&dir)
        .args(["goal", "add", "Fame"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not applied"));

    let goals = json(&dir, &["goal", "list"]);
    let titles: Vec<&str> = goals
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Health", "Wealth", "Craft"]);
}

#[test]
fn goal_update_sets_lag_measure() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    json(&dir, &["goal", "add", "Grow revenue"]);
    catalyst(&dir)
        .args(["goal", "update", "1", "--lag", "MRR", "--target", "10000", "--current", "2500"])
        .assert()
        .success();

    let summary = json(&dir, &["status"]);
    let goal = &summary["goals"][0];
    assert_eq!(goal["lagIndicator"], "MRR");
    assert_eq!(goal["percent"], 25.0);
}

#[test]
fn removing_goal_by_position() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    json(&dir, &["goal", "add", "A"]);
    json(&dir, &["goal", "add", "B"]);
    catalyst(&dir).args(["goal", "remove", "1"]).assert().success();

    let goals = json(&dir, &["goal", "list"]);
    assert_eq!(goals.as_array().unwrap().len(), 1);
    assert_eq!(goals[0]["title"], "B");
}

#[test]
fn unknown_goal_fails() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir)
        .args(["tactic", "add", "nope-nope", "Run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("goal not found"));
}

#[test]
fn tactic_rejects_unknown_frequency() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    json(&dir, &["goal", "add", "A"]);
    catalyst(&dir)
        .args(["tactic", "add", "1", "Run", "--frequency", "hourly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hourly"));
}

#[test]
fn tactic_suggest_without_key_adds_nothing() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    json(&dir, &["goal", "add", "Write a book"]);
    let result = json(&dir, &["tactic", "suggest", "1"]);
    assert_eq!(result["fallback"], true);
    assert!(result["added"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// catalyst week
// ---------------------------------------------------------------------------

#[test]
fn toggle_cycles_count_and_score() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let tactic = goal_with_tactic(&dir, "daily", "2");

    let scores: Vec<(u64, u64)> = (0..3)
        .map(|_| {
            let out = json(&dir, &["week", "toggle", &tactic, "--week", "2"]);
            (out["count"].as_u64().unwrap(), out["score"].as_u64().unwrap())
        })
        .collect();
    assert_eq!(scores, vec![(1, 50), (2, 100), (0, 0)]);
}

#[test]
fn toggle_rejects_week_out_of_range() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let tactic = goal_with_tactic(&dir, "weekly", "1");
    catalyst(&dir)
        .args(["week", "toggle", &tactic, "--week", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("week out of range"));
}

#[test]
fn retarget_rescores_stored_weeks() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let tactic = goal_with_tactic(&dir, "daily", "4");
    json(&dir, &["week", "toggle", &tactic, "--week", "1"]);
    assert_eq!(json(&dir, &["week", "show", "1"])["score"], 25);

    catalyst(&dir)
        .args(["tactic", "update", &tactic, "--target", "1"])
        .assert()
        .success();
    assert_eq!(json(&dir, &["week", "show", "1"])["score"], 100);
}

#[test]
fn reflections_are_saved() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir)
        .args(["week", "reflect", "Too many meetings", "--week", "3"])
        .assert()
        .success();
    let week = json(&dir, &["week", "show", "3"]);
    assert_eq!(week["reflections"], "Too many meetings");
    assert_eq!(week["weekNumber"], 3);
}

#[test]
fn wam_prints_agenda_with_vision_and_score() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir).args(["vision", "set", "Own my mornings"]).assert().success();
    let tactic = goal_with_tactic(&dir, "daily", "4");
    json(&dir, &["week", "toggle", &tactic, "--week", "5"]);
    catalyst(&dir)
        .args(["week", "reflect", "Slept late twice", "--week", "5"])
        .assert()
        .success();

    let brief = json(&dir, &["wam", "--week", "5"]);
    assert_eq!(brief["minutes"], 15);
    assert_eq!(brief["score"], 25);
    assert_eq!(brief["band"], "off_track");
    assert_eq!(brief["agenda"][2]["notes"][0], "Slept late twice");

    catalyst(&dir)
        .args(["wam", "-w", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15 minutes max"))
        .stdout(predicate::str::contains("1. Review Vision"))
        .stdout(predicate::str::contains("- Own my mornings"))
        .stdout(predicate::str::contains("- Week 5: 25% (off_track)"));
}

#[test]
fn wam_rejects_week_out_of_range() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir)
        .args(["wam", "--week", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("week out of range"));
}

// ---------------------------------------------------------------------------
// catalyst calendar
// ---------------------------------------------------------------------------

#[test]
fn calendar_writes_ics_file() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let out = dir.path().join("blocks.ics");
    catalyst(&dir)
        .args(["calendar", "--kind", "buffer", "--hour", "14", "-o"])
        .arg(&out)
        .assert()
        .success();

    let ics = std::fs::read_to_string(&out).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.contains("RRULE:FREQ=DAILY;COUNT=84\r\n"));
    assert!(ics.contains("T140000Z\r\n"));
    assert!(ics.contains("T150000Z\r\n"));
    assert!(!ics.replace("\r\n", "").contains('\n'));
}

#[test]
fn calendar_default_file_name() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir).arg("calendar").assert().success();
    assert!(dir.path().join("strategic_blocks.ics").exists());
}

#[test]
fn calendar_rejects_bad_hour() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir)
        .args(["calendar", "--hour", "24"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid start hour 24"));
}

// ---------------------------------------------------------------------------
// catalyst coach
// ---------------------------------------------------------------------------

#[test]
fn coach_feedback_without_key_names_variable() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    json(&dir, &["goal", "add", "A"]);
    catalyst(&dir)
        .args(["coach", "feedback"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENROUTER_API_KEY"));
}

// ---------------------------------------------------------------------------
// catalyst config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_defaults_only_warns() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning] OPENROUTER_API_KEY is not set"));
}

#[test]
fn config_validate_rejects_bad_hour() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".catalyst")).unwrap();
    std::fs::write(
        dir.path().join(".catalyst/config.yaml"),
        "version: 1\ncalendar:\n  start_hour: 30\n",
    )
    .unwrap();
    catalyst(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("calendar.start_hour=30"));
}

#[test]
fn config_show_reports_backends() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    catalyst(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coach:    open_router"))
        .stdout(predicate::str::contains("Storage:  local"));

    let config = json(&dir, &["config", "show"]);
    assert_eq!(config["sync"]["debounce_ms"], 1000);
    assert_eq!(config["storage"]["type"], "local");
}
