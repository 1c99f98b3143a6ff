mod common;

use breedline::error::ExitCode;
use breedline::phase::Phase;

use common::{BreedlineCli, plan_at, ready_to_commit, stderr, stdout};

// ============================================================================
// version / completions / phases
// ============================================================================

#[test]
fn version_json() {
    let cli = BreedlineCli::new();
    let output = cli.run(&["version", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["name"], "breedline");
}

#[test]
fn completions_bash() {
    let cli = BreedlineCli::new();
    let output = cli.run(&["completions", "bash"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("breedline"));
}

#[test]
fn phases_json_lists_eight_phases() {
    let cli = BreedlineCli::new();
    let output = cli.run(&["phases", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let rows: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[1]["phase"], "COMMITTED");
    assert_eq!(rows[1]["requiresConfirmation"], true);
    assert_eq!(rows[7]["phase"], "COMPLETE");
}

// ============================================================================
// plan new / status
// ============================================================================

#[test]
fn new_then_status() {
    let cli = BreedlineCli::new();
    let output = cli.run(&[
        "plan", "new", "--id", "litter-a", "--name", "Spring", "--species", "dog",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "litter-a");

    let output = cli.run(&["plan", "status", "litter-a", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["phase"], "PLANNING");
    assert_eq!(report["checklist"]["target"], "COMMITTED");

    let unmet = report["checklist"]["requirements"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["satisfied"] == false)
        .count();
    // Dam, sire, breed and the cycle lock are still missing.
    assert_eq!(unmet, 4);
}

#[test]
fn status_of_missing_plan_fails() {
    let cli = BreedlineCli::new();
    let output = cli.run(&["plan", "status", "ghost"]);
    assert_eq!(output.status.code(), Some(ExitCode::STORE_ERROR));
}

// ============================================================================
// plan advance
// ============================================================================

#[test]
fn advance_with_yes_commits() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("litter-a"));

    let output = cli.run(&["plan", "advance", "litter-a", "--yes"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("advanced to COMMITTED"));
    assert_eq!(cli.read("litter-a").phase(), Phase::Committed);

    let types: Vec<String> = cli
        .events()
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(types, vec!["PlanLoaded", "PhaseAdvanced"]);
}

#[test]
fn advance_prompt_accepts_yes() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("litter-a"));

    let output = cli.run_with_input(&["plan", "advance", "litter-a"], "y\n");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Commit this breeding plan?"));
    assert_eq!(cli.read("litter-a").phase(), Phase::Committed);
}

#[test]
fn advance_prompt_declined() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("litter-a"));

    let output = cli.run_with_input(&["plan", "advance", "litter-a"], "n\n");
    assert_eq!(output.status.code(), Some(ExitCode::DECLINED));
    assert_eq!(cli.read("litter-a").phase(), Phase::Planning);
}

#[test]
fn advance_closed_stdin_declines() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("litter-a"));

    let output = cli.run(&["plan", "advance", "litter-a"]);
    assert_eq!(output.status.code(), Some(ExitCode::DECLINED));
}

#[test]
fn advance_blocked_names_missing_evidence() {
    let cli = BreedlineCli::new();
    cli.seed(&plan_at("litter-a", Phase::Committed));

    let output = cli.run(&["plan", "advance", "litter-a", "--yes"]);
    assert_eq!(output.status.code(), Some(ExitCode::BLOCKED));
    assert!(stderr(&output).contains("cannot advance yet"));
    assert_eq!(cli.read("litter-a").phase(), Phase::Committed);
}

#[test]
fn advance_complete_plan_is_blocked() {
    let cli = BreedlineCli::new();
    cli.seed(&plan_at("done", Phase::Complete));

    let output = cli.run(&["plan", "advance", "done", "--yes"]);
    assert_eq!(output.status.code(), Some(ExitCode::BLOCKED));
    assert!(stderr(&output).contains("no further phase"));
}

// ============================================================================
// plan evidence
// ============================================================================

#[test]
fn evidence_set_unlocks_advance() {
    let cli = BreedlineCli::new();
    cli.seed(&plan_at("litter-a", Phase::Committed));

    let output = cli.run(&["plan", "evidence", "set", "litter-a", "cycle-start", "2025-03-01"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("[x]"));

    let output = cli.run(&["plan", "advance", "litter-a", "--yes"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(cli.read("litter-a").phase(), Phase::Bred);

    let output = cli.run(&["plan", "evidence", "clear", "litter-a", "cycle_start"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let plan = cli.read("litter-a");
    assert_eq!(plan.phase(), Phase::Bred);
    assert!(plan.evidence.cycle_start.actual.is_none());
}

#[test]
fn evidence_unknown_field_suggests() {
    let cli = BreedlineCli::new();
    cli.seed(&plan_at("litter-a", Phase::Committed));

    let output = cli.run(&["plan", "evidence", "set", "litter-a", "brith", "2025-03-01"]);
    assert_eq!(output.status.code(), Some(ExitCode::PHASE_ERROR));
    assert!(stderr(&output).contains("did you mean 'birth'"));
}

#[test]
fn evidence_bad_date_rejected() {
    let cli = BreedlineCli::new();
    cli.seed(&plan_at("litter-a", Phase::Committed));

    let output = cli.run(&["plan", "evidence", "set", "litter-a", "birth", "03/01/2025"]);
    assert_eq!(output.status.code(), Some(ExitCode::PHASE_ERROR));
}

// ============================================================================
// plan validate / list
// ============================================================================

#[test]
fn validate_reports_warnings_and_strict_fails() {
    let cli = BreedlineCli::new();
    let path = cli.path().join("odd.yaml");
    std::fs::write(&path, "id: odd\nstatus: ON_HOLD\n").unwrap();
    let file = path.to_str().unwrap();

    let output = cli.run(&["plan", "validate", file]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("ON_HOLD"));

    let output = cli.run(&["plan", "validate", "--strict", file]);
    assert_eq!(output.status.code(), Some(ExitCode::CONFIG_ERROR));
}

#[test]
fn validate_json_reports_each_file() {
    let cli = BreedlineCli::new();
    let good = cli.path().join("good.yaml");
    let bad = cli.path().join("bad.yaml");
    std::fs::write(&good, "id: good\nstatus: PLANNING\n").unwrap();
    std::fs::write(&bad, "id: [broken\n").unwrap();

    let output = cli.run(&[
        "plan",
        "validate",
        "--format",
        "json",
        good.to_str().unwrap(),
        bad.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(ExitCode::CONFIG_ERROR));
    let reports: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[1]["valid"], false);
}

#[test]
fn list_shows_seeded_plans() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("a"));
    cli.seed(&plan_at("b", Phase::Weaned));

    let output = cli.run(&["plan", "list", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let reports: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    let phases: Vec<&str> = reports.iter().map(|r| r["phase"].as_str().unwrap()).collect();
    assert_eq!(phases, vec!["PLANNING", "WEANED"]);
}

#[test]
fn list_skips_unreadable_plan() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("a"));
    std::fs::write(cli.plans_dir().join("broken.yaml"), "id: [broken\n").unwrap();

    let output = cli.run(&["plan", "list", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let reports: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["planId"], "a");
    assert!(stderr(&output).contains("skipped broken"));
}

// ============================================================================
// usage / logging / event sinks
// ============================================================================

#[test]
fn unknown_subcommand_is_usage_error() {
    let cli = BreedlineCli::new();
    let output = cli.run(&["plan", "frobnicate"]);
    assert_eq!(output.status.code(), Some(ExitCode::USAGE_ERROR));
}

#[test]
fn help_exits_cleanly() {
    let cli = BreedlineCli::new();
    let output = cli.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("breedline"));
}

#[test]
fn json_logs_on_stderr() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("litter-a"));

    let output = cli.run(&["-v", "--log-format", "json", "plan", "advance", "litter-a", "--yes"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let advanced = stderr(&output)
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .any(|line| line["message"] == "phase advanced" && line["plan_id"] == "litter-a");
    assert!(advanced, "{}", stderr(&output));
}

#[test]
fn events_to_stderr_with_dash() {
    let cli = BreedlineCli::new();
    cli.seed(&ready_to_commit("litter-a"));

    let output = cli.run(&[
        "plan",
        "advance",
        "litter-a",
        "--yes",
        "--events-file",
        "-",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("\"type\":\"PhaseAdvanced\""));
    assert!(!cli.events_file().exists());
}
