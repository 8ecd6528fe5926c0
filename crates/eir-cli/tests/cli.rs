//! End-to-end tests of the `eir` binary.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const DEAL_JSON: &str = r#"{
  "deal_id": "DN0000",
  "functional_currency": "USD",
  "principal": 400000000.0,
  "setup_costs": 10000000.0,
  "start_date": "2021-04-07",
  "end_date": "2025-04-07",
  "first_interest_date": "2021-10-07",
  "interest_rate": 0.0546,
  "structure": "amortizing",
  "frequency": "semi_annual",
  "day_count": "actual_actual",
  "interest_type": "floating",
  "resets": [
    { "date": "2022-04-07", "rate": 0.05129 },
    { "date": "2022-10-07", "rate": 0.0592 },
    { "date": "2023-04-07", "rate": 0.05239 }
  ]
}"#;

const DEAL_YAML: &str = "\
deal_id: DN0001
functional_currency: EUR
principal: 1000000.0
discount_pct: 2.0
start_date: 2024-01-15
end_date: 2026-01-15
first_interest_date: 2024-07-15
interest_rate: 0.04
structure: bullet
frequency: semi_annual
day_count: actual_360
interest_type: fixed
";

/// A temporary config directory plus deal files.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn eir(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_eir"));
        cmd.env("EIR_CONFIG_DIR", self.config_dir()).env_remove("RUST_LOG");
        cmd
    }
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr:\n{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// =============================================================================
// SCHEDULE
// =============================================================================

#[test]
fn schedule_prints_table() {
    let ws = Workspace::new();
    let deal = ws.write("deal.json", DEAL_JSON);

    ws.eir()
        .args(["schedule", path_arg(&deal)])
        .assert()
        .success()
        .stdout(predicate::str::contains("DN0000"))
        .stdout(predicate::str::contains("2025-04-07"))
        .stdout(predicate::str::contains("390000000.00"));
}

#[test]
fn schedule_json_has_one_record_per_date() {
    let ws = Workspace::new();
    let deal = ws.write("deal.json", DEAL_JSON);

    let report = json_output(ws.eir().args(["schedule", path_arg(&deal), "--format", "json"]));

    assert_eq!(report["deal_id"], "DN0000");
    assert_eq!(report["method"], "complex");
    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 9);
    assert!(records[0]["effective_interest"].is_null());
    assert_eq!(records[0]["amortized_cost"], 390_000_000.0);
    assert!(records[8]["amortized_cost"].as_f64().unwrap().abs() <= 1.0);
}

#[test]
fn schedule_reads_yaml() {
    let ws = Workspace::new();
    let deal = ws.write("deal.yaml", DEAL_YAML);

    let report = json_output(ws.eir().args([
        "schedule",
        path_arg(&deal),
        "--method",
        "simple",
        "--format",
        "json",
    ]));

    assert_eq!(report["deal_id"], "DN0001");
    assert_eq!(report["currency"], "EUR");
    assert_eq!(report["method"], "simple");
    assert_eq!(report["records"].as_array().unwrap().len(), 5);
    assert_eq!(report["records"][0]["amortized_cost"], 980_000.0);
}

#[test]
fn schedule_rejects_unknown_extension() {
    let ws = Workspace::new();
    let deal = ws.write("deal.txt", DEAL_JSON);

    ws.eir()
        .args(["schedule", path_arg(&deal)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported deal file"));
}

#[test]
fn schedule_rejects_invalid_terms() {
    let ws = Workspace::new();
    let deal = ws.write("deal.json", &DEAL_JSON.replace("400000000.0", "-1.0"));

    ws.eir()
        .args(["schedule", path_arg(&deal)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected"));
}

// =============================================================================
// COMPARE
// =============================================================================

#[test]
fn compare_json_reports_periods_and_years() {
    let ws = Workspace::new();
    let deal = ws.write("deal.json", DEAL_JSON);

    let report = json_output(ws.eir().args(["compare", path_arg(&deal), "-f", "json"]));

    assert_eq!(report["rows"].as_array().unwrap().len(), 8);
    let years: Vec<i64> = report["years"]
        .as_array()
        .unwrap()
        .iter()
        .map(|y| y["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2021, 2022, 2023, 2024, 2025]);
    assert!(report["complex_seconds"].as_f64().unwrap() >= 0.0);
}

#[test]
fn compare_table_shows_timings() {
    let ws = Workspace::new();
    let deal = ws.write("deal.json", DEAL_JSON);

    ws.eir()
        .args(["compare", path_arg(&deal), "--years-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("By calendar year"))
        .stdout(predicate::str::contains("Efficiency"));
}

// =============================================================================
// BATCH
// =============================================================================

#[test]
fn batch_keeps_input_order_and_reports_failures() {
    let ws = Workspace::new();
    let first = ws.write("a.json", DEAL_JSON);
    let broken = ws.write("b.json", "{ not json");
    let second = ws.write("c.yaml", DEAL_YAML);

    let output = ws
        .eir()
        .args(["batch", path_arg(&first), path_arg(&broken), path_arg(&second), "-f", "json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["report"]["deal_id"], "DN0000");
    assert!(entries[1]["error"].as_str().unwrap().contains("Invalid deal file"));
    assert_eq!(entries[2]["report"]["deal_id"], "DN0001");
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn config_set_changes_defaults() {
    let ws = Workspace::new();
    let deal = ws.write("deal.json", DEAL_JSON);

    ws.eir().args(["config", "set", "default_method", "simple"]).assert().success();
    ws.eir().args(["config", "set", "format", "json"]).assert().success();

    ws.eir()
        .args(["config", "get", "default_method"])
        .assert()
        .success()
        .stdout(predicate::str::contains("simple"));

    let report = json_output(ws.eir().args(["schedule", path_arg(&deal)]));
    assert_eq!(report["method"], "simple");

    ws.eir().args(["config", "reset", "--all"]).assert().success();
    ws.eir()
        .args(["config", "get", "method", "-f", "minimal"])
        .assert()
        .success()
        .stdout("complex\n");
}

#[test]
fn config_rejects_bad_values() {
    let ws = Workspace::new();

    ws.eir()
        .args(["config", "set", "max_iterations", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("iteration limit"));
    ws.eir()
        .args(["config", "set", "colors", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
