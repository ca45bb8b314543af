use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const PRESETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/presets.yaml");

fn trajectory() -> Command {
    Command::cargo_bin("trajectory").expect("trajectory bin")
}

#[test]
fn default_linear_throw_prints_summary() {
    trajectory()
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Projectile Throws (linear, base preset default-linear) ===",
        ))
        .stdout(predicate::str::contains("impact"))
        .stderr(predicate::str::contains("warning").not());
}

#[test]
fn repeated_angles_are_compared_in_one_table() {
    trajectory()
        .args(["--model", "quadratic", "--angle", "30", "--angle", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default-quadratic"))
        .stdout(predicate::str::contains("30.00"))
        .stdout(predicate::str::contains("60.00"));
}

#[test]
fn named_preset_is_loaded_from_file() {
    trajectory()
        .args(["--preset", "MOON-QUADRATIC", "--presets", PRESETS])
        .assert()
        .success()
        .stdout(predicate::str::contains("quadratic, base preset moon-quadratic"));
}

#[test]
fn unknown_preset_lists_available_names() {
    trajectory()
        .args(["--preset", "jupiter", "--presets", PRESETS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("earth-linear"));
}

#[test]
fn zero_gravity_warns_and_strict_fails() {
    let args = ["--gravity", "0", "--t-max", "5"];

    trajectory()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("degenerate"))
        .stderr(predicate::str::contains("warning: throw #1 stopped by the safety bound"));

    trajectory()
        .args(args)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("never reached the ground"));
}

#[test]
fn zero_linear_drag_is_rejected() {
    trajectory()
        .args(["--model", "linear", "--drag", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("drag_coefficient"));
}

#[test]
fn exports_write_csv_and_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("out/run.csv");
    let json_path = dir.path().join("out/run.json");

    trajectory()
        .args([
            "--model",
            "quadratic",
            "--samples",
            "50",
            "--csv",
            csv_path.to_str().unwrap(),
            "--json",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trajectory CSV"))
        .stdout(predicate::str::contains("Run JSON"));

    let csv = fs::read_to_string(&csv_path).expect("csv output");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("t_s,x_m,y_m,vx_m_s,vy_m_s,speed_m_s"));
    assert_eq!(lines.count(), 50, "one row per resampled point");

    let json = fs::read_to_string(&json_path).expect("json output");
    assert!(json.contains("\"status\": \"ground_impact\""));
    assert!(json.contains("\"sample_count\": 50"));
}

#[test]
fn series_flag_prints_speed_and_acceleration() {
    trajectory()
        .args(["--model", "quadratic", "--samples", "10", "--series", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("t_s,speed_m_s,acceleration_m_s2"))
        .stdout(predicate::str::contains("Projectile Throws").not());
}
