use projectile_calculator::export::{HEADER, read_trajectory_csv, write_run_json, write_trajectory_csv};
use projectile_calculator::{ModelKind, TrajectoryRun, compute_trajectory};

fn quadratic_run() -> TrajectoryRun {
    compute_trajectory(ModelKind::QuadraticNumeric, 100.0, 45.0, 0.005, 10.0, 9.81, 0.005, 1.0)
        .expect("quadratic run")
}

fn linear_run() -> TrajectoryRun {
    compute_trajectory(ModelKind::LinearClosedForm, 50.0, 60.0, 1.0, 10.0, 9.81, 0.01, 1.0)
        .expect("linear run")
}

#[test]
fn quadratic_csv_preserves_samples() {
    let run = quadratic_run();
    let mut buffer = Vec::new();
    write_trajectory_csv(&mut buffer, &run).expect("write csv");

    let text = String::from_utf8(buffer.clone()).expect("utf8");
    assert_eq!(text.lines().next(), Some(HEADER.join(",").as_str()));

    let rows = read_trajectory_csv(buffer.as_slice()).expect("read csv");
    assert_eq!(rows.len(), run.trajectory.len());
    for (row, sample) in rows.iter().zip(&run.trajectory) {
        assert_eq!(row.t_s, sample.t);
        assert_eq!(row.x_m, sample.x);
        assert_eq!(row.y_m, sample.y);
        assert_eq!(row.vx_m_s, sample.velocity.map(|v| v[0]));
        assert_eq!(row.speed_m_s, sample.speed());
    }
}

#[test]
fn closed_form_csv_leaves_velocity_blank() {
    let run = linear_run();
    let mut buffer = Vec::new();
    write_trajectory_csv(&mut buffer, &run).expect("write csv");

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let first = reader.records().next().expect("first row").expect("record");
    assert_eq!(first.len(), HEADER.len());
    assert_eq!(&first[3], "");
    assert_eq!(&first[5], "");

    let rows = read_trajectory_csv(buffer.as_slice()).expect("read csv");
    assert!(rows.iter().all(|r| r.vx_m_s.is_none() && r.speed_m_s.is_none()));
    assert_eq!(rows.last().map(|r| r.y_m), Some(0.0));
}

#[test]
fn run_json_carries_metrics_and_outcome() {
    let run = quadratic_run();
    let mut buffer = Vec::new();
    write_run_json(&mut buffer, &run, "#1: v0=100, angle=45°").expect("write json");

    let value: serde_json::Value = serde_json::from_slice(&buffer).expect("parse json");
    assert_eq!(value["label"], "#1: v0=100, angle=45°");
    assert_eq!(value["model"], "quadratic_numeric");
    assert_eq!(value["degenerate"], false);
    assert_eq!(value["outcome"]["status"], "ground_impact");
    assert_eq!(value["parameters"]["v0_m_s"], 100.0);
    assert_eq!(value["sample_count"], run.trajectory.len());
    assert_eq!(
        value["samples"].as_array().map(Vec::len),
        Some(run.trajectory.len())
    );
    let range = value["metrics"]["range_m"].as_f64().expect("range");
    assert!((range - run.metrics.range_m).abs() <= 1e-9 * run.metrics.range_m);
}

#[test]
fn degenerate_run_json_names_the_bound() {
    let run = compute_trajectory(ModelKind::LinearClosedForm, 50.0, 45.0, 1.0, 10.0, 0.0, 0.5, 1.0)
        .expect("bounded run");
    let mut buffer = Vec::new();
    write_run_json(&mut buffer, &run, "flat").expect("write json");

    let value: serde_json::Value = serde_json::from_slice(&buffer).expect("parse json");
    assert_eq!(value["degenerate"], true);
    assert_eq!(value["outcome"]["status"], "safety_bound");
    assert!(value["outcome"]["t_bound"].as_f64().is_some());
}
