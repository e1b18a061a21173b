//! CLI command integration tests.
//! Each test uses a temp directory via MOTION_DATA_DIR for full isolation.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn motion_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("motion").unwrap();
    cmd.env("MOTION_DATA_DIR", data_dir.path());
    cmd
}

/// 33 landmarks with both arms raised `deg` degrees from the torso.
fn arms(deg: f64) -> Value {
    let mut lms = vec![json!({"x": 0.5, "y": 0.5, "visibility": 1.0}); 33];
    let rad = deg.to_radians();
    for (shoulder, elbow, hip, x, side) in [(11, 13, 23, 0.6, 1.0), (12, 14, 24, 0.4, -1.0)] {
        lms[shoulder] = json!({"x": x, "y": 0.3, "visibility": 1.0});
        lms[hip] = json!({"x": x, "y": 0.6, "visibility": 1.0});
        lms[elbow] = json!({
            "x": x + side * 0.15 * rad.sin(),
            "y": 0.3 + 0.15 * rad.cos(),
            "visibility": 1.0,
        });
    }
    Value::Array(lms)
}

fn write_stream(dir: &TempDir, name: &str, lines: &[Value]) -> PathBuf {
    let path = dir.path().join(name);
    let body: Vec<String> = lines.iter().map(Value::to_string).collect();
    std::fs::write(&path, body.join("\n")).unwrap();
    path
}

/// Three seconds at rest, then `reps` full raises at 30 fps.
fn arm_raise_session(reps: usize) -> Vec<Value> {
    let mut lines = vec![arms(34.0); 100];
    for _ in 0..reps {
        lines.extend(std::iter::repeat_n(arms(110.0), 20));
        lines.extend(std::iter::repeat_n(arms(34.0), 20));
    }
    lines
}

#[test]
fn exercises_lists_registry() {
    let dir = TempDir::new().unwrap();
    motion_cmd(&dir)
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("armRaise"))
        .stdout(predicate::str::contains("squat"))
        .stdout(predicate::str::contains("heelSlide"));
}

#[test]
fn replay_calibrates_counts_and_saves() {
    let dir = TempDir::new().unwrap();
    let input = write_stream(&dir, "raises.jsonl", &arm_raise_session(3));

    motion_cmd(&dir)
        .arg("replay")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("calibrated: baseline 34"))
        .stdout(predicate::str::contains("rep 3"))
        .stdout(predicate::str::contains("reps: 3"))
        .stdout(predicate::str::contains("baseline: 34"));

    motion_cmd(&dir)
        .args(["baseline", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("armRaise"))
        .stdout(predicate::str::contains("34"));
}

#[test]
fn replay_reuses_stored_baseline() {
    let dir = TempDir::new().unwrap();
    let input = write_stream(&dir, "raises.jsonl", &arm_raise_session(2));
    motion_cmd(&dir).arg("replay").arg(&input).assert().success();

    // second run skips calibration and counts from the first frame
    motion_cmd(&dir)
        .arg("replay")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("calibrating").not())
        .stdout(predicate::str::contains("reps: 2"));
}

#[test]
fn replay_skip_calibration_uses_default() {
    let dir = TempDir::new().unwrap();
    let input = write_stream(&dir, "raises.jsonl", &arm_raise_session(1));
    motion_cmd(&dir)
        .args(["replay", "--skip-calibration"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("baseline: 30"))
        .stdout(predicate::str::contains("reps: 1"));
}

#[test]
fn replay_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_stream(&dir, "raises.jsonl", &arm_raise_session(1));
    let output = motion_cmd(&dir)
        .args(["replay", "--json"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(lines.iter().all(|v| v.get("event").is_some()));
    assert!(
        lines
            .iter()
            .any(|v| v["event"] == "rep_count" && v["count"] == 1 && v.get("t_ms").is_some())
    );
    let summary = lines.last().unwrap();
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["reps"], 1);
    assert_eq!(summary["baseline"], 34);
}

#[test]
fn replay_rejects_malformed_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.jsonl");
    std::fs::write(&path, "null\nnull\n{\"landmarks\": \"nope\"}\n").unwrap();
    motion_cmd(&dir)
        .arg("replay")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn replay_rejects_unknown_exercise() {
    let dir = TempDir::new().unwrap();
    let input = write_stream(&dir, "gap.jsonl", &[Value::Null]);
    motion_cmd(&dir)
        .args(["replay", "--exercise", "plank"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown exercise: plank"));
}

#[test]
fn replay_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("motion.toml");
    std::fs::write(&config, "smoothing_alpha = 2.0\n").unwrap();
    let input = write_stream(&dir, "gap.jsonl", &[Value::Null]);
    motion_cmd(&dir)
        .args(["replay", "--config"])
        .arg(&config)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("smoothing_alpha"));

    std::fs::write(&config, "quality_gate = \"enforce\"\n").unwrap();
    motion_cmd(&dir)
        .args(["replay", "--skip-calibration", "--config"])
        .arg(&config)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("reps: 0"));
}

#[test]
fn angles_prints_per_frame() {
    let dir = TempDir::new().unwrap();
    let input = write_stream(&dir, "pose.jsonl", &[arms(90.0), Value::Null]);
    motion_cmd(&dir)
        .arg("angles")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("shoulder 90/90"))
        .stdout(predicate::str::contains("33 ms  no pose"));
}

#[test]
fn baseline_clear_single_and_all() {
    let dir = TempDir::new().unwrap();
    let input = write_stream(&dir, "raises.jsonl", &arm_raise_session(0));
    motion_cmd(&dir).arg("replay").arg(&input).assert().success();
    motion_cmd(&dir)
        .args(["replay", "--exercise", "squat", "--skip-calibration"])
        .arg(&input)
        .assert()
        .success();

    motion_cmd(&dir)
        .args(["baseline", "clear", "--exercise", "squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared baseline for squat"));
    motion_cmd(&dir)
        .args(["baseline", "show", "--exercise", "squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no stored baselines"));

    motion_cmd(&dir)
        .args(["baseline", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared 1 baselines"));
}
