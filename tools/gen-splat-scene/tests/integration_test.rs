//! Integration tests for gen-splat-scene
//!
//! Runs the built binary against temp directories and checks the JSON it writes.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const SMALL_SCENE: &str = r#"
seed = 99

[curve_tube]
count = 150

[warped_disk]
count = 200

[blob_clusters]
clusters = 3
per_cluster = 50

[output]
pretty = false
"#;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gen-splat-scene"))
        .args(args)
        .output()
        .expect("Failed to run gen-splat-scene")
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("Failed to read output");
    serde_json::from_str(&text).expect("Output is not valid JSON")
}

fn write_manifest(dir: &Path, contents: &str) -> String {
    let path = dir.join("scene.toml");
    std::fs::write(&path, contents).expect("Failed to write manifest");
    path.to_str().unwrap().to_string()
}

/// Manifest-driven scene produces a full gaussian3d_v1 document
#[test]
fn test_scene_from_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = write_manifest(dir.path(), SMALL_SCENE);
    let out = dir.path().join("nested/scene.json");

    let output = run(&["scene", "-c", &config, "-o", out.to_str().unwrap()]);
    assert!(output.status.success(), "scene command failed: {output:?}");

    let value = read_json(&out);
    assert_eq!(value["format"], "gaussian3d_v1");
    let gaussians = value["gaussians"].as_array().unwrap();
    assert_eq!(gaussians.len(), 150 + 200 + 150);

    for g in gaussians {
        let rotation: Vec<f64> = g["rotation"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c.as_f64().unwrap())
            .collect();
        let norm = rotation.iter().map(|c| c * c).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "rotation norm {norm}");

        let opacity = g["opacity"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&opacity));
        for s in g["scale"].as_array().unwrap() {
            assert!(s.as_f64().unwrap() > 0.0);
        }
    }
}

/// Same seed twice gives byte-identical files; a different seed does not
#[test]
fn test_scene_is_deterministic() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = write_manifest(dir.path(), SMALL_SCENE);
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    let c = dir.path().join("c.json");

    for (out, seed) in [(&a, "5"), (&b, "5"), (&c, "6")] {
        let output = run(&["scene", "-c", &config, "-s", seed, "-o", out.to_str().unwrap()]);
        assert!(output.status.success());
    }

    let bytes_a = std::fs::read(&a).unwrap();
    assert_eq!(bytes_a, std::fs::read(&b).unwrap());
    assert_ne!(bytes_a, std::fs::read(&c).unwrap());
}

/// Skipping layers and writing the point layout
#[test]
fn test_scene_skip_and_points_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = write_manifest(dir.path(), SMALL_SCENE);
    let out = dir.path().join("points.json");

    let output = run(&[
        "scene",
        "-c",
        &config,
        "--skip",
        "curve-tube,blob-clusters",
        "--points-only",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let value = read_json(&out);
    assert!(value.get("format").is_none());
    let gaussians = value["gaussians"].as_array().unwrap();
    assert_eq!(gaussians.len(), 200);
    assert!(gaussians[0].get("position").is_some());
    assert!(gaussians[0].get("scale").is_none());
}

/// Grid fixture: n^3 points with corner colors
#[test]
fn test_grid_fixture() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("grid.json");

    let output = run(&[
        "grid",
        "-n",
        "3",
        "--spacing",
        "1.0",
        "--center",
        "0",
        "-1",
        "0",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "grid command failed: {output:?}");

    let value = read_json(&out);
    let points = value["gaussians"].as_array().unwrap();
    assert_eq!(points.len(), 27);
    assert_eq!(points[0]["position"], serde_json::json!([-1.0, -2.0, -1.0]));
    assert_eq!(points[0]["color"], serde_json::json!([0.0, 0.0, 0.0]));
    assert_eq!(points[26]["color"], serde_json::json!([1.0, 1.0, 1.0]));
}

/// Galaxy fixture writes exactly the requested number of points
#[test]
fn test_galaxy_fixture() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("galaxy.json");

    let output = run(&["galaxy", "-n", "2000", "--compact", "-o", out.to_str().unwrap()]);
    assert!(output.status.success());

    let value = read_json(&out);
    assert_eq!(value["gaussians"].as_array().unwrap().len(), 2000);
}

/// Invalid parameters fail before anything is written
#[test]
fn test_invalid_parameters_write_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = write_manifest(dir.path(), "[warped_disk]\ncount = 0\n");
    let out = dir.path().join("scene.json");

    let output = run(&["scene", "-c", &config, "-o", out.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!out.exists(), "no output file should be written on failure");

    let grid_out = dir.path().join("grid.json");
    let output = run(&["grid", "-n", "0", "-o", grid_out.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!grid_out.exists());
}

/// Out-of-range precision and overflowing cluster counts are errors, not crashes
#[test]
fn test_bounds_checked_inputs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("grid.json");

    let output = run(&["grid", "-n", "2", "--precision", "400", "-o", out.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!out.exists());

    let config = write_manifest(
        dir.path(),
        "[blob_clusters]\nclusters = 8589934592\nper_cluster = 8589934592\n",
    );
    let scene_out = dir.path().join("scene.json");
    for args in [
        vec!["check", config.as_str()],
        vec!["scene", "-c", config.as_str(), "-o", scene_out.to_str().unwrap()],
    ] {
        let output = run(&args);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("panicked"), "{stderr}");
    }
    assert!(!scene_out.exists());
}

/// Non-coprime knot windings are rejected by `check`
#[test]
fn test_check_rejects_bad_knot() {
    let dir = tempdir().expect("Failed to create temp dir");
    let good = write_manifest(dir.path(), SMALL_SCENE);
    assert!(run(&["check", &good]).status.success());

    let bad_path = dir.path().join("bad.toml");
    std::fs::write(
        &bad_path,
        r#"
[curve_tube.knot]
p = 2
q = 4
major_radius = 2.5
minor_radius = 1.0
center = [0.0, 0.0, 0.0]
"#,
    )
    .unwrap();
    assert!(!run(&["check", bad_path.to_str().unwrap()]).status.success());
}

/// `inspect` reads back both layouts
#[test]
fn test_inspect_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = write_manifest(dir.path(), SMALL_SCENE);
    let scene = dir.path().join("scene.json");
    let grid = dir.path().join("grid.json");

    assert!(run(&["scene", "-c", &config, "-o", scene.to_str().unwrap()]).status.success());
    assert!(run(&["grid", "-n", "2", "-o", grid.to_str().unwrap()]).status.success());

    assert!(run(&["inspect", scene.to_str().unwrap()]).status.success());
    assert!(run(&["inspect", grid.to_str().unwrap()]).status.success());

    let missing = dir.path().join("missing.json");
    assert!(!run(&["inspect", missing.to_str().unwrap()]).status.success());
}
