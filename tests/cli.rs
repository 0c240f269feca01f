extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn flame() -> Command {
    let mut cmd = Command::cargo_bin("flame").unwrap();
    cmd.env("RUST_LOG", "info");
    cmd
}

#[test]
fn writes_a_png_of_the_requested_size() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("flame.png");
    flame()
        .args(&["-W", "64", "-H", "48", "-i", "5000", "-t", "1"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(predicate::path::is_file().eval(&output));
    let image = image::open(&output).unwrap().to_rgb();
    assert_eq!(image.dimensions(), (64, 48));
}

#[test]
fn accepts_functions_and_affine_parameters() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("spherical.png");
    flame()
        .args(&["-W", "32", "-H", "32", "-i", "2000", "-S", "3"])
        .args(&["-f", "spherical:1.0,sinusoidal:0.5"])
        .args(&["-a", "0.5,-0.2,0.1,0.3,0.4,-0.1"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn reads_a_configuration_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("from_json.png");
    let config = dir.path().join("flame.json");
    fs::write(
        &config,
        format!(
            r#"{{
                "size": {{"width": 40, "height": 30}},
                "iteration_count": 3000,
                "functions": [{{"name": "vortex_rings", "weight": 1.0}}],
                "output_path": {:?}
            }}"#,
            output.to_str().unwrap()
        ),
    )
    .unwrap();

    flame().arg("-c").arg(&config).assert().success();
    let image = image::open(&output).unwrap().to_rgb();
    assert_eq!(image.dimensions(), (40, 30));
}

#[test]
fn command_line_flags_override_the_configuration_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("override.png");
    let config = dir.path().join("flame.json");
    fs::write(&config, r#"{"width": 40, "height": 30, "iteration_count": 1000}"#).unwrap();

    flame()
        .arg("-c")
        .arg(&config)
        .args(&["-W", "20"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();
    let image = image::open(&output).unwrap().to_rgb();
    assert_eq!(image.dimensions(), (20, 30));
}

#[test]
fn a_missing_configuration_file_is_ignored() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("fallback.png");
    flame()
        .arg("-c")
        .arg(dir.path().join("nonexistent.json"))
        .args(&["-W", "16", "-H", "16", "-i", "500"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring configuration file"));
    assert!(output.exists());
}

#[test]
fn zero_weights_fail_without_writing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("never.png");
    flame()
        .args(&["-W", "16", "-H", "16", "-i", "500", "-f", "swirl:0"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure"));
    assert!(!output.exists());
}

#[test]
fn rejects_malformed_arguments() {
    flame().args(&["-t", "0"]).assert().failure();
    flame().args(&["-a", "1,2,3"]).assert().failure();
    flame().args(&["-W", "wide"]).assert().failure();
    flame().args(&["-f", "swirl:heavy"]).assert().failure();
}

#[test]
fn oversized_images_from_a_configuration_file_fail() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("huge.png");
    let config = dir.path().join("huge.json");
    fs::write(&config, r#"{"width": 1000000, "height": 30}"#).unwrap();

    flame()
        .arg("-c")
        .arg(&config)
        .args(&["-i", "100"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("image dimensions"));
    assert!(!output.exists());
}

#[test]
fn oversized_images_on_the_command_line_are_refused() {
    flame().args(&["-W", "65536"]).assert().failure();
}
