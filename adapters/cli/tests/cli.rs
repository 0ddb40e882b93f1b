use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/calendar.json")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_space-shooter"))
        .args(args)
        .output()
        .expect("failed to launch space-shooter binary")
}

fn frame_files(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(directory)
        .expect("frame directory exists")
        .map(|entry| {
            entry
                .expect("readable entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

#[test]
fn renders_a_frame_per_action_until_the_grid_is_clear() {
    let scratch = TempDir::new().expect("temp dir");
    let output_dir = scratch.path().join("frames");
    let input = fixture();

    let output = run(&[
        input.to_str().expect("utf-8 path"),
        "--output",
        output_dir.to_str().expect("utf-8 path"),
    ]);

    assert!(output.status.success(), "{output:?}");
    let frames = frame_files(&output_dir);
    assert_eq!(frames.len(), 16);
    assert_eq!(frames.first().map(String::as_str), Some("frame_00000.ppm"));
    assert_eq!(frames.last().map(String::as_str), Some("frame_00015.ppm"));

    let first = fs::read(output_dir.join("frame_00000.ppm")).expect("first frame");
    assert!(first.starts_with(b"P6\n122 178\n255\n"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("destroyed 3 enemies with 4 shots over 15 actions (0 remaining)"));
    assert!(stdout.contains("wrote 16 frames"));
}

#[test]
fn frame_interval_thins_the_output() {
    let scratch = TempDir::new().expect("temp dir");
    let output_dir = scratch.path().join("frames");
    let input = fixture();

    let output = run(&[
        input.to_str().expect("utf-8 path"),
        "--output",
        output_dir.to_str().expect("utf-8 path"),
        "--frame-every",
        "4",
        "--keep-bullets",
    ]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(frame_files(&output_dir).len(), 5);
}

#[test]
fn plan_lists_every_column_pass() {
    let input = fixture();

    let output = run(&[input.to_str().expect("utf-8 path"), "--plan"]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let actions: Vec<&str> = stdout
        .lines()
        .filter(|line| line.contains("week="))
        .collect();
    assert_eq!(actions.len(), 21);
    assert_eq!(
        actions
            .iter()
            .filter(|line| line.contains("SHOOT"))
            .count(),
        4
    );
    assert!(actions[1].trim_start().starts_with("1 SHOOT week=0, day=1"));
    assert!(stdout.contains("21 actions planned by the column strategy"));
}

#[test]
fn malformed_week_is_rejected() {
    let scratch = TempDir::new().expect("temp dir");
    let input = scratch.path().join("short.json");
    fs::write(
        &input,
        r#"{"weeks": [{"days": [{"level": 1}, {"level": 0}, {"level": 0}]}]}"#,
    )
    .expect("fixture written");

    let output = run(&[input.to_str().expect("utf-8 path"), "--plan"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse contribution data"), "{stderr}");
    assert!(stderr.contains("exactly 7 days, found 3"), "{stderr}");
}

#[test]
fn theme_overrides_frame_geometry() {
    let scratch = TempDir::new().expect("temp dir");
    let theme = scratch.path().join("theme.toml");
    fs::write(&theme, "[layout]\ncell_size = 8\ncell_spacing = 2\npadding = 10\n")
        .expect("theme written");
    let output_dir = scratch.path().join("frames");
    let input = fixture();

    let output = run(&[
        input.to_str().expect("utf-8 path"),
        "--output",
        output_dir.to_str().expect("utf-8 path"),
        "--theme",
        theme.to_str().expect("utf-8 path"),
        "--frame-every",
        "100",
    ]);

    assert!(output.status.success(), "{output:?}");
    let frames = frame_files(&output_dir);
    assert_eq!(frames.len(), 2);
    let first = fs::read(output_dir.join(&frames[0])).expect("first frame");
    assert!(first.starts_with(b"P6\n50 90\n255\n"));
}

#[test]
fn oversized_theme_is_rejected_before_rendering() {
    let scratch = TempDir::new().expect("temp dir");
    let theme = scratch.path().join("theme.toml");
    fs::write(&theme, "[layout]\ncell_spacing = 4294967295\n").expect("theme written");
    let output_dir = scratch.path().join("frames");
    let input = fixture();

    let output = run(&[
        input.to_str().expect("utf-8 path"),
        "--output",
        output_dir.to_str().expect("utf-8 path"),
        "--theme",
        theme.to_str().expect("utf-8 path"),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceed 16384 pixels per side"), "{stderr}");
    assert!(!output_dir.exists());
}
