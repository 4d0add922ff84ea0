//! End-to-end runs of the stubscan binary

use crate::common::{assert_valid_json, StubTree};

#[test]
fn test_extract_prints_registry_and_rewrites_manifest() {
    let tree = StubTree::new();
    tree.with_microbit_layout();

    let stdout = tree.run_extract_success();
    let registry = assert_valid_json(&stdout, "extract");

    assert!(stdout.ends_with("}\n"));
    assert!(registry["microbit"].is_array());
    assert!(tree.read_manifest()["modules"]["microbit.audio"].is_object());
    assert!(tree.read_manifest()["modules"].get("stale").is_none());
}

#[test]
fn test_extract_alias() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let stubs = tree.stub_root();
    let manifest = tree.manifest_path();

    let output = tree.run_cli(
        &[
            "x",
            "--stubs",
            stubs.to_str().unwrap(),
            "--manifest",
            manifest.to_str().unwrap(),
        ],
        None,
    );
    assert!(output.status.success());
}

#[test]
fn test_verbose_only_changes_logging() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let stubs = tree.stub_root();
    let manifest = tree.manifest_path();
    let args = [
        "extract",
        "--stubs",
        stubs.to_str().unwrap(),
        "--manifest",
        manifest.to_str().unwrap(),
    ];

    let quiet = tree.run_cli(&args, None);
    let mut verbose_args = args.to_vec();
    verbose_args.push("-v");
    let verbose = tree.run_cli(&verbose_args, None);

    assert!(quiet.status.success());
    assert!(verbose.status.success());
    assert_eq!(quiet.stdout, verbose.stdout);
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Built "));
    assert!(String::from_utf8_lossy(&verbose.stderr).contains("Built "));
}

#[test]
fn test_version_command() {
    let tree = StubTree::new();
    let manifest = tree.manifest_path();

    let output = tree.run_cli(
        &["version", "microbit.audio.play", "--manifest", manifest.to_str().unwrap()],
        None,
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");

    let output = tree.run_cli(
        &["version", "robot.move", "--manifest", manifest.to_str().unwrap()],
        None,
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n");
}

#[test]
fn test_missing_manifest_exit_code() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let stubs = tree.stub_root();
    let missing = tree.path().join("nowhere.json");

    let output = tree.run_cli(
        &[
            "extract",
            "--stubs",
            stubs.to_str().unwrap(),
            "--manifest",
            missing.to_str().unwrap(),
        ],
        None,
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(!missing.exists());
}

#[test]
fn test_missing_stub_root_exit_code() {
    let tree = StubTree::new();
    let manifest = tree.manifest_path();
    let nowhere = tree.path().join("no-stubs");

    let output = tree.run_cli(
        &[
            "extract",
            "--stubs",
            nowhere.to_str().unwrap(),
            "--manifest",
            manifest.to_str().unwrap(),
        ],
        None,
    );
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_broken_aggregator_exit_code() {
    let tree = StubTree::new();
    tree.add_stub("pkg/__init__.pyi", "class Broken(:\n");
    let stubs = tree.stub_root();
    let manifest = tree.manifest_path();
    let before = tree.read_manifest();

    let output = tree.run_cli(
        &[
            "extract",
            "--stubs",
            stubs.to_str().unwrap(),
            "--manifest",
            manifest.to_str().unwrap(),
        ],
        None,
    );
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(tree.read_manifest(), before);
}

#[test]
fn test_enrich_rejects_malformed_input() {
    let tree = StubTree::new();
    let output = tree.run_cli(&["enrich"], Some("{\"microbit\": [ not json"));

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_enrich_without_interpreter_exit_code() {
    let tree = StubTree::new();
    let output = tree.run_cli(
        &["enrich", "--python", "stubscan-no-such-python"],
        Some(r#"{"m": []}"#),
    );

    assert_eq!(output.status.code(), Some(6));
    assert!(output.stdout.is_empty());
}
