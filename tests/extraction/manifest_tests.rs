//! Version tiers and the regenerated module summary

use crate::common::{entry, StubTree};
use stubscan::{extract_stub_tree, VersionManifest};

#[test]
fn test_module_summary_regenerated() {
    let tree = StubTree::new();
    tree.with_microbit_layout();

    let mut manifest = VersionManifest::load(&tree.manifest_path()).unwrap();
    extract_stub_tree(&tree.stub_root(), "microbit", &mut manifest).unwrap();
    manifest.save(&tree.manifest_path()).unwrap();

    let saved = tree.read_manifest();
    let modules = saved["modules"].as_object().unwrap();
    let names: Vec<&String> = modules.keys().collect();
    assert_eq!(
        names,
        vec!["microbit.audio", "microbit.compass", "microbit", "robot"]
    );
    assert!(!modules.contains_key("stale"));
    assert!(!modules.contains_key(""));

    assert_eq!(modules["microbit.audio"]["type"], "module");
    assert_eq!(modules["microbit.audio"]["documentation"], "Play sounds.");
    assert_eq!(modules["microbit.audio"]["version"], 2);
    assert!(modules["robot"]["documentation"].is_null());

    // The hand-maintained tiers survive the rewrite
    assert_eq!(saved["versions"]["microbit"]["audio"], 2);
}

#[test]
fn test_entry_versions_follow_nearest_tier() {
    let tree = StubTree::new().with_manifest(
        r#"{"versions": {"microbit": {"Pin": 2, "audio": {"stop": 3}}}, "modules": {}}"#,
    );
    tree.with_microbit_layout();

    let mut manifest = VersionManifest::load(&tree.manifest_path()).unwrap();
    let registry = extract_stub_tree(&tree.stub_root(), "microbit", &mut manifest).unwrap();
    let registry = serde_json::to_value(&registry).unwrap();

    assert_eq!(entry(&registry, "microbit", "Pin")["version"], 2);
    assert_eq!(entry(&registry, "microbit.audio", "stop")["version"], 3);
    assert_eq!(entry(&registry, "microbit.audio", "play")["version"], 1);
    assert_eq!(entry(&registry, "microbit", "sleep")["version"], 1);
}
