//! Registry contents produced from stub trees

use serde_json::{json, Value};

use crate::common::{assert_kinds, bucket_names, entry, StubTree};
use stubscan::{extract_stub_tree, StubscanError, VersionManifest};

fn extract(tree: &StubTree) -> Value {
    let mut manifest = VersionManifest::load(&tree.manifest_path()).unwrap();
    let registry = extract_stub_tree(&tree.stub_root(), "microbit", &mut manifest).unwrap();
    serde_json::to_value(&registry).unwrap()
}

#[test]
fn test_modules_listed_in_traversal_order() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let registry = extract(&tree);

    let modules: Vec<&str> = registry
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        modules,
        vec!["microbit.audio", "microbit.compass", "microbit", "", "robot"]
    );
}

#[test]
fn test_type_adopts_first_base_constructor() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let registry = extract(&tree);

    let pin = entry(&registry, "microbit", "Pin");
    assert_kinds(pin, &["type", "function"]);
    assert_eq!(pin["documentation"], "A GPIO pin.");
    assert_eq!(pin["signature"], entry(&registry, "microbit", "Analog")["signature"]);

    let signature = &pin["signature"];
    assert_eq!(signature["firstParamIsSelfOrCls"], true);
    assert_eq!(bucket_names(signature, "positionalOnlyArgs"), vec!["self"]);
    assert_eq!(bucket_names(signature, "positionalOrKeywordArgs"), vec!["pin", "mode"]);
    assert_eq!(signature["positionalOrKeywordArgs"][1]["defaultValue"], "0");
    assert_eq!(signature["positionalOrKeywordArgs"][0]["argType"], "int");

    let digital = entry(&registry, "microbit", "Digital");
    assert!(digital.get("signature").is_none());
}

#[test]
fn test_method_signature_shape() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let registry = extract(&tree);

    let movement = entry(&registry, "robot", "move");
    assert_eq!(
        movement["signature"],
        json!({
            "positionalOnlyArgs": [{"name": "self", "defaultValue": null, "argType": null}],
            "positionalOrKeywordArgs": [{"name": "amount", "defaultValue": null, "argType": null}],
            "varArgs": null,
            "keywordOnlyArgs": [{"name": "speed", "defaultValue": "1", "argType": null}],
            "varKwargs": null,
            "firstParamIsSelfOrCls": true
        })
    );
}

#[test]
fn test_re_exports_copy_by_value() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let registry = extract(&tree);

    let play = entry(&registry, "microbit", "play");
    assert_eq!(play, entry(&registry, "microbit.audio", "play"));
    assert_eq!(play["version"], 2);
    assert_eq!(play["documentation"], "Play a sound.");
    assert_eq!(
        play["signature"]["positionalOrKeywordArgs"][2]["defaultValue"],
        "pin0"
    );

    let compass = entry(&registry, "microbit", "compass");
    assert_kinds(compass, &["module"]);
    assert_eq!(compass["version"], 1);

    let names: Vec<&str> = registry["microbit"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["acResult"].as_str())
        .collect();
    assert!(!names.contains(&"Any"));
    assert_eq!(names.last(), Some(&"__doc__"));
}

#[test]
fn test_re_export_source_built_first() {
    let tree = StubTree::new();
    tree.add_stub("aaa.pyi", "from zzz import helper as helper, gone as gone\n")
        .add_stub("zzz.pyi", "def helper(x: int) -> int:\n    \"\"\"Helps.\"\"\"\n    ...\n");
    let registry = extract(&tree);

    let modules: Vec<&String> = registry.as_object().unwrap().keys().collect();
    assert_eq!(modules, vec!["aaa", "zzz"]);

    let helper = entry(&registry, "aaa", "helper");
    assert_kinds(helper, &["function"]);
    assert_eq!(helper["documentation"], "Helps.");
    assert_kinds(entry(&registry, "aaa", "gone"), &["module"]);
}

#[test]
fn test_variables_and_top_level_namespace() {
    let tree = StubTree::new();
    tree.with_microbit_layout();
    let registry = extract(&tree);

    let pin0 = entry(&registry, "microbit", "pin0");
    assert_kinds(pin0, &["variable"]);
    assert_eq!(pin0["varType"], "Pin");
    assert!(pin0.get("signature").is_none());

    let print = entry(&registry, "", "print");
    let signature = &print["signature"];
    assert_eq!(signature["varArgs"], json!({"name": "values", "argType": "object"}));
    assert_eq!(bucket_names(signature, "keywordOnlyArgs"), vec!["sep", "end"]);
    assert_eq!(signature["keywordOnlyArgs"][0]["defaultValue"], "' '");
    assert_eq!(signature["keywordOnlyArgs"][1]["defaultValue"], "'\\n'");

    let doc = entry(&registry, "microbit", "__doc__");
    assert_kinds(doc, &["module"]);
    assert_eq!(
        doc["documentation"],
        "Pins, images, sounds, temperature and volume."
    );
}

#[test]
fn test_broken_module_is_skipped() {
    let tree = StubTree::new();
    tree.add_stub("good.pyi", "def ok() -> None: ...\n")
        .add_stub("bad.pyi", "def broken(:\n");
    let registry = extract(&tree);

    assert!(registry.get("bad").is_none());
    assert_kinds(entry(&registry, "good", "ok"), &["function"]);
}

#[test]
fn test_broken_aggregator_aborts() {
    let tree = StubTree::new();
    tree.add_stub("pkg/__init__.pyi", "class Broken(:\n")
        .add_stub("pkg/mod.pyi", "def ok() -> None: ...\n");

    let mut manifest = VersionManifest::load(&tree.manifest_path()).unwrap();
    let err = extract_stub_tree(&tree.stub_root(), "microbit", &mut manifest).unwrap_err();
    assert!(matches!(err, StubscanError::ParseFailure { .. }), "{}", err);
}
