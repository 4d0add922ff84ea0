//! Whole-registry behavior: docs, pass-through, round trip, idempotence

use crate::common::ScriptedEnv;
use serde_json::json;
use stubscan::enrich::{enrich_document, enrich_registry, LiveParamKind, LiveParameter};
use stubscan::schema::{document_from_str, registry_from_str, to_json_pretty};
use stubscan::{Entry, EntryKind, ParamHint, Parameter, Registry, Signature};

fn populated_registry() -> Registry {
    let mut sleep = Entry::new("sleep", 1);
    sleep.kinds.insert(EntryKind::Function);
    sleep.documentation = "Wait.".to_string();
    sleep.signature = Some(Signature {
        positional_or_keyword_args: vec![Parameter::named("n")],
        ..Default::default()
    });

    let mut scroll = Entry::new("scroll", 2);
    scroll.kinds.insert(EntryKind::Function);
    scroll.documentation = "Scroll text.".to_string();
    scroll.params = Some(vec![ParamHint::named("text")]);

    let mut pin = Entry::new("pin0", 1);
    pin.kinds.insert(EntryKind::Variable);
    pin.documentation = "Pin 0.".to_string();
    pin.var_type = Some("Pin".to_string());

    let mut registry = Registry::new();
    registry.insert("microbit".to_string(), vec![sleep, scroll, pin]);
    registry
}

fn full_env() -> ScriptedEnv {
    ScriptedEnv::new()
        .with_module("microbit")
        .with_module("builtins")
        .with_doc("microbit", "sleep", "Other.")
        .with_doc("microbit", "temperature", "temperature()\n\nReturn the temperature.")
        .with_doc("builtins", "len", "Return the number of items.\r\nOf a container.")
        .with_signature(
            "microbit",
            "temperature",
            vec![LiveParameter::new("self", LiveParamKind::PositionalOnly)],
        )
}

#[test]
fn test_populated_registry_round_trips_unchanged() {
    let input = to_json_pretty(&populated_registry()).unwrap();
    let mut registry = registry_from_str(&input, "test").unwrap();

    let mut env = full_env();
    enrich_registry(&mut env, &mut registry);

    assert_eq!(to_json_pretty(&registry).unwrap(), input);
    assert!(!env.queried("doc"));
    assert!(!env.queried("signature"));
}

#[test]
fn test_unknown_fields_survive() {
    let input = r#"{"m": [{"acResult": "f", "type": ["function"], "documentation": "", "version": 1, "custom": [1, 2]}]}"#;
    let mut registry = registry_from_str(input, "test").unwrap();

    enrich_registry(&mut ScriptedEnv::new().with_module("m"), &mut registry);

    let output: serde_json::Value =
        serde_json::from_str(&to_json_pretty(&registry).unwrap()).unwrap();
    assert_eq!(output["m"][0]["custom"], serde_json::json!([1, 2]));
}

#[test]
fn test_document_rewrites_only_filled_fields() {
    let input = json!({
        "webgl": [{
            "acResult": "draw",
            "type": ["function"],
            "signature": {"positionalOrKeywordArgs": [{"name": "a"}]},
            "params": [{"name": "b", "defaultValue": null, "argType": "int"}]
        }],
        "m": [
            {"acResult": "f", "type": ["function"], "documentation": "", "version": 1},
            {"acResult": "g", "type": ["function"], "params": [{"name": "a", "defaultValue": null}]}
        ]
    });
    let mut document = document_from_str(&to_json_pretty(&input).unwrap(), "test").unwrap();

    let mut env = ScriptedEnv::new()
        .with_module("m")
        .with_doc("m", "f", "Does f.")
        .with_help("m", "f", "f(x)\n");
    let report = enrich_document(&mut env, &mut document, "test").unwrap();

    let mut expected = input.clone();
    expected["m"][0]["documentation"] = json!("Does f.");
    expected["m"][0]["params"] = json!([{"name": "x"}]);
    assert_eq!(
        to_json_pretty(&document).unwrap(),
        to_json_pretty(&expected).unwrap()
    );
    assert_eq!(report.modules_skipped, 1);
    assert_eq!(report.shapes_filled, 1);
}

#[test]
fn test_document_rejects_entry_without_name() {
    let mut document =
        document_from_str(r#"{"m": [{"type": ["function"]}]}"#, "test").unwrap();
    let mut env = ScriptedEnv::new().with_module("m");

    assert!(enrich_document(&mut env, &mut document, "test").is_err());
    assert!(env.calls.is_empty());
}

#[test]
fn test_documentation_backfill() {
    let mut temperature = Entry::new("temperature", 1);
    temperature.kinds.insert(EntryKind::Function);
    let mut len = Entry::new("len", 1);
    len.kinds.insert(EntryKind::Function);
    len.params = Some(vec![ParamHint::named("obj")]);
    let mut missing = Entry::new("missing", 1);
    missing.kinds.insert(EntryKind::Variable);

    let mut registry = populated_registry();
    registry["microbit"].push(temperature);
    registry.insert(String::new(), vec![len, missing]);

    let report = enrich_registry(&mut full_env(), &mut registry);

    // Existing docs are never replaced
    assert_eq!(registry["microbit"][0].documentation, "Wait.");
    assert_eq!(registry["microbit"][3].documentation, "Return the temperature.");
    assert_eq!(registry[""][0].documentation, "Return the number of items.\nOf a container.");
    assert_eq!(registry[""][1].documentation, "");
    assert_eq!(report.docs_filled, 2);

    let signature = registry["microbit"][3].signature.as_ref().unwrap();
    assert!(signature.first_param_is_self_or_cls);
}

#[test]
fn test_unimportable_module_passes_through() {
    let mut entry = Entry::new("webgl_draw", 1);
    entry.kinds.insert(EntryKind::Function);
    let mut registry = Registry::new();
    registry.insert("webgl".to_string(), vec![entry]);
    let before = registry.clone();

    let mut env = ScriptedEnv::new().with_doc("webgl", "webgl_draw", "Draw.");
    let report = enrich_registry(&mut env, &mut registry);

    assert_eq!(registry, before);
    assert_eq!(report.modules_skipped, 1);
    assert_eq!(env.calls, vec!["import:webgl:".to_string()]);
}

#[test]
fn test_enrichment_is_idempotent() {
    let mut foo = Entry::new("foo", 1);
    foo.kinds.insert(EntryKind::Function);
    let mut bar = Entry::new("bar", 1);
    bar.kinds.insert(EntryKind::Function);

    let mut registry = Registry::new();
    registry.insert("m".to_string(), vec![foo, bar]);

    let env = || {
        ScriptedEnv::new()
            .with_module("m")
            .with_doc("m", "foo", "foo(a, b [, c])\n\nDoes stuff.")
            .with_help("m", "foo", "foo(a, b [, c])\n\nDoes stuff.")
            .with_argspec("m", "bar", &["x", "y"], &["2"])
    };

    enrich_registry(&mut env(), &mut registry);
    let once = to_json_pretty(&registry).unwrap();
    enrich_registry(&mut env(), &mut registry);
    let twice = to_json_pretty(&registry).unwrap();

    assert_eq!(once, twice);
    assert_eq!(registry["m"][0].documentation, "Does stuff.");
    assert_eq!(
        registry["m"][0].params,
        Some(vec![ParamHint::named("a"), ParamHint::named("b")])
    );
}
