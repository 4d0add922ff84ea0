//! Custom assertions for integration tests

use serde_json::Value;

/// Assert that output is valid JSON and return parsed value
pub fn assert_valid_json(output: &str, context: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|e| {
        panic!(
            "Expected valid JSON ({}): {}\nOutput:\n{}",
            context, e, output
        )
    })
}

/// Find the entry `name` of `module` in registry JSON
pub fn entry<'a>(registry: &'a Value, module: &str, name: &str) -> &'a Value {
    registry[module]
        .as_array()
        .unwrap_or_else(|| panic!("module '{}' missing from registry", module))
        .iter()
        .find(|e| e["acResult"] == name)
        .unwrap_or_else(|| panic!("entry '{}' missing from module '{}'", name, module))
}

/// Assert that an entry carries exactly these kinds, in order
pub fn assert_kinds(entry: &Value, expected: &[&str]) {
    let kinds: Vec<&str> = entry["type"]
        .as_array()
        .unwrap_or_else(|| panic!("entry has no type list: {}", entry))
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(kinds, expected, "kinds of {}", entry["acResult"]);
}

/// Names of a signature bucket
pub fn bucket_names<'a>(signature: &'a Value, bucket: &str) -> Vec<&'a str> {
    signature[bucket]
        .as_array()
        .unwrap_or_else(|| panic!("signature has no '{}' bucket", bucket))
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect()
}
