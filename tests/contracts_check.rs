mod common;

use common::TestEnv;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn contracts_check() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();

    let status = env.run_json(&["status"]);
    assert_eq!(status["ok"], true);
    validate("status.schema.json", &status["data"]);

    let layout = env.run_json(&["shelf", "grid", "1"]);
    assert_eq!(layout["ok"], true);
    validate("shelf-layout.schema.json", &layout["data"]);

    let product = env.run_json(&["product", "show", "101"]);
    assert_eq!(product["ok"], true);
    validate("product.schema.json", &product["data"]);

    let pick = env.run_json(&["shelf", "pick", "1", "1", "2"]);
    assert_eq!(pick["ok"], true);
    validate("position-selection.schema.json", &pick["data"]);

    let draft = env.run_json(&["draft", "show"]);
    assert_eq!(draft["ok"], true);
    validate("draft.schema.json", &draft["data"]);
}
