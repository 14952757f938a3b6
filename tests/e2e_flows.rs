mod common;

use common::TestEnv;
use serde_json::Value;

#[test]
fn login_stores_the_session_and_status_reflects_it() {
    let env = TestEnv::new();

    let before = env.run_json(&["status"]);
    assert_eq!(before["data"]["authenticated"], false);

    env.login();

    let after = env.run_json(&["status"]);
    assert_eq!(after["data"]["authenticated"], true);
    assert_eq!(after["data"]["stock_id"], Value::Null);
}

#[test]
fn login_rejects_wrong_credentials_with_the_server_message() {
    let env = TestEnv::new();
    let err = env.run_json_err(&["login", "--email", "ana@example.com", "--password", "wrong"]);
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "API_ERROR");
    assert_eq!(err["error"]["message"], "invalid email or password");
}

#[test]
fn login_requires_both_fields() {
    let env = TestEnv::new();
    let err = env.run_json_err(&["login", "--email", "ana@example.com", "--password", " "]);
    assert_eq!(err["error"]["code"], "VALIDATION");
}

#[test]
fn register_then_login_with_the_new_account() {
    let env = TestEnv::new();

    let created = env.run_json(&[
        "register",
        "--name",
        "Rui",
        "--email",
        "rui@example.com",
        "--password",
        "outrosegredo",
    ]);
    assert_eq!(created["data"]["email"], "rui@example.com");

    let out = env.run_json(&["login", "--email", "rui@example.com", "--password", "outrosegredo"]);
    assert_eq!(out["ok"], true);

    let dup = env.run_json_err(&[
        "register",
        "--name",
        "Rui",
        "--email",
        "rui@example.com",
        "--password",
        "x",
    ]);
    assert_eq!(dup["error"]["message"], "email already registered");
}

#[test]
fn logout_drops_the_token_and_the_selected_stock() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();

    let status = env.run_json(&["status"]);
    assert_eq!(status["data"]["stock_id"], 1);

    env.run_json(&["logout"]);

    let status = env.run_json(&["status"]);
    assert_eq!(status["data"]["authenticated"], false);
    assert_eq!(status["data"]["stock_id"], Value::Null);
}

#[test]
fn stock_commands_require_a_session() {
    let env = TestEnv::new();
    let err = env.run_json_err(&["stock", "list"]);
    assert_eq!(err["error"]["code"], "AUTH_REQUIRED");
}

#[test]
fn product_commands_require_a_selected_stock() {
    let env = TestEnv::new();
    env.login();
    let err = env.run_json_err(&["product", "list"]);
    assert_eq!(err["error"]["code"], "STOCK_REQUIRED");
}

#[test]
fn stock_select_current_clear_cycle() {
    let env = TestEnv::new();
    env.login();

    let list = env.run_json(&["stock", "list"]);
    assert_eq!(list["data"].as_array().expect("stock array").len(), 2);

    env.select_stock();
    let current = env.run_json(&["stock", "current"]);
    assert_eq!(current["data"]["name"], "Central Stock");

    env.run_json(&["stock", "clear"]);
    let current = env.run_json(&["stock", "current"]);
    assert_eq!(current["data"]["stockId"], Value::Null);
}

#[test]
fn selecting_a_missing_stock_fails_visibly() {
    let env = TestEnv::new();
    env.login();
    let err = env.run_json_err(&["stock", "select", "99"]);
    assert_eq!(err["error"]["code"], "API_ERROR");
    assert_eq!(err["error"]["message"], "stock not found");
}

#[test]
fn stock_create_update_delete() {
    let env = TestEnv::new();
    env.login();

    let created = env.run_json(&["stock", "create", "--name", "Annex", "--description", "spill-over"]);
    let id = created["data"]["id"].as_i64().expect("stock id").to_string();

    let updated = env.run_json(&["stock", "update", &id, "--name", "Annex B"]);
    assert_eq!(updated["data"]["name"], "Annex B");

    let deleted = env.run_json(&["stock", "delete", &id]);
    assert_eq!(deleted["ok"], true);
}

#[test]
fn product_list_show_adjust_delete_cycle() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();

    let list = env.run_json(&["product", "list"]);
    let products = list["data"].as_array().expect("product array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Pen Box");

    let shown = env.run_json(&["product", "show", "101"]);
    assert_eq!(shown["data"]["quantity"], 150);

    let adjusted = env.run_json(&["product", "adjust", "101", "175"]);
    assert_eq!(adjusted["data"]["quantity"], 175);

    let updated = env.run_json(&["product", "update", "101", "--description", "blue ballpoints"]);
    assert_eq!(updated["data"]["description"], "blue ballpoints");

    env.run_json(&["product", "delete", "101"]);
    let list = env.run_json(&["product", "list"]);
    assert_eq!(list["data"].as_array().expect("product array").len(), 0);
}

#[test]
fn adjust_rejects_negative_quantities() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();
    let mut cmd = env.cmd();
    let out = cmd
        .arg("--json")
        .arg("--api")
        .arg(env.api.to_str().expect("api path utf8"))
        .args(["product", "adjust", "101", "--", "-5"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let err: Value = serde_json::from_slice(&out).expect("error json");
    assert_eq!(err["error"]["message"], "quantity cannot be negative");
}

#[test]
fn shelf_list_create_and_view_grid() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();

    let list = env.run_json(&["shelf", "list"]);
    assert_eq!(list["data"].as_array().expect("shelf array").len(), 1);

    let created = env.run_json(&[
        "shelf", "create", "--name", "Shelf B", "--rows", "6", "--columns", "10",
        "--destination-type", "FRAGILE",
    ]);
    assert_eq!(created["data"]["rows"], 6);

    let grid = env.run_json(&["shelf", "grid", "1"]);
    assert_eq!(grid["data"]["items"][0]["productId"], 101);

    // text mode renders occupied and empty cells
    let mut cmd = env.cmd();
    cmd.arg("--api")
        .arg(env.api.to_str().expect("api path utf8"))
        .args(["shelf", "grid", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Pen Box"))
        .stdout(predicates::str::contains("empty"));
}

#[test]
fn shelf_create_rejects_zero_dimensions() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();
    let err = env.run_json_err(&[
        "shelf", "create", "--name", "Bad", "--rows", "0", "--columns", "5",
    ]);
    assert_eq!(err["error"]["code"], "VALIDATION");
}

#[test]
fn shelf_cell_shows_the_product_or_reports_empty() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();

    let occupied = env.run_json(&["shelf", "cell", "1", "0", "1"]);
    assert_eq!(occupied["data"]["name"], "Pen Box");

    let empty = env.run_json(&["shelf", "cell", "1", "3", "3"]);
    assert_eq!(empty["data"]["occupied"], false);
}

#[test]
fn missing_shelf_fetch_fails_with_the_server_message() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();
    let err = env.run_json_err(&["shelf", "grid", "42"]);
    assert_eq!(err["error"]["code"], "API_ERROR");
    assert_eq!(err["error"]["message"], "shelf not found");
}

#[test]
fn template_search_and_apply_prefill_the_draft() {
    let env = TestEnv::new();
    env.login();
    env.select_stock();

    let short = env.run_json_err(&["template", "search", "p"]);
    assert_eq!(short["error"]["code"], "VALIDATION");

    let found = env.run_json(&["template", "search", "pen"]);
    assert_eq!(found["data"].as_array().expect("template array").len(), 2);

    let applied = env.run_json(&["template", "apply", "789000111"]);
    assert_eq!(applied["data"]["draft"]["name"], "Blue Pen");
    assert_eq!(applied["data"]["draft"]["ean"], "789000111");
    assert_eq!(applied["data"]["draft"]["type"], "stationery");

    let missing = env.run_json_err(&["template", "show", "000"]);
    assert_eq!(missing["error"]["message"], "template not found");
}
