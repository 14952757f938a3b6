use assert_cmd::Command;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub api: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let api = make_fixture_api(tmp.path());
        Self {
            _tmp: tmp,
            home,
            api,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("estoq").expect("estoq binary");
        cmd.env("HOME", &self.home);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .arg("--api")
            .arg(self.api.to_str().expect("api path utf8"))
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_err(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .arg("--api")
            .arg(self.api.to_str().expect("api path utf8"))
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }

    pub fn login(&self) {
        let out = self.run_json(&["login", "--email", "ana@example.com", "--password", "segredo"]);
        assert_eq!(out["ok"], true);
    }

    pub fn select_stock(&self) {
        let out = self.run_json(&["stock", "select", "1"]);
        assert_eq!(out["ok"], true);
    }

    pub fn handoff_path(&self) -> PathBuf {
        self.home.join(".config/estoq/handoff.json")
    }

    pub fn handoff(&self) -> Option<Value> {
        let path = self.handoff_path();
        if !path.exists() {
            return None;
        }
        let raw = fs::read_to_string(path).expect("read handoff slot");
        Some(serde_json::from_str(&raw).expect("valid handoff json"))
    }

    pub fn draft_file(&self) -> Option<Value> {
        let path = self.home.join(".config/estoq/draft.json");
        if !path.exists() {
            return None;
        }
        let raw = fs::read_to_string(path).expect("read draft file");
        Some(serde_json::from_str(&raw).expect("valid draft json"))
    }
}

pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// One stock, one 4x5 shelf with (0,1) occupied, one registered user.
pub fn make_fixture_api(base: &Path) -> PathBuf {
    let api = base.join("api");
    fs::create_dir_all(&api).expect("create api dir");

    fs::write(
        api.join("users.json"),
        serde_json::to_string_pretty(&json!([
            {
                "id": 1,
                "name": "Ana",
                "email": "ana@example.com",
                "passwordSha256": sha256_hex("segredo")
            }
        ]))
        .expect("serialize users"),
    )
    .expect("write users");

    fs::write(
        api.join("stocks.json"),
        serde_json::to_string_pretty(&json!([
            { "id": 1, "name": "Central Stock", "description": "main warehouse" },
            { "id": 2, "name": "Overflow", "description": null }
        ]))
        .expect("serialize stocks"),
    )
    .expect("write stocks");

    fs::write(
        api.join("shelves.json"),
        serde_json::to_string_pretty(&json!([
            {
                "id": 1,
                "name": "Shelf A",
                "rows": 4,
                "columns": 5,
                "destinationType": "GENERAL",
                "stockId": 1
            }
        ]))
        .expect("serialize shelves"),
    )
    .expect("write shelves");

    fs::write(
        api.join("products.json"),
        serde_json::to_string_pretty(&json!([
            {
                "id": 101,
                "ean": "111111111",
                "name": "Pen Box",
                "type": "stationery",
                "lotType": "box",
                "quantityPerLot": 100,
                "quantity": 150,
                "shelfId": 1,
                "position": { "row": 0, "column": 1 },
                "stockId": 1
            }
        ]))
        .expect("serialize products"),
    )
    .expect("write products");

    fs::write(
        api.join("templates.json"),
        serde_json::to_string_pretty(&json!([
            { "ean": "789000111", "name": "Blue Pen", "type": "stationery", "lotType": "box" },
            { "ean": "789000222", "name": "Black Pen" }
        ]))
        .expect("serialize templates"),
    )
    .expect("write templates");

    api
}
