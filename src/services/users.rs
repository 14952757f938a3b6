use crate::api::{Client, Method};
use crate::domain::errors::AppError;
use serde_json::{json, Value};

pub fn login(client: &Client, email: &str, password: &str) -> anyhow::Result<String> {
    let body = json!({ "email": email, "password": password });
    let v = client.request(Method::Post, "/login", &[], Some(&body), "could not sign in")?;
    v.get("token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::api("login response did not include a token").into())
}

pub fn register(
    client: &Client,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Value> {
    let body = json!({ "name": name, "email": email, "password": password });
    client.request(
        Method::Post,
        "/register",
        &[],
        Some(&body),
        "could not create the account",
    )
}
