//! API transport layer.
//!
//! The `--api` source is either an `http(s)://` base URL or a local data
//! directory. Remote calls go through a blocking reqwest client with an
//! explicit timeout; directory sources are served by `dir.rs` over JSON
//! files with the same routes and error messages.
//!
//! Error contract: a failed call surfaces the server-provided `message`
//! verbatim when one exists, otherwise the caller's per-operation fallback.

pub mod dir;

use crate::domain::errors::AppError;
use crate::domain::models::Session;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_SOURCE: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

pub enum Backend {
    Remote(String),
    Dir(PathBuf),
}

pub fn resolve_backend(source: &str) -> Backend {
    if source.starts_with("http://") || source.starts_with("https://") {
        Backend::Remote(source.trim_end_matches('/').to_string())
    } else {
        Backend::Dir(PathBuf::from(source))
    }
}

pub struct Client {
    backend: Backend,
    timeout_ms: u64,
    token: Option<String>,
    stock_id: Option<i64>,
}

impl Client {
    pub fn new(source: &str, timeout_ms: u64, session: &Session) -> Client {
        Client {
            backend: resolve_backend(source),
            timeout_ms,
            token: session.token.clone(),
            stock_id: session.stock_id,
        }
    }

    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        fallback: &str,
    ) -> anyhow::Result<Value> {
        match &self.backend {
            Backend::Remote(base) => self.remote(base, method, path, query, body, fallback),
            Backend::Dir(dir_path) => dir::handle(
                dir_path,
                method,
                path,
                query,
                body,
                self.token.as_deref(),
                self.stock_id,
            ),
        }
    }

    fn remote(
        &self,
        base: &str,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        fallback: &str,
    ) -> anyhow::Result<Value> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()?;
        let url = format!("{base}{path}");
        let mut req = match method {
            Method::Get => client.get(&url),
            Method::Post => client.post(&url),
            Method::Put => client.put(&url),
            Method::Patch => client.patch(&url),
            Method::Delete => client.delete(&url),
        };
        if !query.is_empty() {
            req = req.query(query);
        }
        req = req.header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(stock_id) = self.stock_id {
            req = req.header("X-Stock-ID", stock_id.to_string());
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req
            .send()
            .map_err(|_| AppError::api(fallback.to_string()))?;
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
            return Err(AppError::api(message.unwrap_or_else(|| fallback.to_string())).into());
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|_| AppError::api(fallback.to_string()).into())
    }
}

/// Parse-don't-validate boundary: every payload is deserialized into its
/// explicit schema struct before the rest of the program sees it.
pub fn parse_payload<T: DeserializeOwned>(value: Value, what: &str) -> anyhow::Result<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::api(format!("malformed {what} payload: {e}")).into())
}
