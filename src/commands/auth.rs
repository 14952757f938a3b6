use crate::api::Client;
use crate::cli::{Cli, Commands};
use crate::domain::errors::AppError;
use crate::domain::models::{Session, StatusReport};
use crate::services::{drafts, handoff, output, session, storage, users};
use serde_json::json;
use std::path::Path;

pub fn handle(cli: &Cli, base: &Path, source: &str, timeout_ms: u64) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Login { email, password } => {
            if email.trim().is_empty() || password.trim().is_empty() {
                return Err(AppError::validation("please fill in email and password").into());
            }
            let client = Client::new(source, timeout_ms, &Session::default());
            let token = users::login(&client, email, password)?;
            let mut sess = session::load(base)?;
            sess.token = Some(token);
            session::save(base, &sess)?;
            storage::audit(base, "login", json!({ "email": email }));
            output::print_one(cli.json, json!({ "authenticated": true }), |_| {
                "logged in".to_string()
            })
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            if name.trim().is_empty() || email.trim().is_empty() || password.trim().is_empty() {
                return Err(
                    AppError::validation("please fill in name, email, and password").into(),
                );
            }
            let client = Client::new(source, timeout_ms, &Session::default());
            let created = users::register(&client, name, email, password)?;
            storage::audit(base, "register", json!({ "email": email }));
            output::print_one(cli.json, created, |_| {
                "account created; run `estoq login`".to_string()
            })
        }
        Commands::Logout => {
            let mut sess = session::load(base)?;
            sess.token = None;
            // leaving the session also drops the working stock
            sess.stock_id = None;
            session::save(base, &sess)?;
            storage::audit(base, "logout", json!({}));
            output::print_one(cli.json, json!({ "authenticated": false }), |_| {
                "logged out".to_string()
            })
        }
        Commands::Status => {
            let sess = session::load(base)?;
            let draft = drafts::load(base)?;
            let report = StatusReport {
                authenticated: sess.token.is_some(),
                stock_id: sess.stock_id,
                pending_position: handoff::pending(base),
                draft_started: drafts::started(&draft),
            };
            output::print_one(cli.json, report, |r| {
                format!(
                    "authenticated: {}\nstock: {}\npending position: {}\ndraft started: {}",
                    r.authenticated,
                    r.stock_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    r.pending_position,
                    r.draft_started
                )
            })
        }
        _ => unreachable!("routed in main"),
    }
}
