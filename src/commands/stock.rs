use crate::api::Client;
use crate::cli::{Cli, StockCommands};
use crate::domain::errors::AppError;
use crate::domain::models::{StockInput, StockPatch};
use crate::services::{output, session, stocks, storage};
use serde_json::json;
use std::path::Path;

pub fn handle(
    cli: &Cli,
    command: &StockCommands,
    base: &Path,
    source: &str,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    let mut sess = session::load(base)?;
    session::require_token(&sess)?;
    let client = Client::new(source, timeout_ms, &sess);

    match command {
        StockCommands::List => {
            let stocks = stocks::all(&client)?;
            output::print_out(cli.json, &stocks, |s| {
                format!(
                    "{}\t{}\t{}",
                    s.id,
                    s.name,
                    s.description.as_deref().unwrap_or("")
                )
            })
        }
        StockCommands::Select { id } => {
            let stock = stocks::get(&client, *id)?;
            sess.stock_id = Some(stock.id);
            session::save(base, &sess)?;
            storage::audit(base, "stock_select", json!({ "stockId": stock.id }));
            output::print_one(cli.json, stock, |s| format!("selected stock {}", s.name))
        }
        StockCommands::Current => match sess.stock_id {
            Some(id) => {
                let stock = stocks::get(&client, id)?;
                output::print_one(cli.json, stock, |s| format!("{}\t{}", s.id, s.name))
            }
            None => output::print_one(cli.json, json!({ "stockId": null }), |_| {
                "no stock selected".to_string()
            }),
        },
        StockCommands::Clear => {
            sess.stock_id = None;
            session::save(base, &sess)?;
            storage::audit(base, "stock_clear", json!({}));
            output::print_one(cli.json, json!({ "stockId": null }), |_| {
                "stock selection cleared".to_string()
            })
        }
        StockCommands::Show { id } => {
            let stock = stocks::get(&client, *id)?;
            output::print_one(cli.json, stock, |s| {
                format!(
                    "{}\t{}\t{}",
                    s.id,
                    s.name,
                    s.description.as_deref().unwrap_or("")
                )
            })
        }
        StockCommands::Create { name, description } => {
            if name.trim().is_empty() {
                return Err(AppError::validation("stock name is required").into());
            }
            let input = StockInput {
                name: name.clone(),
                description: description.clone(),
            };
            let stock = stocks::create(&client, &input)?;
            storage::audit(base, "stock_create", json!({ "stockId": stock.id }));
            output::print_one(cli.json, stock, |s| format!("created stock {}", s.name))
        }
        StockCommands::Update {
            id,
            name,
            description,
        } => {
            let patch = StockPatch {
                name: name.clone(),
                description: description.clone(),
            };
            let stock = stocks::update(&client, *id, &patch)?;
            storage::audit(base, "stock_update", json!({ "stockId": stock.id }));
            output::print_one(cli.json, stock, |s| format!("updated stock {}", s.name))
        }
        StockCommands::Delete { id } => {
            stocks::delete(&client, *id)?;
            if sess.stock_id == Some(*id) {
                sess.stock_id = None;
                session::save(base, &sess)?;
            }
            storage::audit(base, "stock_delete", json!({ "stockId": id }));
            output::print_one(cli.json, json!({ "deleted": id }), |_| {
                format!("removed stock {id}")
            })
        }
    }
}
