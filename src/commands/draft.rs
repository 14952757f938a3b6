use crate::api::Client;
use crate::cli::{Cli, DraftCommands, GridMode};
use crate::domain::errors::AppError;
use crate::domain::models::{DraftReport, ProductDraft};
use crate::services::{drafts, grid, output, products, session, shelves, storage};
use serde_json::json;
use std::path::Path;

use super::product::detail_lines;

pub fn handle(
    cli: &Cli,
    command: &DraftCommands,
    base: &Path,
    source: &str,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    // the form screen regained focus: consume any pending selection first
    let (mut draft, adopted) = drafts::absorb_pending(base)?;

    match command {
        DraftCommands::Show => {
            let report = drafts::report(draft, adopted);
            output::print_block(cli.json, report, report_lines)
        }
        DraftCommands::Set {
            ean,
            name,
            description,
            kind,
            lot_type,
            quantity_per_lot,
            weight,
            quantity,
            expiry_date,
            shelf,
        } => {
            if let Some(ean) = ean {
                draft.ean = Some(ean.clone());
            }
            if let Some(name) = name {
                draft.name = Some(name.clone());
            }
            if let Some(description) = description {
                draft.description = Some(description.clone());
            }
            if let Some(kind) = kind {
                draft.kind = Some(kind.clone());
            }
            if let Some(lot_type) = lot_type {
                draft.lot_type = Some(lot_type.clone());
            }
            if let Some(quantity_per_lot) = quantity_per_lot {
                draft.quantity_per_lot = Some(*quantity_per_lot);
            }
            if let Some(weight) = weight {
                draft.weight = Some(*weight);
            }
            if let Some(quantity) = quantity {
                draft.quantity = Some(*quantity);
            }
            if let Some(expiry_date) = expiry_date {
                draft.expiry_date = Some(expiry_date.clone());
            }
            if let Some(shelf) = shelf {
                draft.shelf_id = Some(*shelf);
            }
            drafts::save(base, &draft)?;
            let report = drafts::report(draft, adopted);
            output::print_block(cli.json, report, report_lines)
        }
        DraftCommands::SelectPosition => {
            let Some(shelf_id) = draft.shelf_id else {
                return Err(AppError::validation(
                    "choose a shelf first: estoq draft set --shelf <id>",
                )
                .into());
            };
            let sess = session::load(base)?;
            session::require_token(&sess)?;
            session::require_stock(&sess)?;
            let client = Client::new(source, timeout_ms, &sess);
            let layout = shelves::layout(&client, shelf_id)?;
            output::print_block(cli.json, layout, |l| grid::render(l, GridMode::Select))
        }
        DraftCommands::Save => {
            // validation first: an incomplete draft never issues a request
            let input = drafts::creation_payload(&draft)?;
            let sess = session::load(base)?;
            session::require_token(&sess)?;
            session::require_stock(&sess)?;
            let client = Client::new(source, timeout_ms, &sess);
            // the draft survives a failed submission untouched
            let product = products::create(&client, &input)?;
            drafts::clear(base)?;
            storage::audit(base, "draft_save", json!({ "productId": product.id }));
            output::print_block(cli.json, product, |p| detail_lines(p))
        }
        DraftCommands::Clear { position, shelf } => {
            if *position {
                draft.position = None;
            } else if *shelf {
                // a position cannot outlive the shelf choice it belongs to
                draft.shelf_id = None;
                draft.position = None;
            } else {
                draft = ProductDraft::default();
            }
            drafts::save(base, &draft)?;
            let report = drafts::report(draft, adopted);
            output::print_block(cli.json, report, report_lines)
        }
    }
}

pub fn report_lines(report: &DraftReport) -> String {
    let d = &report.draft;
    let unset = |v: &Option<String>| v.clone().unwrap_or_else(|| "(unset)".to_string());
    let mut out = String::new();
    if report.adopted_position {
        out.push_str("applied pending position selection\n");
    }
    out.push_str(&format!("name: {}\n", unset(&d.name)));
    out.push_str(&format!("ean: {}\n", unset(&d.ean)));
    out.push_str(&format!(
        "quantity: {}\n",
        d.quantity
            .map(|q| q.to_string())
            .unwrap_or_else(|| "(unset)".to_string())
    ));
    if d.kind.is_some() {
        out.push_str(&format!("type: {}\n", unset(&d.kind)));
    }
    if d.lot_type.is_some() || d.quantity_per_lot.is_some() {
        out.push_str(&format!(
            "lot: {} ({} per lot)\n",
            unset(&d.lot_type),
            d.quantity_per_lot.unwrap_or(0)
        ));
    }
    if let Some(weight) = d.weight {
        out.push_str(&format!("weight: {weight} kg\n"));
    }
    if d.expiry_date.is_some() {
        out.push_str(&format!("expiry: {}\n", unset(&d.expiry_date)));
    }
    out.push_str(&format!(
        "shelf: {}\n",
        d.shelf_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(unset)".to_string())
    ));
    out.push_str(&format!(
        "position: {}\n",
        report
            .position_label
            .clone()
            .unwrap_or_else(|| "(not selected)".to_string())
    ));
    if !report.missing.is_empty() {
        out.push_str(&format!("missing before save: {}\n", report.missing.join(", ")));
    }
    out
}
