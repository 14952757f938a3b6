use crate::api::Client;
use crate::cli::{Cli, ProductCommands, TemplateCommands};
use crate::domain::errors::AppError;
use crate::domain::models::{Product, ProductPatch};
use crate::services::{drafts, output, products, session, storage};
use serde_json::json;
use std::path::Path;

pub fn handle(
    cli: &Cli,
    command: &ProductCommands,
    base: &Path,
    source: &str,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    let sess = session::load(base)?;
    session::require_token(&sess)?;
    session::require_stock(&sess)?;
    let client = Client::new(source, timeout_ms, &sess);

    match command {
        ProductCommands::List => {
            let products = products::recent(&client)?;
            output::print_out(cli.json, &products, |p| {
                format!("{}\t{}\t{}", p.id, p.name, p.quantity)
            })
        }
        ProductCommands::Show { id } => {
            let product = products::details(&client, *id)?;
            output::print_block(cli.json, product, |p| detail_lines(p))
        }
        ProductCommands::Update {
            id,
            ean,
            name,
            description,
            kind,
            lot_type,
            quantity_per_lot,
            weight,
            expiry_date,
        } => {
            let patch = ProductPatch {
                ean: ean.clone(),
                name: name.clone(),
                description: description.clone(),
                kind: kind.clone(),
                lot_type: lot_type.clone(),
                quantity_per_lot: *quantity_per_lot,
                weight: *weight,
                expiry_date: expiry_date.clone(),
            };
            if patch == ProductPatch::default() {
                return Err(AppError::validation("nothing to update").into());
            }
            let product = products::update(&client, *id, &patch)?;
            storage::audit(base, "product_update", json!({ "productId": product.id }));
            output::print_one(cli.json, product, |p| format!("updated {}", p.name))
        }
        ProductCommands::Adjust { id, quantity } => {
            let product = products::adjust_quantity(&client, *id, *quantity)?;
            storage::audit(
                base,
                "product_adjust",
                json!({ "productId": product.id, "quantity": product.quantity }),
            );
            output::print_one(cli.json, product, |p| {
                format!("{} now at {}", p.name, p.quantity)
            })
        }
        ProductCommands::Delete { id } => {
            products::delete(&client, *id)?;
            storage::audit(base, "product_delete", json!({ "productId": id }));
            output::print_one(cli.json, json!({ "deleted": id }), |_| {
                format!("removed product {id}")
            })
        }
    }
}

pub fn handle_templates(
    cli: &Cli,
    command: &TemplateCommands,
    base: &Path,
    source: &str,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    let sess = session::load(base)?;
    session::require_token(&sess)?;
    session::require_stock(&sess)?;
    let client = Client::new(source, timeout_ms, &sess);

    match command {
        TemplateCommands::Search { query } => {
            if query.trim().chars().count() < 2 {
                return Err(
                    AppError::validation("type at least 2 characters to search").into(),
                );
            }
            let templates = products::search_templates(&client, query.trim())?;
            output::print_out(cli.json, &templates, |t| format!("{}\t{}", t.ean, t.name))
        }
        TemplateCommands::Show { ean } => {
            let template = products::template_by_ean(&client, ean)?;
            output::print_one(cli.json, template, |t| format!("{}\t{}", t.ean, t.name))
        }
        TemplateCommands::Apply { ean } => {
            // entering the product form with a template prefill
            let (mut draft, adopted) = drafts::absorb_pending(base)?;
            let template = products::template_by_ean(&client, ean)?;
            draft.name = Some(template.name.clone());
            draft.ean = Some(template.ean.clone());
            if let Some(kind) = &template.kind {
                draft.kind = Some(kind.clone());
            }
            if let Some(lot_type) = &template.lot_type {
                draft.lot_type = Some(lot_type.clone());
            }
            drafts::save(base, &draft)?;
            let report = drafts::report(draft, adopted);
            output::print_block(cli.json, report, super::draft::report_lines)
        }
    }
}

pub fn detail_lines(product: &Product) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} (id {})\n", product.name, product.id));
    if let Some(description) = &product.description {
        out.push_str(&format!("  {description}\n"));
    }
    if !product.ean.is_empty() {
        out.push_str(&format!("  ean: {}\n", product.ean));
    }
    out.push_str(&format!("  quantity: {}\n", product.quantity));
    if !product.kind.is_empty() {
        out.push_str(&format!("  type: {}\n", product.kind));
    }
    if !product.lot_type.is_empty() {
        out.push_str(&format!(
            "  lot: {} ({} per lot)\n",
            product.lot_type, product.quantity_per_lot
        ));
    }
    if let Some(weight) = product.weight {
        out.push_str(&format!("  weight: {weight} kg\n"));
    }
    if let Some(expiry) = &product.expiry_date {
        out.push_str(&format!("  expiry: {expiry}\n"));
    }
    out.push_str(&format!(
        "  location: shelf {} (L: {}, C: {})\n",
        product.shelf_id,
        product.position.row + 1,
        product.position.column + 1
    ));
    out
}
