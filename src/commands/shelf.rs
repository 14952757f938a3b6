use crate::api::Client;
use crate::cli::{Cli, GridMode, ShelfCommands};
use crate::domain::errors::AppError;
use crate::domain::models::{PositionSelection, ShelfInput, ShelfPatch};
use crate::services::{drafts, grid, handoff, output, products, session, shelves, storage};
use serde_json::json;
use std::path::Path;

use super::product::detail_lines;

pub fn handle(
    cli: &Cli,
    command: &ShelfCommands,
    base: &Path,
    source: &str,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    let sess = session::load(base)?;
    session::require_token(&sess)?;
    session::require_stock(&sess)?;
    let client = Client::new(source, timeout_ms, &sess);

    match command {
        ShelfCommands::List => {
            let shelves = shelves::all(&client)?;
            output::print_out(cli.json, &shelves, |s| {
                format!("{}\t{}\t{} rows x {} columns", s.id, s.name, s.rows, s.columns)
            })
        }
        ShelfCommands::Grid { id, mode } => {
            let layout = shelves::layout(&client, *id)?;
            output::print_block(cli.json, layout, |l| grid::render(l, *mode))
        }
        ShelfCommands::Cell { id, row, column } => {
            let layout = shelves::layout(&client, *id)?;
            if !grid::in_bounds(&layout, *row, *column) {
                return Err(outside_grid(&layout, *row, *column));
            }
            match grid::item_at(&layout, *row, *column) {
                Some(item) => {
                    let product = products::details(&client, item.product_id)?;
                    output::print_block(cli.json, product, |p| detail_lines(p))
                }
                None => output::print_one(cli.json, json!({ "occupied": false }), |_| {
                    "empty cell".to_string()
                }),
            }
        }
        ShelfCommands::Pick { id, row, column } => {
            let layout = shelves::layout(&client, *id)?;
            if !grid::in_bounds(&layout, *row, *column) {
                return Err(outside_grid(&layout, *row, *column));
            }
            if grid::item_at(&layout, *row, *column).is_some() {
                // no handoff write, the visit ends without a commit
                return Err(AppError::CellOccupied {
                    row: *row,
                    column: *column,
                }
                .into());
            }
            let selection = PositionSelection {
                shelf_id: layout.id,
                shelf_name: layout.name.clone(),
                row: *row,
                column: *column,
            };
            handoff::store(base, &selection)?;
            storage::audit(
                base,
                "position_pick",
                json!({ "shelfId": selection.shelf_id, "row": row, "column": column }),
            );
            output::print_one(cli.json, selection, |s| {
                format!(
                    "selected {}; run `estoq draft show` to apply it",
                    drafts::position_label(s)
                )
            })
        }
        ShelfCommands::Create {
            name,
            rows,
            columns,
            destination_type,
            restrictions,
        } => {
            if name.trim().is_empty() {
                return Err(AppError::validation("shelf name is required").into());
            }
            if *rows == 0 || *columns == 0 {
                return Err(
                    AppError::validation("rows and columns must be greater than zero").into(),
                );
            }
            let input = ShelfInput {
                name: name.clone(),
                rows: *rows,
                columns: *columns,
                destination_type: destination_type.clone(),
                restrictions: restrictions.clone(),
            };
            let shelf = shelves::create(&client, &input)?;
            storage::audit(base, "shelf_create", json!({ "shelfId": shelf.id }));
            output::print_one(cli.json, shelf, |s| {
                format!("created shelf {} ({} rows x {} columns)", s.name, s.rows, s.columns)
            })
        }
        ShelfCommands::Update {
            id,
            name,
            rows,
            columns,
            destination_type,
            restrictions,
        } => {
            let patch = ShelfPatch {
                name: name.clone(),
                rows: *rows,
                columns: *columns,
                destination_type: destination_type.clone(),
                restrictions: restrictions.clone(),
            };
            let shelf = shelves::update(&client, *id, &patch)?;
            storage::audit(base, "shelf_update", json!({ "shelfId": shelf.id }));
            output::print_one(cli.json, shelf, |s| format!("updated shelf {}", s.name))
        }
        ShelfCommands::Delete { id } => {
            shelves::delete(&client, *id)?;
            storage::audit(base, "shelf_delete", json!({ "shelfId": id }));
            output::print_one(cli.json, json!({ "deleted": id }), |_| {
                format!("removed shelf {id}")
            })
        }
    }
}

fn outside_grid(
    layout: &crate::domain::models::ShelfLayout,
    row: u32,
    column: u32,
) -> anyhow::Error {
    AppError::validation(format!(
        "cell (L: {}, C: {}) is outside the {}x{} grid of {}",
        row + 1,
        column + 1,
        layout.rows,
        layout.columns,
        layout.name
    ))
    .into()
}
