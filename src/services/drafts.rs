//! Product form draft: the in-progress, unsaved state of a new product.
//!
//! The draft is persisted so field values survive the navigation round trip
//! through the shelf grid. Position sub-state: no position -> shelf chosen
//! -> position chosen; clearing the shelf choice regresses the position.

use crate::domain::errors::AppError;
use crate::domain::models::{
    CellPosition, DraftReport, PositionSelection, ProductDraft, ProductInput,
};
use crate::services::{handoff, storage};
use std::path::Path;

const DRAFT_FILE: &str = "draft.json";

pub fn load(base: &Path) -> anyhow::Result<ProductDraft> {
    Ok(storage::read_json(&base.join(DRAFT_FILE))?.unwrap_or_default())
}

pub fn save(base: &Path, draft: &ProductDraft) -> anyhow::Result<()> {
    storage::write_json(&base.join(DRAFT_FILE), draft)
}

pub fn clear(base: &Path) -> anyhow::Result<()> {
    storage::remove_if_exists(&base.join(DRAFT_FILE))
}

/// The focus event: runs at the start of every draft-screen command. A
/// pending selection is adopted into the draft exactly as the grid wrote
/// it (no shelf-identity reconciliation) and the slot is cleared.
pub fn absorb_pending(base: &Path) -> anyhow::Result<(ProductDraft, bool)> {
    let mut draft = load(base)?;
    match handoff::take(base)? {
        Some(selection) => {
            draft.position = Some(selection);
            save(base, &draft)?;
            Ok((draft, true))
        }
        None => Ok((draft, false)),
    }
}

pub fn missing_fields(draft: &ProductDraft) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if draft.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        missing.push("name");
    }
    if draft.quantity.is_none() {
        missing.push("quantity");
    }
    if draft.shelf_id.is_none() {
        missing.push("shelf");
    }
    if draft.position.is_none() {
        missing.push("position");
    }
    missing
}

pub fn started(draft: &ProductDraft) -> bool {
    draft.ean.is_some()
        || draft.name.is_some()
        || draft.description.is_some()
        || draft.kind.is_some()
        || draft.lot_type.is_some()
        || draft.quantity_per_lot.is_some()
        || draft.weight.is_some()
        || draft.quantity.is_some()
        || draft.expiry_date.is_some()
        || draft.shelf_id.is_some()
        || draft.position.is_some()
}

/// Assemble the creation request. The selection's shelfId is what gets
/// submitted, as given, even if the draft's chosen shelf has since moved.
pub fn creation_payload(draft: &ProductDraft) -> anyhow::Result<ProductInput> {
    let missing = missing_fields(draft);
    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "cannot save: missing required fields: {}",
            missing.join(", ")
        ))
        .into());
    }
    let position = draft
        .position
        .clone()
        .ok_or_else(|| anyhow::anyhow!("draft position missing after validation"))?;
    Ok(ProductInput {
        ean: draft.ean.clone().unwrap_or_default(),
        name: draft.name.clone().unwrap_or_default(),
        description: draft.description.clone(),
        kind: draft.kind.clone().unwrap_or_default(),
        lot_type: draft.lot_type.clone().unwrap_or_default(),
        quantity_per_lot: draft.quantity_per_lot.unwrap_or(0),
        weight: draft.weight,
        quantity: draft.quantity.unwrap_or(0),
        expiry_date: draft.expiry_date.clone(),
        shelf_id: position.shelf_id,
        position: CellPosition {
            row: position.row,
            column: position.column,
        },
    })
}

pub fn position_label(selection: &PositionSelection) -> String {
    format!(
        "{} (L: {}, C: {})",
        selection.shelf_name,
        selection.row + 1,
        selection.column + 1
    )
}

pub fn report(draft: ProductDraft, adopted: bool) -> DraftReport {
    let missing = missing_fields(&draft)
        .iter()
        .map(|s| s.to_string())
        .collect();
    let position_label = draft.position.as_ref().map(position_label);
    DraftReport {
        draft,
        missing,
        position_label,
        adopted_position: adopted,
    }
}
