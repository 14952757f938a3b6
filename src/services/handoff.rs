//! One-shot handoff slot for the position-selection round trip.
//!
//! The grid screen writes exactly one `PositionSelection` when the user
//! commits an empty cell; the draft screen takes it (read + remove) the
//! next time it runs. The slot is a single-purpose typed channel rather
//! than a generic string key-value store.

use crate::domain::models::PositionSelection;
use crate::services::storage;
use std::path::Path;

const HANDOFF_FILE: &str = "handoff.json";

pub fn store(base: &Path, selection: &PositionSelection) -> anyhow::Result<()> {
    storage::write_json(&base.join(HANDOFF_FILE), selection)
}

/// At-most-once consumption: the file is removed before its content is
/// interpreted, so a stale or repeated read can never re-deliver. A slot
/// that fails to parse counts as absent.
pub fn take(base: &Path) -> anyhow::Result<Option<PositionSelection>> {
    let path = base.join(HANDOFF_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)?;
    std::fs::remove_file(&path)?;
    Ok(serde_json::from_str(&raw).ok())
}

pub fn pending(base: &Path) -> bool {
    base.join(HANDOFF_FILE).exists()
}
