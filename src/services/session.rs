use crate::domain::errors::AppError;
use crate::domain::models::Session;
use crate::services::storage;
use std::path::Path;

const SESSION_FILE: &str = "session.json";

pub fn load(base: &Path) -> anyhow::Result<Session> {
    Ok(storage::read_json(&base.join(SESSION_FILE))?.unwrap_or_default())
}

pub fn save(base: &Path, session: &Session) -> anyhow::Result<()> {
    storage::write_json(&base.join(SESSION_FILE), session)
}

pub fn require_token(session: &Session) -> anyhow::Result<()> {
    if session.token.is_none() {
        return Err(AppError::AuthRequired.into());
    }
    Ok(())
}

pub fn require_stock(session: &Session) -> anyhow::Result<i64> {
    session
        .stock_id
        .ok_or_else(|| AppError::StockRequired.into())
}
