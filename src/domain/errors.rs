use thiserror::Error;

/// Application errors with stable codes for the `--json` error envelope.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("not logged in; run `estoq login` first")]
    AuthRequired,
    #[error("no stock selected; run `estoq stock select <id>` first")]
    StockRequired,
    #[error("location occupied: (L: {l}, C: {c}) already holds a product; pick an empty cell", l = .row + 1, c = .column + 1)]
    CellOccupied { row: u32, column: u32 },
    #[error("{0}")]
    Api(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION",
            AppError::AuthRequired => "AUTH_REQUIRED",
            AppError::StockRequired => "STOCK_REQUIRED",
            AppError::CellOccupied { .. } => "CELL_OCCUPIED",
            AppError::Api(_) => "API_ERROR",
        }
    }

    pub fn validation(msg: impl Into<String>) -> AppError {
        AppError::Validation(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> AppError {
        AppError::Api(msg.into())
    }
}
