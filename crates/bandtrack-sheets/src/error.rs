use thiserror::Error;

/// Errors surfaced by the Google Sheets client.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheets transport error: {0}")]
    Http(String),
    #[error("sheets API returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("GSHEETS_ACCESS_TOKEN is not set")]
    MissingToken,
    #[error("failed to decode sheets response: {0}")]
    Decode(String),
}

/// Errors raised while writing or reading CSV backups.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
