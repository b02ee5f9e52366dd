use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] bandtrack_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error("no symbols to scan")]
    NoSymbols,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sheet(#[from] bandtrack_sheets::SheetError),

    #[error("sheet write failed ({sheet}) and CSV fallback failed ({backup})")]
    SinkUnavailable { sheet: String, backup: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::NoSymbols => 3,
            Self::Serialization(_) => 4,
            Self::Sheet(_) => 6,
            Self::SinkUnavailable { .. } => 6,
            Self::Io(_) => 10,
        }
    }
}
