//! CLI error type

use std::path::PathBuf;

use worksheet_lib::error::TableError;

/// Errors that end a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid table setup: {0}")]
    Table(#[from] TableError),

    #[error("Failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}
