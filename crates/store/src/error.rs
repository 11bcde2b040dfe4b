use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write session data to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred during JSON serialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("The in-memory session store is unusable after a panic")]
    Poisoned,
}
