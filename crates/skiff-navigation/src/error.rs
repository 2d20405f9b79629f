//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Unknown search engine: {0}")]
    UnknownEngine(String),

    #[error("Suggestion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] skiff_storage::StorageError),
}

impl From<rusqlite::Error> for NavigationError {
    fn from(e: rusqlite::Error) -> Self {
        NavigationError::Storage(e.into())
    }
}
