//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] skiff_storage::StorageError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<rusqlite::Error> for TabError {
    fn from(e: rusqlite::Error) -> Self {
        TabError::Storage(e.into())
    }
}
