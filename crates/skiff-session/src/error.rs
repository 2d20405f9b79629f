//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] skiff_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] skiff_tabs::TabError),
}
