//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] skiff_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] skiff_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] skiff_session::SessionError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] skiff_navigation::NavigationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Filesystem failures only happen while preparing configuration
impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
