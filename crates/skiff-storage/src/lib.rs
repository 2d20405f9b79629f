//! Skiff Storage Layer
//!
//! SQLite-backed persistence for tabs, history, bookmarks and settings.
//! The rest of the workspace treats an unavailable store as fatal.

mod database;
mod error;
mod migrations;
mod time;

pub use database::Database;
pub use error::StorageError;
pub use time::{decode_timestamp, encode_timestamp};

pub type Result<T> = std::result::Result<T, StorageError>;
