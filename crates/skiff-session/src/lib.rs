//! Skiff Tab Session
//!
//! Exactly one tab is bound to the single live rendering surface at any
//! time. The partition holding that tab is never left empty.

mod error;
mod manager;

pub use error::SessionError;
pub use manager::TabSessionManager;

pub type Result<T> = std::result::Result<T, SessionError>;
