//! Skiff Tab Management
//!
//! Tabs persist across launches and fall into two partitions, private and
//! regular, each ordered by when the user last looked at it.

mod error;
mod manager;
mod partition;
mod tab;

pub use error::TabError;
pub use manager::TabManager;
pub use partition::TabPartition;
pub use tab::Tab;

pub type Result<T> = std::result::Result<T, TabError>;
