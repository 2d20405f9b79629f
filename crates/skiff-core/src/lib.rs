//! Skiff Core
//!
//! Composes navigation, history, tabs and chrome into one session engine
//! that turns rendering-surface events into user-facing browser state.

mod actions;
mod config;
mod engine;
mod error;
mod events;

pub use actions::PageAction;
pub use config::{Config, Timing};
pub use engine::SessionEngine;
pub use error::CoreError;
pub use events::{NavigationEvent, NavigationListener, PropertyChange, ScrollEvent, ScrollListener};

// Re-export core components
pub use skiff_chrome::{
    BarVisibility, ChromeHeights, ChromeVisibilityState, ScrollChromeController, ScrollThresholds,
};
pub use skiff_navigation::{
    AddressResolver, BookmarkEntry, HistoryEntry, HistorySection, HttpSuggestionSource,
    NavigationError, NavigationSnapshot, SearchEngine, SuggestionSource, SurfaceState,
    VisitDecision, WebSurface,
};
pub use skiff_session::{SessionError, TabSessionManager};
pub use skiff_storage::{Database, StorageError};
pub use skiff_tabs::{Tab, TabError, TabPartition};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
