//! Skiff Navigation
//!
//! Everything that turns rendering-surface activity into user-facing
//! navigation state:
//! - Address bar input resolution (URL, bare hostname or search query)
//! - Back/forward availability filtered against placeholder entries
//! - Visit recording with dedup and race-safe title resolution
//! - Bookmarks, history browsing and debounced search suggestions

mod bookmarks;
mod engine;
mod error;
mod generation;
mod history;
mod recorder;
mod resolver;
mod suggestions;
mod surface;
mod tracker;
mod visibility;

pub use bookmarks::{filter_bookmarks, BookmarkEntry, BookmarkStore};
pub use engine::SearchEngine;
pub use error::NavigationError;
pub use generation::{Generation, Ticket};
pub use history::{filter_entries, group_by_day, HistoryEntry, HistorySection, HistoryStore};
pub use recorder::{HistoryRecorder, RecorderConfig, SkipReason, VisitDecision};
pub use resolver::AddressResolver;
pub use suggestions::{HttpSuggestionSource, SearchSuggestions, SuggestionSource, MAX_SUGGESTIONS};
pub use surface::{SurfaceState, WebSurface};
pub use tracker::{derive_can_navigate, NavigationSnapshot, NavigationStateTracker};
pub use visibility::{host_of, is_user_visible, BLANK_URL};

#[cfg(any(test, feature = "test-util"))]
pub use surface::testing;

pub type Result<T> = std::result::Result<T, NavigationError>;
