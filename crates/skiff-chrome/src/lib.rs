//! Skiff Chrome
//!
//! Decides whether the address bar and toolbar are shown while the user
//! scrolls page content. Transitions are synchronous and never fail.

mod controller;
mod thresholds;

pub use controller::{BarVisibility, ChromeVisibilityState, ScrollChromeController};
pub use thresholds::{ChromeHeights, ScrollThresholds};
