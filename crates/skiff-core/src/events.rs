//! Surface and scroll events delivered to the engine

use serde::{Deserialize, Serialize};

/// Navigation lifecycle reported by the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationEvent {
    Started,
    Committed,
    Finished,
    Failed,
    FailedProvisional,
}

/// Observed property of the rendering surface that changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyChange {
    Url(Option<String>),
    Loading(bool),
    Progress(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollEvent {
    /// Content moved by `delta` and now sits at `offset`
    Scrolled { delta: f64, offset: f64 },
    /// Finger lifted at `velocity`
    DragEnded { velocity: f64 },
}

pub trait NavigationListener: Send + Sync {
    fn on_navigation_event(&self, event: NavigationEvent);

    fn on_property_change(&self, change: PropertyChange);
}

pub trait ScrollListener: Send + Sync {
    fn on_scroll_event(&self, event: ScrollEvent);
}
