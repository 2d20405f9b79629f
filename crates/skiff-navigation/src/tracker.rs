//! Back/forward availability and loading state.
//!
//! The rendering surface may claim it can go back because of its own blank
//! placeholder entry or a duplicate load of the current page. The tracker
//! only reports a direction as available when the surface agrees AND the
//! corresponding list holds a real, different page.

use serde::Serialize;

use crate::surface::SurfaceState;
use crate::visibility::is_user_visible;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NavigationSnapshot {
    pub current_url: Option<String>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub is_loading: bool,
    /// Load progress in `0.0..=1.0`
    pub progress: f64,
}

/// `engine_flag` AND `entries` contains a user-visible URL other than
/// `current`.
pub fn derive_can_navigate(engine_flag: bool, entries: &[String], current: Option<&str>) -> bool {
    engine_flag
        && entries
            .iter()
            .any(|entry| is_user_visible(entry) && Some(entry.as_str()) != current)
}

#[derive(Debug, Default)]
pub struct NavigationStateTracker {
    snapshot: NavigationSnapshot,
}

impl NavigationStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the snapshot from the surface's current state.
    pub fn recompute(&mut self, state: &SurfaceState) -> &NavigationSnapshot {
        let current = state.url.as_deref();

        let next = NavigationSnapshot {
            current_url: state.url.clone(),
            can_go_back: derive_can_navigate(state.can_go_back, &state.back_entries, current),
            can_go_forward: derive_can_navigate(
                state.can_go_forward,
                &state.forward_entries,
                current,
            ),
            is_loading: state.is_loading,
            progress: if state.progress.is_finite() {
                state.progress.clamp(0.0, 1.0)
            } else {
                0.0
            },
        };

        if next.can_go_back != self.snapshot.can_go_back
            || next.can_go_forward != self.snapshot.can_go_forward
        {
            tracing::debug!(
                can_go_back = next.can_go_back,
                can_go_forward = next.can_go_forward,
                "Navigation availability changed"
            );
        }

        self.snapshot = next;
        &self.snapshot
    }

    pub fn snapshot(&self) -> &NavigationSnapshot {
        &self.snapshot
    }
}
