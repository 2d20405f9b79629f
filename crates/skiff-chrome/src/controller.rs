//! Scroll Chrome Controller
//!
//! Two bars, two states each. Scroll deltas and drag releases pick a target
//! state; offsets follow it (0 when visible, the bar's hide distance when
//! hidden). Editing the address bar suspends the controller and pins both
//! bars visible.

use serde::{Deserialize, Serialize};

use crate::thresholds::{ChromeHeights, ScrollThresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarVisibility {
    #[default]
    Visible,
    Hidden,
}

impl BarVisibility {
    fn from_hidden(hidden: bool) -> Self {
        if hidden {
            BarVisibility::Hidden
        } else {
            BarVisibility::Visible
        }
    }

    fn offset(self, hide_distance: f64) -> f64 {
        match self {
            BarVisibility::Visible => 0.0,
            BarVisibility::Hidden => hide_distance,
        }
    }
}

/// What the UI should render for the address bar and toolbar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromeVisibilityState {
    pub address_bar: BarVisibility,
    pub toolbar: BarVisibility,
    /// Distance the address bar is pushed off screen
    pub address_bar_offset: f64,
    /// Distance the toolbar is pushed off screen
    pub toolbar_offset: f64,
}

impl Default for ChromeVisibilityState {
    fn default() -> Self {
        Self {
            address_bar: BarVisibility::Visible,
            toolbar: BarVisibility::Visible,
            address_bar_offset: 0.0,
            toolbar_offset: 0.0,
        }
    }
}

impl ChromeVisibilityState {
    pub fn is_fully_visible(&self) -> bool {
        self.address_bar == BarVisibility::Visible && self.toolbar == BarVisibility::Visible
    }

    pub fn is_fully_hidden(&self) -> bool {
        self.address_bar == BarVisibility::Hidden && self.toolbar == BarVisibility::Hidden
    }
}

#[derive(Debug, Clone)]
pub struct ScrollChromeController {
    thresholds: ScrollThresholds,
    heights: ChromeHeights,
    state: ChromeVisibilityState,
    /// Set while the address bar is in text-edit mode
    suspended: bool,
}

impl ScrollChromeController {
    pub fn new(thresholds: ScrollThresholds, heights: ChromeHeights) -> Self {
        Self {
            thresholds,
            heights,
            state: ChromeVisibilityState::default(),
            suspended: false,
        }
    }

    pub fn state(&self) -> ChromeVisibilityState {
        self.state
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn thresholds(&self) -> ScrollThresholds {
        self.thresholds
    }

    /// Content scrolled by `delta` (positive toward later content) and is now
    /// at `content_offset`. Returns whether the state changed.
    pub fn on_scroll(&mut self, delta: f64, content_offset: f64) -> bool {
        if self.suspended || delta.is_nan() || delta.abs() < self.thresholds.jitter_threshold {
            return false;
        }

        let hide = delta > 0.0 && content_offset.abs() > self.thresholds.hide_offset_threshold;
        let target = BarVisibility::from_hidden(hide);
        self.apply(target, target)
    }

    /// The user lifted their finger with `velocity` (positive toward later
    /// content). Fast flings pick a side. A slow release settles each bar on
    /// the end nearest its offset; offsets only ever sit at an end (0 or the
    /// hide distance), so that end is the bar's current state.
    pub fn on_drag_end(&mut self, velocity: f64) -> bool {
        if self.suspended || velocity.is_nan() {
            return false;
        }

        if velocity.abs() <= self.thresholds.snap_velocity_threshold {
            return false;
        }

        let target = BarVisibility::from_hidden(velocity > 0.0);
        self.apply(target, target)
    }

    /// Enter or leave address bar editing.
    pub fn set_editing(&mut self, editing: bool) -> bool {
        self.suspended = editing;
        if editing {
            self.apply(BarVisibility::Visible, BarVisibility::Visible)
        } else {
            false
        }
    }

    /// Take new chrome measurements. Hidden bars move to their new hide distance.
    pub fn remeasure(&mut self, heights: ChromeHeights) {
        self.heights = heights;
        self.state.address_bar_offset = self.state.address_bar.offset(heights.address_bar_height);
        self.state.toolbar_offset = self.state.toolbar.offset(heights.toolbar_height);
    }

    fn apply(&mut self, address_bar: BarVisibility, toolbar: BarVisibility) -> bool {
        let next = ChromeVisibilityState {
            address_bar,
            toolbar,
            address_bar_offset: address_bar.offset(self.heights.address_bar_height),
            toolbar_offset: toolbar.offset(self.heights.toolbar_height),
        };

        if next == self.state {
            return false;
        }

        tracing::debug!(
            address_bar = ?next.address_bar,
            toolbar = ?next.toolbar,
            "Chrome visibility changed"
        );
        self.state = next;
        true
    }
}

impl Default for ScrollChromeController {
    fn default() -> Self {
        Self::new(ScrollThresholds::default(), ChromeHeights::default())
    }
}
