use serde::{Deserialize, Serialize};

/// Tuning for how scroll input maps to chrome visibility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollThresholds {
    /// Deltas smaller than this are treated as finger jitter
    pub jitter_threshold: f64,
    /// Content offset that must be passed before scrolling down hides the bars
    pub hide_offset_threshold: f64,
    /// Release velocity above which the drag direction decides the state
    pub snap_velocity_threshold: f64,
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self {
            jitter_threshold: 1.0,
            hide_offset_threshold: 50.0,
            snap_velocity_threshold: 0.5,
        }
    }
}

/// Measured chrome heights; a hidden bar is offset by its full height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeHeights {
    pub address_bar_height: f64,
    pub toolbar_height: f64,
}

impl Default for ChromeHeights {
    fn default() -> Self {
        Self {
            address_bar_height: 56.0,
            toolbar_height: 49.0,
        }
    }
}
