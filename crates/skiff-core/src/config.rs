//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use skiff_chrome::{ChromeHeights, ScrollThresholds};
use skiff_navigation::{RecorderConfig, SearchEngine};

use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Engine used until the user picks one
    pub search_engine: SearchEngine,
    /// Offer "Summarize" in the page menu
    pub ai_summary_enabled: bool,
    pub timing: Timing,
    pub scroll: ScrollThresholds,
    pub chrome: ChromeHeights,
}

/// Delays and windows, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub title_settle_ms: u64,
    pub suggestion_debounce_ms: u64,
    pub history_dedup_window_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            title_settle_ms: 150,
            suggestion_debounce_ms: 250,
            history_dedup_window_ms: 1000,
        }
    }
}

impl Timing {
    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig {
            settle_delay: Duration::from_millis(self.title_settle_ms),
            dedup_window: Duration::from_millis(self.history_dedup_window_ms),
        }
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("skiff.db"),
            search_engine: SearchEngine::default(),
            ai_summary_enabled: false,
            timing: Timing::default(),
            scroll: ScrollThresholds::default(),
            chrome: ChromeHeights::default(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Skiff"))
            .unwrap_or_else(|| PathBuf::from(".skiff"))
    }

    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/skiff"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/skiff/skiff.db"));
        assert_eq!(config.search_engine, SearchEngine::Google);
        assert!(!config.ai_summary_enabled);

        let recorder = config.timing.recorder_config();
        assert_eq!(recorder.settle_delay, Duration::from_millis(150));
        assert_eq!(recorder.dedup_window, Duration::from_millis(1000));
        assert_eq!(config.timing.suggestion_debounce(), Duration::from_millis(250));
        assert_eq!(config.scroll.jitter_threshold, 1.0);
        assert_eq!(config.scroll.hide_offset_threshold, 50.0);
        assert_eq!(config.scroll.snap_velocity_threshold, 0.5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "search_engine": "duckduckgo",
                "ai_summary_enabled": true,
                "timing": { "title_settle_ms": 300 },
                "scroll": { "hide_offset_threshold": 80.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.search_engine, SearchEngine::DuckDuckGo);
        assert!(config.ai_summary_enabled);
        assert_eq!(config.timing.title_settle_ms, 300);
        assert_eq!(config.timing.history_dedup_window_ms, 1000);
        assert_eq!(config.scroll.hide_offset_threshold, 80.0);
        assert_eq!(config.scroll.jitter_threshold, 1.0);
        assert_eq!(config.chrome.address_bar_height, 56.0);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/skiff/config.json")).unwrap_err();
        assert!(matches!(err, crate::CoreError::Config(_)));
    }
}
