//! Tab data structure
//!
//! The tab grid shows a preview snapshot, the title (falling back to the
//! URL), and orders cards by last access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TabError;
use crate::partition::TabPartition;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier
    pub id: String,
    /// Last URL shown in this tab
    pub url: String,
    /// Page title, empty until the page reports one
    pub title: String,
    pub is_private: bool,
    /// When the tab was created
    pub created_at: DateTime<Utc>,
    /// Last time the tab was current
    pub last_accessed_at: DateTime<Utc>,
    /// Encoded snapshot taken when the user last left the tab
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<Vec<u8>>,
}

impl Tab {
    pub fn new(url: String, is_private: bool) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(TabError::InvalidUrl("URL cannot be empty".to_string()));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            url,
            title: String::new(),
            is_private,
            created_at: now,
            last_accessed_at: now,
            preview_image: None,
        })
    }

    pub fn partition(&self) -> TabPartition {
        TabPartition::from_private(self.is_private)
    }

    /// Mark the tab as just accessed
    pub fn touch(&mut self) {
        let now = Utc::now();
        // keep ordering strict even if the clock is coarse
        self.last_accessed_at = if now > self.last_accessed_at {
            now
        } else {
            self.last_accessed_at + chrono::Duration::microseconds(1)
        };
    }

    /// Copy what the rendering surface currently shows into the record.
    /// Missing values leave the stored ones untouched.
    pub fn apply_live_state(&mut self, url: Option<String>, title: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            if url != self.url {
                // title belongs to the previous page
                self.title.clear();
            }
            self.url = url;
        }

        if let Some(title) = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            self.title = title;
        }
    }

    pub fn set_preview(&mut self, preview: Option<Vec<u8>>) {
        if preview.is_some() {
            self.preview_image = preview;
        }
    }

    /// Get display title (with fallback to URL)
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}
