//! Debounced search suggestions for the address bar
//!
//! Each keystroke restarts a short debounce. Only the most recent request
//! may publish its result; anything older is aborted or, if it already
//! finished its fetch, discarded by its generation ticket. Failures degrade
//! to an empty list.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};

use crate::engine::SearchEngine;
use crate::generation::Generation;
use crate::Result;

pub const MAX_SUGGESTIONS: usize = 10;

/// Transport for suggestion payloads.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpSuggestionSource {
    client: reqwest::Client,
}

impl HttpSuggestionSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpSuggestionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionSource for HttpSuggestionSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

pub struct SearchSuggestions {
    source: Arc<dyn SuggestionSource>,
    debounce: Duration,
    runtime: Handle,
    generation: Generation,
    suggestions: Arc<RwLock<Vec<String>>>,
    task: Mutex<Option<AbortHandle>>,
}

impl SearchSuggestions {
    pub fn new(source: Arc<dyn SuggestionSource>, debounce: Duration, runtime: Handle) -> Self {
        Self {
            source,
            debounce,
            runtime,
            generation: Generation::new(),
            suggestions: Arc::new(RwLock::new(Vec::new())),
            task: Mutex::new(None),
        }
    }

    /// Schedule a suggestion fetch for `query`, superseding any earlier one.
    ///
    /// A blank query clears the list immediately and schedules nothing.
    pub fn update(&self, query: &str, engine: SearchEngine) -> Option<JoinHandle<()>> {
        let ticket = self.generation.advance();
        self.abort_in_flight();

        let query = query.trim().to_string();
        if query.is_empty() {
            self.suggestions.write().clear();
            return None;
        }

        let source = Arc::clone(&self.source);
        let suggestions = Arc::clone(&self.suggestions);
        let debounce = self.debounce;

        let mut slot = self.task.lock();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            if !ticket.is_current() {
                return;
            }

            let url = engine.suggestions_url(&query);
            let parsed = match source.fetch(&url).await {
                Ok(payload) => {
                    let mut parsed = engine.parse_suggestions(&payload);
                    parsed.truncate(MAX_SUGGESTIONS);
                    parsed
                }
                Err(e) => {
                    tracing::warn!(engine = %engine, error = %e, "Suggestion fetch failed");
                    Vec::new()
                }
            };

            if ticket.is_current() {
                *suggestions.write() = parsed;
            }
        });
        *slot = Some(handle.abort_handle());

        Some(handle)
    }

    /// Cancel any pending fetch and empty the list.
    pub fn clear(&self) {
        self.generation.advance();
        self.abort_in_flight();
        self.suggestions.write().clear();
    }

    pub fn current(&self) -> Vec<String> {
        self.suggestions.read().clone()
    }

    fn abort_in_flight(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}
