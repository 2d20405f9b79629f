//! Visit recording
//!
//! On every finished navigation the recorder decides synchronously whether
//! the visit deserves a history entry, then resolves the page title in the
//! background. The surface may fire "finished" several times for one page
//! (sub-frames, redirects), and the user may leave the page while the title
//! is still being resolved; neither may produce a wrong or duplicate entry.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;

use crate::bookmarks::{BookmarkEntry, BookmarkStore};
use crate::generation::{Generation, Ticket};
use crate::history::{HistoryEntry, HistoryStore};
use crate::surface::WebSurface;
use crate::visibility::{host_of, is_user_visible};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Time given to the surface to publish the new page's title
    pub settle_delay: Duration,
    /// Minimum gap between two recordings of the same URL
    pub dedup_window: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(150),
            dedup_window: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoUrl,
    NotUserVisible,
    Duplicate,
}

/// Outcome of [`HistoryRecorder::record_visit`].
///
/// A scheduled recording resolves to `None` when it was abandoned because
/// the page changed underneath it, and fails with a cancelled `JoinError`
/// when a superseding event aborted it.
#[derive(Debug)]
pub enum VisitDecision {
    Skipped(SkipReason),
    Scheduled(JoinHandle<Option<HistoryEntry>>),
}

#[derive(Debug, Clone)]
struct Capture {
    url: String,
    at: Instant,
}

struct PendingVisit {
    id: u64,
    capture: Capture,
    abort: AbortHandle,
}

pub struct HistoryRecorder {
    surface: Arc<dyn WebSurface>,
    history: HistoryStore,
    bookmarks: BookmarkStore,
    generation: Generation,
    config: RecorderConfig,
    /// Runtime that title resolution runs on; callers need not be inside it
    runtime: Handle,
    last_recorded: Arc<Mutex<Option<Capture>>>,
    pending: Arc<Mutex<Option<PendingVisit>>>,
    next_visit_id: AtomicU64,
}

impl HistoryRecorder {
    pub fn new(
        surface: Arc<dyn WebSurface>,
        history: HistoryStore,
        bookmarks: BookmarkStore,
        generation: Generation,
        config: RecorderConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            surface,
            history,
            bookmarks,
            generation,
            config,
            runtime,
            last_recorded: Arc::new(Mutex::new(None)),
            pending: Arc::new(Mutex::new(None)),
            next_visit_id: AtomicU64::new(0),
        }
    }

    /// Handle a "visit finished" event for the surface's current page.
    pub fn record_visit(&self) -> VisitDecision {
        let Some(url) = self.surface.current_url() else {
            return VisitDecision::Skipped(SkipReason::NoUrl);
        };

        if !is_user_visible(&url) {
            tracing::debug!(url = %url, "Skipping history for internal page");
            return VisitDecision::Skipped(SkipReason::NotUserVisible);
        }

        let now = Instant::now();
        if self.is_duplicate(&url, now) {
            tracing::debug!(url = %url, "Skipping duplicate history visit");
            return VisitDecision::Skipped(SkipReason::Duplicate);
        }

        // A finished load of another page supersedes whatever is in flight
        self.cancel_pending();

        let capture = Capture { url, at: now };
        let ticket = self.generation.ticket();
        let visited_at = Utc::now();
        let id = self.next_visit_id.fetch_add(1, Ordering::Relaxed);

        let surface = Arc::clone(&self.surface);
        let history = self.history.clone();
        let last_recorded = Arc::clone(&self.last_recorded);
        let pending = Arc::clone(&self.pending);
        let settle = self.config.settle_delay;
        let task_capture = capture.clone();

        let mut slot = self.pending.lock();
        let handle = self.runtime.spawn(async move {
            let url = task_capture.url.clone();
            let title = resolve_title(surface.as_ref(), &url, settle, &ticket).await;

            let outcome = match title {
                Some(title) if still_current(surface.as_ref(), &url, &ticket) => {
                    let entry = HistoryEntry::new(title, url, visited_at);
                    match history.insert(&entry) {
                        Ok(()) => {
                            tracing::info!(url = %entry.url, title = %entry.title, "Recorded history visit");
                            *last_recorded.lock() = Some(task_capture);
                            Some(entry)
                        }
                        Err(e) => {
                            tracing::error!(url = %entry.url, error = %e, "Failed to persist history entry");
                            None
                        }
                    }
                }
                _ => {
                    tracing::debug!(url = %url, "Abandoned history visit after navigation changed");
                    None
                }
            };

            let mut pending = pending.lock();
            if pending.as_ref().is_some_and(|p| p.id == id) {
                *pending = None;
            }

            outcome
        });

        *slot = Some(PendingVisit {
            id,
            capture,
            abort: handle.abort_handle(),
        });

        VisitDecision::Scheduled(handle)
    }

    /// Abort the in-flight recording, if any.
    pub fn cancel_pending(&self) {
        if let Some(pending) = self.pending.lock().take() {
            tracing::debug!(url = %pending.capture.url, "Cancelling pending history visit");
            pending.abort.abort();
        }
    }

    /// Bookmark the surface's current page.
    ///
    /// Uses the same title resolution and staleness guard as history but no
    /// dedup window. Returns `None` when there is no bookmarkable page.
    pub fn bookmark_current_page(&self) -> Option<JoinHandle<Option<BookmarkEntry>>> {
        let url = self.surface.current_url().filter(|u| is_user_visible(u))?;

        let ticket = self.generation.ticket();
        let saved_at = Utc::now();
        let surface = Arc::clone(&self.surface);
        let bookmarks = self.bookmarks.clone();
        let settle = self.config.settle_delay;

        Some(self.runtime.spawn(async move {
            let title = resolve_title(surface.as_ref(), &url, settle, &ticket).await?;
            if !still_current(surface.as_ref(), &url, &ticket) {
                tracing::debug!(url = %url, "Abandoned bookmark after navigation changed");
                return None;
            }

            let bookmark = BookmarkEntry::new(title, url, saved_at);
            match bookmarks.insert(&bookmark) {
                Ok(()) => {
                    tracing::info!(url = %bookmark.url, "Bookmarked page");
                    Some(bookmark)
                }
                Err(e) => {
                    tracing::error!(url = %bookmark.url, error = %e, "Failed to persist bookmark");
                    None
                }
            }
        }))
    }

    fn is_duplicate(&self, url: &str, now: Instant) -> bool {
        let window = self.config.dedup_window;
        let within = |capture: &Capture| {
            capture.url == url && now.saturating_duration_since(capture.at) < window
        };

        self.last_recorded.lock().as_ref().is_some_and(within)
            || self
                .pending
                .lock()
                .as_ref()
                .is_some_and(|p| within(&p.capture))
    }
}

fn still_current(surface: &dyn WebSurface, url: &str, ticket: &Ticket) -> bool {
    ticket.is_current() && surface.current_url().as_deref() == Some(url)
}

fn usable_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Settle, then walk the title chain: surface title, document title, host,
/// full URL. `None` means the page changed and the result must be dropped.
async fn resolve_title(
    surface: &dyn WebSurface,
    url: &str,
    settle: Duration,
    ticket: &Ticket,
) -> Option<String> {
    if !still_current(surface, url, ticket) {
        return None;
    }

    tokio::time::sleep(settle).await;

    if !still_current(surface, url, ticket) {
        return None;
    }

    if let Some(title) = usable_title(surface.state().title).filter(|t| t != url) {
        return Some(title);
    }

    if let Some(title) = usable_title(surface.document_title().await) {
        return Some(title);
    }

    Some(host_of(url).unwrap_or_else(|| url.to_string()))
}
