//! Session engine
//!
//! Owns every piece of session state and is the only thing the UI talks to.
//! Surface callbacks arrive through [`NavigationListener`], scroll input
//! through [`ScrollListener`]; user intents are plain methods.

use chrono::Local;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use skiff_chrome::{ChromeHeights, ChromeVisibilityState, ScrollChromeController};
use skiff_navigation::{
    filter_bookmarks, filter_entries, group_by_day, is_user_visible, AddressResolver,
    BookmarkEntry, BookmarkStore, Generation, HistoryEntry, HistoryRecorder, HistorySection,
    HistoryStore, NavigationSnapshot, NavigationStateTracker, SearchEngine, SearchSuggestions,
    SuggestionSource, VisitDecision, WebSurface,
};
use skiff_session::TabSessionManager;
use skiff_storage::Database;
use skiff_tabs::{Tab, TabPartition};

use crate::actions::{available_actions, PageAction};
use crate::config::Config;
use crate::events::{NavigationEvent, NavigationListener, PropertyChange, ScrollEvent, ScrollListener};
use crate::Result;

const SEARCH_ENGINE_KEY: &str = "search_engine";

/// Upper bound on history rows pulled into the history list
const HISTORY_LIST_LIMIT: usize = 1000;

pub struct SessionEngine {
    config: Config,
    db: Database,
    surface: Arc<dyn WebSurface>,
    /// Advanced whenever the page the user is looking at changes
    generation: Generation,
    tracker: Arc<RwLock<NavigationStateTracker>>,
    recorder: Arc<HistoryRecorder>,
    history: HistoryStore,
    bookmarks: BookmarkStore,
    session: TabSessionManager,
    chrome: Arc<Mutex<ScrollChromeController>>,
    suggestions: Arc<SearchSuggestions>,
    resolver: Arc<RwLock<AddressResolver>>,
    home_loaded: Arc<AtomicBool>,
}

impl SessionEngine {
    /// Open the database named by `config` and wire up the engine.
    ///
    /// Background work (title resolution, suggestion fetches) is spawned on
    /// `runtime`, so events may be delivered from any thread.
    pub fn new(
        config: Config,
        surface: Arc<dyn WebSurface>,
        suggestion_source: Arc<dyn SuggestionSource>,
        runtime: Handle,
    ) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db, surface, suggestion_source, runtime))
    }

    pub fn with_database(
        config: Config,
        db: Database,
        surface: Arc<dyn WebSurface>,
        suggestion_source: Arc<dyn SuggestionSource>,
        runtime: Handle,
    ) -> Self {
        let generation = Generation::new();
        let history = HistoryStore::new(db.clone());
        let bookmarks = BookmarkStore::new(db.clone());

        let recorder = HistoryRecorder::new(
            Arc::clone(&surface),
            history.clone(),
            bookmarks.clone(),
            generation.clone(),
            config.timing.recorder_config(),
            runtime.clone(),
        );
        let session = TabSessionManager::new(db.clone(), Arc::clone(&surface), generation.clone());
        let suggestions = SearchSuggestions::new(
            suggestion_source,
            config.timing.suggestion_debounce(),
            runtime,
        );
        let chrome = ScrollChromeController::new(config.scroll, config.chrome);
        let resolver = AddressResolver::new(config.search_engine);

        Self {
            config,
            db,
            surface,
            generation,
            tracker: Arc::new(RwLock::new(NavigationStateTracker::new())),
            recorder: Arc::new(recorder),
            history,
            bookmarks,
            session,
            chrome: Arc::new(Mutex::new(chrome)),
            suggestions: Arc::new(suggestions),
            resolver: Arc::new(RwLock::new(resolver)),
            home_loaded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Apply persisted preferences and restore the tab session.
    pub fn initialize(&self) -> Result<Tab> {
        if let Some(value) = self.db.get_setting(SEARCH_ENGINE_KEY)? {
            let engine = value.parse::<SearchEngine>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring persisted search engine");
                SearchEngine::default()
            });
            self.resolver.write().set_search_engine(engine);
        }

        let tab = self.session.restore()?;
        self.refresh_snapshot();

        tracing::info!(tab_id = %tab.id, engine = %self.search_engine(), "Session engine initialized");
        Ok(tab)
    }

    // === Surface events ===

    /// Apply a lifecycle event. On `Finished` the visit is handed to the
    /// history recorder and its decision returned.
    pub fn handle_navigation_event(&self, event: NavigationEvent) -> Result<Option<VisitDecision>> {
        tracing::trace!(?event, "Navigation event");

        match event {
            NavigationEvent::Started => {
                self.supersede();
                self.refresh_snapshot();
                Ok(None)
            }
            NavigationEvent::Finished => {
                self.refresh_snapshot();
                let decision = self.recorder.record_visit();
                self.session.sync_live_state()?;
                Ok(Some(decision))
            }
            NavigationEvent::Committed
            | NavigationEvent::Failed
            | NavigationEvent::FailedProvisional => {
                self.refresh_snapshot();
                Ok(None)
            }
        }
    }

    pub fn handle_property_change(&self, change: PropertyChange) {
        if let PropertyChange::Url(url) = &change {
            let previous = self.tracker.read().snapshot().current_url.clone();
            if *url != previous {
                self.supersede();
            }
        }

        self.refresh_snapshot();
    }

    // === Navigation intents ===

    /// Resolve address bar input and load it. Returns the resolved URL.
    pub fn load(&self, input: &str) -> String {
        let url = self.resolver.read().resolve(input);
        self.supersede();
        self.surface.load(&url);
        self.refresh_snapshot();

        tracing::debug!(url = %url, "Loading address bar input");
        url
    }

    /// Load the engine homepage the first time this is called per launch.
    pub fn load_home_if_needed(&self) -> bool {
        if self.home_loaded.swap(true, Ordering::SeqCst) {
            return false;
        }

        let home = self.search_engine().homepage();
        self.supersede();
        self.surface.load(home);
        self.refresh_snapshot();
        true
    }

    pub fn go_back(&self) -> bool {
        if !self.refresh_snapshot().can_go_back {
            return false;
        }
        self.surface.go_back();
        self.refresh_snapshot();
        true
    }

    pub fn go_forward(&self) -> bool {
        if !self.refresh_snapshot().can_go_forward {
            return false;
        }
        self.surface.go_forward();
        self.refresh_snapshot();
        true
    }

    pub fn refresh(&self) {
        self.surface.reload();
    }

    // === Tab intents ===

    /// Open a tab for `input`, or the engine homepage when `None`.
    pub fn new_tab(&self, input: Option<&str>, is_private: bool) -> Result<Tab> {
        let url = match input {
            Some(input) => self.resolver.read().resolve(input),
            None => self.search_engine().homepage().to_string(),
        };

        self.recorder.cancel_pending();
        let tab = self.session.create_tab(&url, is_private)?;
        self.refresh_snapshot();

        tracing::info!(tab_id = %tab.id, is_private, "Opened tab");
        Ok(tab)
    }

    pub fn switch_tab(&self, tab_id: &str) -> Result<Tab> {
        if self.session.current_tab_id().as_deref() != Some(tab_id) {
            self.recorder.cancel_pending();
        }

        let tab = self.session.switch_to_tab(tab_id)?;
        self.refresh_snapshot();
        Ok(tab)
    }

    /// Delete a tab. Returns the tab that became current, if the current
    /// one was deleted.
    pub fn delete_tab(&self, tab_id: &str) -> Result<Option<Tab>> {
        let was_current = self.session.current_tab_id().as_deref() == Some(tab_id);
        if was_current {
            self.recorder.cancel_pending();
        }

        let next = self.session.delete_tab(tab_id)?;
        if let Some(tab) = &next {
            self.refresh_snapshot();
            tracing::debug!(closed = %tab_id, tab_id = %tab.id, "Current tab replaced after close");
        }

        Ok(next)
    }

    /// Close every private tab.
    pub fn close_private_tabs(&self) -> Result<Option<Tab>> {
        if self.session.current_partition() == Some(TabPartition::Private) {
            self.recorder.cancel_pending();
        }

        let next = self.session.clear_partition(TabPartition::Private)?;
        if next.is_some() {
            self.refresh_snapshot();
        }
        Ok(next)
    }

    pub fn tabs(&self, partition: TabPartition) -> Vec<Tab> {
        self.session.list_tabs(partition)
    }

    pub fn current_tab(&self) -> Option<Tab> {
        self.session.current_tab()
    }

    // === Address bar ===

    /// Enter or leave address bar editing. Leaving drops suggestions.
    pub fn set_address_bar_active(&self, active: bool) {
        self.chrome.lock().set_editing(active);
        if !active {
            self.suggestions.clear();
        }
    }

    pub fn update_suggestions(&self, query: &str) -> Option<JoinHandle<()>> {
        self.suggestions.update(query, self.search_engine())
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.suggestions.current()
    }

    // === Page ===

    pub fn bookmark_current_page(&self) -> Option<JoinHandle<Option<BookmarkEntry>>> {
        self.recorder.bookmark_current_page()
    }

    pub fn page_actions(&self) -> Vec<PageAction> {
        let visible = self
            .snapshot()
            .current_url
            .as_deref()
            .is_some_and(is_user_visible);
        available_actions(self.config.ai_summary_enabled, visible)
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        self.tracker.read().snapshot().clone()
    }

    // === Chrome ===

    pub fn chrome_state(&self) -> ChromeVisibilityState {
        self.chrome.lock().state()
    }

    pub fn remeasure_chrome(&self, heights: ChromeHeights) {
        self.chrome.lock().remeasure(heights);
    }

    // === History and bookmarks ===

    pub fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.recent(limit)?)
    }

    /// History matching `needle`, grouped into day sections
    pub fn history_sections(&self, needle: &str) -> Result<Vec<HistorySection>> {
        let entries = self.history.recent(HISTORY_LIST_LIMIT)?;
        let filtered = filter_entries(&entries, needle);
        Ok(group_by_day(&filtered, &Local::now()))
    }

    pub fn delete_history(&self, ids: &[String]) -> Result<usize> {
        Ok(self.history.delete_many(ids)?)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.history.clear_all()?;
        tracing::info!("History cleared");
        Ok(())
    }

    pub fn bookmarks(&self, needle: &str) -> Result<Vec<BookmarkEntry>> {
        Ok(filter_bookmarks(&self.bookmarks.list()?, needle))
    }

    pub fn delete_bookmarks(&self, ids: &[String]) -> Result<usize> {
        Ok(self.bookmarks.delete_many(ids)?)
    }

    pub fn clear_bookmarks(&self) -> Result<()> {
        Ok(self.bookmarks.clear_all()?)
    }

    // === Settings ===

    pub fn search_engine(&self) -> SearchEngine {
        self.resolver.read().search_engine()
    }

    pub fn set_search_engine(&self, engine: SearchEngine) -> Result<()> {
        self.resolver.write().set_search_engine(engine);
        self.db.set_setting(SEARCH_ENGINE_KEY, engine.as_str())?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The visible page is about to change; pending work for it is stale.
    fn supersede(&self) {
        self.generation.advance();
        self.recorder.cancel_pending();
    }

    fn refresh_snapshot(&self) -> NavigationSnapshot {
        let state = self.surface.state();
        self.tracker.write().recompute(&state).clone()
    }
}

impl NavigationListener for SessionEngine {
    fn on_navigation_event(&self, event: NavigationEvent) {
        if let Err(e) = self.handle_navigation_event(event) {
            tracing::error!(?event, error = %e, "Failed to apply navigation event");
        }
    }

    fn on_property_change(&self, change: PropertyChange) {
        self.handle_property_change(change);
    }
}

impl ScrollListener for SessionEngine {
    fn on_scroll_event(&self, event: ScrollEvent) {
        let mut chrome = self.chrome.lock();
        match event {
            ScrollEvent::Scrolled { delta, offset } => chrome.on_scroll(delta, offset),
            ScrollEvent::DragEnded { velocity } => chrome.on_drag_end(velocity),
        };
    }
}

impl Clone for SessionEngine {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            surface: Arc::clone(&self.surface),
            generation: self.generation.clone(),
            tracker: Arc::clone(&self.tracker),
            recorder: Arc::clone(&self.recorder),
            history: self.history.clone(),
            bookmarks: self.bookmarks.clone(),
            session: self.session.clone(),
            chrome: Arc::clone(&self.chrome),
            suggestions: Arc::clone(&self.suggestions),
            resolver: Arc::clone(&self.resolver),
            home_loaded: Arc::clone(&self.home_loaded),
        }
    }
}
