//! Tab Session Manager
//!
//! Owns the current-tab pointer and keeps the live surface bound to it.
//! Outgoing tabs are flushed (url, title, preview) before the surface is
//! pointed elsewhere, so the grid always shows what the user last saw.

use parking_lot::RwLock;
use std::sync::Arc;

use skiff_navigation::{Generation, WebSurface, BLANK_URL};
use skiff_storage::Database;
use skiff_tabs::{Tab, TabManager, TabPartition};

use crate::Result;

pub struct TabSessionManager {
    tabs: TabManager,
    /// Tab currently bound to the surface
    current_tab_id: Arc<RwLock<Option<String>>>,
    surface: Arc<dyn WebSurface>,
    /// Navigation generation; rebinding the surface supersedes pending work
    generation: Generation,
}

impl TabSessionManager {
    pub fn new(db: Database, surface: Arc<dyn WebSurface>, generation: Generation) -> Self {
        Self {
            tabs: TabManager::new(db),
            current_tab_id: Arc::new(RwLock::new(None)),
            surface,
            generation,
        }
    }

    /// Load persisted tabs and bind the most recent regular one, opening a
    /// blank tab when there is none.
    pub fn restore(&self) -> Result<Tab> {
        let tabs = self.tabs.load_all()?;

        let tab = match self.tabs.most_recent(TabPartition::Regular) {
            Some(tab) => self.bind(tab)?,
            None => self.open_blank(TabPartition::Regular)?,
        };

        tracing::info!(
            tab_id = %tab.id,
            tab_count = tabs.len(),
            "Restored tab session"
        );

        Ok(tab)
    }

    /// Open `url` in a new tab and make it current
    pub fn create_tab(&self, url: &str, is_private: bool) -> Result<Tab> {
        self.flush_current()?;
        let tab = self.tabs.create_tab(url.to_string(), is_private)?;
        self.bind(tab)
    }

    pub fn switch_to_tab(&self, tab_id: &str) -> Result<Tab> {
        let target = self.tabs.get_tab(tab_id)?;

        if self.is_current(tab_id) {
            return Ok(self.tabs.modify_tab(tab_id, Tab::touch)?);
        }

        self.flush_current()?;
        self.bind(target)
    }

    /// Delete a tab. Returns the newly current tab when the deleted tab was
    /// current, `None` otherwise (the surface is left alone).
    pub fn delete_tab(&self, tab_id: &str) -> Result<Option<Tab>> {
        let closed = self.tabs.close_tab(tab_id)?;

        if !self.is_current(tab_id) {
            return Ok(None);
        }
        *self.current_tab_id.write() = None;

        let partition = closed.partition();
        let next = match self.tabs.most_recent(partition) {
            Some(tab) => self.bind(tab)?,
            None => {
                tracing::info!(partition = %partition, "Partition emptied, opening replacement tab");
                self.open_blank(partition)?
            }
        };

        Ok(Some(next))
    }

    /// Close every tab in `partition`.
    ///
    /// If the current tab was among them, the most recent tab of the other
    /// partition becomes current (or a blank one is opened there).
    pub fn clear_partition(&self, partition: TabPartition) -> Result<Option<Tab>> {
        let was_current = self.current_partition() == Some(partition);

        for tab in self.tabs.list(partition) {
            self.tabs.close_tab(&tab.id)?;
        }

        if !was_current {
            return Ok(None);
        }
        *self.current_tab_id.write() = None;

        let other = partition.other();
        let next = match self.tabs.most_recent(other) {
            Some(tab) => self.bind(tab)?,
            None => self.open_blank(other)?,
        };

        Ok(Some(next))
    }

    /// Tabs of one partition, most recently accessed first
    pub fn list_tabs(&self, partition: TabPartition) -> Vec<Tab> {
        self.tabs.list(partition)
    }

    pub fn current_tab(&self) -> Option<Tab> {
        let id = self.current_tab_id.read().clone()?;
        self.tabs.get_tab(&id).ok()
    }

    pub fn current_tab_id(&self) -> Option<String> {
        self.current_tab_id.read().clone()
    }

    pub fn current_partition(&self) -> Option<TabPartition> {
        self.current_tab().map(|t| t.partition())
    }

    /// Copy the surface's url and title into the current tab's record.
    pub fn sync_live_state(&self) -> Result<()> {
        let Some(id) = self.current_tab_id() else {
            return Ok(());
        };

        let state = self.surface.state();
        self.tabs
            .modify_tab(&id, |tab| tab.apply_live_state(state.url, state.title))?;
        Ok(())
    }

    /// Persist the outgoing tab's url, title and a fresh preview.
    pub fn flush_current(&self) -> Result<()> {
        let Some(id) = self.current_tab_id() else {
            return Ok(());
        };

        let state = self.surface.state();
        let preview = self.surface.capture_preview();
        self.tabs.modify_tab(&id, |tab| {
            tab.apply_live_state(state.url, state.title);
            tab.set_preview(preview);
        })?;

        tracing::debug!(tab_id = %id, "Flushed outgoing tab");
        Ok(())
    }

    fn is_current(&self, tab_id: &str) -> bool {
        self.current_tab_id.read().as_deref() == Some(tab_id)
    }

    fn open_blank(&self, partition: TabPartition) -> Result<Tab> {
        let tab = self
            .tabs
            .create_tab(BLANK_URL.to_string(), partition.is_private())?;
        self.bind(tab)
    }

    /// Point the surface at `tab` and make it current
    fn bind(&self, tab: Tab) -> Result<Tab> {
        self.generation.advance();

        let tab = self.tabs.modify_tab(&tab.id, Tab::touch)?;
        self.surface.load(&tab.url);
        *self.current_tab_id.write() = Some(tab.id.clone());

        tracing::debug!(tab_id = %tab.id, url = %tab.url, "Bound tab to surface");
        Ok(tab)
    }
}

impl Clone for TabSessionManager {
    fn clone(&self) -> Self {
        Self {
            tabs: self.tabs.clone(),
            current_tab_id: Arc::clone(&self.current_tab_id),
            surface: Arc::clone(&self.surface),
            generation: self.generation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiff_navigation::testing::FakeSurface;

    fn session() -> (TabSessionManager, Arc<FakeSurface>, Generation) {
        let surface = Arc::new(FakeSurface::new());
        let generation = Generation::new();
        let manager = TabSessionManager::new(
            Database::open_in_memory().unwrap(),
            surface.clone(),
            generation.clone(),
        );
        (manager, surface, generation)
    }

    fn ids(tabs: &[Tab]) -> Vec<String> {
        tabs.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_create_tab_binds_surface() {
        let (manager, surface, generation) = session();
        let before = generation.current();

        let tab = manager.create_tab("https://example.com", false).unwrap();

        assert_eq!(manager.current_tab_id(), Some(tab.id.clone()));
        assert_eq!(surface.loads(), vec!["https://example.com"]);
        assert!(generation.current() > before);
    }

    #[test]
    fn test_switch_flushes_outgoing_tab() {
        let (manager, surface, _) = session();
        let first = manager.create_tab("https://a.example", false).unwrap();
        let second = manager.create_tab("https://b.example", false).unwrap();

        // user browsed within the second tab
        surface.set_url("https://b.example/article");
        surface.set_title(Some("Article"));
        surface.set_preview(Some(vec![1, 2, 3]));

        let current = manager.switch_to_tab(&first.id).unwrap();
        assert_eq!(current.id, first.id);
        assert_eq!(surface.loads().last().map(String::as_str), Some("https://a.example"));

        let flushed = manager
            .list_tabs(TabPartition::Regular)
            .into_iter()
            .find(|t| t.id == second.id)
            .unwrap();
        assert_eq!(flushed.url, "https://b.example/article");
        assert_eq!(flushed.title, "Article");
        assert_eq!(flushed.preview_image, Some(vec![1, 2, 3]));

        // most recently accessed first
        assert_eq!(
            ids(&manager.list_tabs(TabPartition::Regular)),
            vec![first.id, second.id]
        );
    }

    #[test]
    fn test_switch_to_current_does_not_reload() {
        let (manager, surface, _) = session();
        let tab = manager.create_tab("https://a.example", false).unwrap();

        manager.switch_to_tab(&tab.id).unwrap();
        assert_eq!(surface.loads().len(), 1);
        assert!(manager.switch_to_tab("missing").is_err());
    }

    #[test]
    fn test_delete_current_picks_most_recent_in_partition() {
        let (manager, surface, _) = session();
        let a = manager.create_tab("https://a.example", false).unwrap();
        let b = manager.create_tab("https://b.example", false).unwrap();
        let _private = manager.create_tab("https://p.example", true).unwrap();
        let c = manager.create_tab("https://c.example", false).unwrap();

        // a is now more recent than b
        manager.switch_to_tab(&a.id).unwrap();
        manager.switch_to_tab(&c.id).unwrap();

        let next = manager.delete_tab(&c.id).unwrap().unwrap();
        assert_eq!(next.id, a.id);
        assert_eq!(manager.current_tab_id(), Some(a.id));
        assert_eq!(surface.loads().last().map(String::as_str), Some("https://a.example"));
        assert_eq!(manager.list_tabs(TabPartition::Regular).len(), 2);
        assert!(manager.list_tabs(TabPartition::Regular).iter().any(|t| t.id == b.id));
    }

    #[test]
    fn test_delete_only_tab_refills_partition() {
        let (manager, surface, _) = session();
        let regular = manager.create_tab("https://a.example", false).unwrap();
        let private = manager.create_tab("https://p.example", true).unwrap();

        let replacement = manager.delete_tab(&private.id).unwrap().unwrap();
        assert!(replacement.is_private);
        assert_eq!(replacement.url, BLANK_URL);
        assert_eq!(manager.current_tab_id(), Some(replacement.id.clone()));
        assert_eq!(manager.list_tabs(TabPartition::Private).len(), 1);
        assert_eq!(surface.loads().last().map(String::as_str), Some(BLANK_URL));

        // the regular partition was untouched
        assert_eq!(ids(&manager.list_tabs(TabPartition::Regular)), vec![regular.id]);
    }

    #[test]
    fn test_delete_background_tab_leaves_surface_alone() {
        let (manager, surface, _) = session();
        let a = manager.create_tab("https://a.example", false).unwrap();
        let p = manager.create_tab("https://p.example", true).unwrap();
        let loads = surface.loads().len();

        // the other partition may become empty
        assert!(manager.delete_tab(&a.id).unwrap().is_none());
        assert_eq!(surface.loads().len(), loads);
        assert_eq!(manager.current_tab_id(), Some(p.id));
        assert!(manager.list_tabs(TabPartition::Regular).is_empty());
    }

    #[test]
    fn test_clear_private_partition_returns_to_regular() {
        let (manager, _, _) = session();
        let regular = manager.create_tab("https://a.example", false).unwrap();
        manager.create_tab("https://p1.example", true).unwrap();
        manager.create_tab("https://p2.example", true).unwrap();

        let next = manager
            .clear_partition(TabPartition::Private)
            .unwrap()
            .unwrap();
        assert_eq!(next.id, regular.id);
        assert!(manager.list_tabs(TabPartition::Private).is_empty());
        assert_eq!(manager.current_partition(), Some(TabPartition::Regular));
    }

    #[test]
    fn test_restore_reuses_or_creates_tab() {
        let db = Database::open_in_memory().unwrap();
        let surface = Arc::new(FakeSurface::new());

        let first = TabSessionManager::new(db.clone(), surface.clone(), Generation::new());
        let blank = first.restore().unwrap();
        assert_eq!(blank.url, BLANK_URL);

        first.create_tab("https://a.example", false).unwrap();
        let restarted = TabSessionManager::new(db, surface.clone(), Generation::new());
        let restored = restarted.restore().unwrap();
        assert_eq!(restored.url, "https://a.example");
        assert_eq!(restarted.list_tabs(TabPartition::Regular).len(), 2);
    }

    #[test]
    fn test_sync_live_state_updates_current_record() {
        let (manager, surface, _) = session();
        let tab = manager.create_tab("https://a.example", false).unwrap();

        surface.set_url("https://a.example/next");
        surface.set_title(Some("Next"));
        manager.sync_live_state().unwrap();

        let current = manager.current_tab().unwrap();
        assert_eq!(current.id, tab.id);
        assert_eq!(current.url, "https://a.example/next");
        assert_eq!(current.title, "Next");
    }
}
