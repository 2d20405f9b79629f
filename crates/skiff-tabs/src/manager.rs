//! Tab Manager
//!
//! Write-through cache of every tab record. Ordering queries are answered
//! from memory; every mutation is persisted before the cache changes.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use skiff_storage::{decode_timestamp, encode_timestamp, Database};

use crate::error::TabError;
use crate::partition::TabPartition;
use crate::tab::Tab;
use crate::Result;

pub struct TabManager {
    /// In-memory tab cache
    tabs: Arc<RwLock<HashMap<String, Tab>>>,
    /// Database for persistence
    db: Database,
}

impl TabManager {
    pub fn new(db: Database) -> Self {
        Self {
            tabs: Arc::new(RwLock::new(HashMap::new())),
            db,
        }
    }

    /// Load every persisted tab into the cache
    pub fn load_all(&self) -> Result<Vec<Tab>> {
        let tabs: Vec<Tab> = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, title, is_private, preview_image, created_at, last_accessed_at
                 FROM tabs",
            )?;

            let tabs: Vec<Tab> = stmt
                .query_map([], |row| {
                    let created_str: String = row.get(5)?;
                    let accessed_str: String = row.get(6)?;

                    Ok(Tab {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        is_private: row.get::<_, i32>(3)? != 0,
                        preview_image: row.get(4)?,
                        created_at: decode_timestamp(&created_str),
                        last_accessed_at: decode_timestamp(&accessed_str),
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(tabs)
        })?;

        {
            let mut cache = self.tabs.write();
            for tab in &tabs {
                cache.insert(tab.id.clone(), tab.clone());
            }
        }

        tracing::debug!(count = tabs.len(), "Loaded persisted tabs");

        Ok(tabs)
    }

    /// Create and persist a new tab
    pub fn create_tab(&self, url: String, is_private: bool) -> Result<Tab> {
        let tab = Tab::new(url, is_private)?;

        self.save_tab(&tab)?;
        self.tabs.write().insert(tab.id.clone(), tab.clone());

        tracing::info!(tab_id = %tab.id, url = %tab.url, partition = %tab.partition(), "Created new tab");

        Ok(tab)
    }

    /// Get a tab by ID
    pub fn get_tab(&self, tab_id: &str) -> Result<Tab> {
        self.tabs
            .read()
            .get(tab_id)
            .cloned()
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    /// Update a tab
    pub fn update_tab(&self, tab: &Tab) -> Result<()> {
        if !self.tabs.read().contains_key(&tab.id) {
            return Err(TabError::NotFound(tab.id.clone()));
        }

        self.save_tab(tab)?;
        self.tabs.write().insert(tab.id.clone(), tab.clone());
        Ok(())
    }

    /// Apply `f` to a stored tab and persist the result
    pub fn modify_tab<F>(&self, tab_id: &str, f: F) -> Result<Tab>
    where
        F: FnOnce(&mut Tab),
    {
        let mut tab = self.get_tab(tab_id)?;
        f(&mut tab);
        self.update_tab(&tab)?;
        Ok(tab)
    }

    /// Remove a tab, returning its last state
    pub fn close_tab(&self, tab_id: &str) -> Result<Tab> {
        let tab = self.get_tab(tab_id)?;

        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM tabs WHERE id = ?1", [tab_id])?;
            Ok(())
        })?;

        self.tabs.write().remove(tab_id);

        tracing::info!(tab_id = %tab_id, "Closed tab");

        Ok(tab)
    }

    /// Tabs in `partition`, most recently accessed first
    pub fn list(&self, partition: TabPartition) -> Vec<Tab> {
        let mut tabs: Vec<Tab> = self
            .tabs
            .read()
            .values()
            .filter(|t| t.partition() == partition)
            .cloned()
            .collect();

        tabs.sort_by(|a, b| {
            b.last_accessed_at
                .cmp(&a.last_accessed_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        tabs
    }

    pub fn most_recent(&self, partition: TabPartition) -> Option<Tab> {
        self.list(partition).into_iter().next()
    }

    pub fn count(&self, partition: TabPartition) -> usize {
        self.tabs
            .read()
            .values()
            .filter(|t| t.partition() == partition)
            .count()
    }

    /// Save tab to database
    fn save_tab(&self, tab: &Tab) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO tabs
                 (id, url, title, is_private, preview_image, created_at, last_accessed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    tab.id,
                    tab.url,
                    tab.title,
                    tab.is_private as i32,
                    tab.preview_image,
                    encode_timestamp(&tab.created_at),
                    encode_timestamp(&tab.last_accessed_at),
                ],
            )?;
            Ok(())
        })?)
    }
}

impl Clone for TabManager {
    fn clone(&self) -> Self {
        Self {
            tabs: Arc::clone(&self.tabs),
            db: self.db.clone(),
        }
    }
}
