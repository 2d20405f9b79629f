//! Bookmark storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::matches_needle;
use crate::Result;
use skiff_storage::{decode_timestamp, encode_timestamp, Database};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub saved_at: DateTime<Utc>,
}

impl BookmarkEntry {
    pub fn new(title: String, url: String, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            url,
            saved_at,
        }
    }
}

pub struct BookmarkStore {
    db: Database,
}

impl BookmarkStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, bookmark: &BookmarkEntry) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO bookmarks (id, url, title, saved_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    bookmark.id,
                    bookmark.url,
                    bookmark.title,
                    encode_timestamp(&bookmark.saved_at)
                ],
            )?;
            Ok(())
        })?)
    }

    /// All bookmarks, newest first
    pub fn list(&self) -> Result<Vec<BookmarkEntry>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, title, saved_at FROM bookmarks ORDER BY saved_at DESC",
            )?;

            let bookmarks: Vec<BookmarkEntry> = stmt
                .query_map([], |row| {
                    let saved_str: String = row.get(3)?;
                    Ok(BookmarkEntry {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        saved_at: decode_timestamp(&saved_str),
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(bookmarks)
        })?)
    }

    pub fn delete_many(&self, ids: &[String]) -> Result<usize> {
        Ok(self.db.transaction(|conn| {
            let mut removed = 0;
            for id in ids {
                removed += conn.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?;
            }
            Ok(removed)
        })?)
    }

    pub fn clear_all(&self) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute("DELETE FROM bookmarks", [])?;
            Ok(())
        })?)
    }
}

impl Clone for BookmarkStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

/// Same matching rules as history search.
pub fn filter_bookmarks(bookmarks: &[BookmarkEntry], needle: &str) -> Vec<BookmarkEntry> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return bookmarks.to_vec();
    }

    bookmarks
        .iter()
        .filter(|b| matches_needle(&b.title, &b.url, &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bookmark(title: &str, url: &str) -> BookmarkEntry {
        BookmarkEntry::new(title.to_string(), url.to_string(), Utc::now())
    }

    #[test]
    fn test_bookmark_store() {
        let store = BookmarkStore::new(Database::open_in_memory().unwrap());
        let mut first = bookmark("OpenAI", "https://openai.com");
        first.saved_at = Utc::now() - Duration::hours(1);
        let second = bookmark("Apple", "https://apple.com");
        store.insert(&first).unwrap();
        store.insert(&second).unwrap();

        let ids: Vec<String> = store.list().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

        assert_eq!(store.delete_many(&[first.id.clone()]).unwrap(), 1);
        assert_eq!(store.list().unwrap().len(), 1);

        store.clear_all().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_filter_returns_all_when_search_is_blank() {
        let entries = vec![
            bookmark("OpenAI", "https://openai.com"),
            bookmark("Apple", "https://apple.com"),
        ];
        assert_eq!(filter_bookmarks(&entries, "  ").len(), 2);
    }

    #[test]
    fn test_filter_matches_title_url_and_host() {
        let entries = vec![
            bookmark("OpenAI", "https://openai.com/research"),
            bookmark("Apple", "https://developer.apple.com"),
            bookmark("Swift", "https://swift.org"),
        ];

        assert_eq!(filter_bookmarks(&entries, "openai").len(), 1);
        assert_eq!(filter_bookmarks(&entries, "developer.apple.com").len(), 1);
        assert_eq!(filter_bookmarks(&entries, "swift.org").len(), 1);
    }
}
