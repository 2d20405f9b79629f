//! History storage and browsing

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::visibility::host_of;
use crate::Result;
use skiff_storage::{decode_timestamp, encode_timestamp, Database};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub visited_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(title: String, url: String, visited_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            url,
            visited_at,
        }
    }
}

/// Consecutive entries visited on the same calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySection {
    pub title: String,
    pub entries: Vec<HistoryEntry>,
}

pub struct HistoryStore {
    db: Database,
}

impl HistoryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, entry: &HistoryEntry) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO history (id, url, title, visited_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    entry.id,
                    entry.url,
                    entry.title,
                    encode_timestamp(&entry.visited_at)
                ],
            )?;
            Ok(())
        })?)
    }

    /// Most recent visits first
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, title, visited_at FROM history
                 ORDER BY visited_at DESC
                 LIMIT ?1",
            )?;

            let entries: Vec<HistoryEntry> = stmt
                .query_map([limit as i64], |row| {
                    let visited_str: String = row.get(3)?;
                    Ok(HistoryEntry {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        visited_at: decode_timestamp(&visited_str),
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(entries)
        })?)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.db.with_connection(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
            Ok(count as usize)
        })?)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute("DELETE FROM history WHERE id = ?1", [id])?;
            Ok(())
        })?)
    }

    /// Delete a selection of entries in one transaction
    pub fn delete_many(&self, ids: &[String]) -> Result<usize> {
        Ok(self.db.transaction(|conn| {
            let mut removed = 0;
            for id in ids {
                removed += conn.execute("DELETE FROM history WHERE id = ?1", [id])?;
            }
            Ok(removed)
        })?)
    }

    pub fn clear_all(&self) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute("DELETE FROM history", [])?;
            Ok(())
        })?)
    }
}

impl Clone for HistoryStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

/// Case-insensitive match on title, URL or host. A blank needle keeps
/// everything.
pub fn filter_entries(entries: &[HistoryEntry], needle: &str) -> Vec<HistoryEntry> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }

    entries
        .iter()
        .filter(|entry| matches_needle(&entry.title, &entry.url, &needle))
        .cloned()
        .collect()
}

pub(crate) fn matches_needle(title: &str, url: &str, needle: &str) -> bool {
    title.to_lowercase().contains(needle)
        || url.to_lowercase().contains(needle)
        || host_of(url).is_some_and(|host| host.to_lowercase().contains(needle))
}

/// Split already-ordered entries into day sections relative to `now`.
///
/// Sections are titled "Today", "Yesterday", or e.g. "March 4, 2024".
/// Input order is preserved; a day only forms one section if its entries
/// are adjacent.
pub fn group_by_day<Tz: TimeZone>(entries: &[HistoryEntry], now: &DateTime<Tz>) -> Vec<HistorySection> {
    let tz = now.timezone();
    let today = now.date_naive();
    let yesterday = today.pred_opt();

    let mut sections: Vec<HistorySection> = Vec::new();
    for entry in entries {
        let day = entry.visited_at.with_timezone(&tz).date_naive();
        let title = if day == today {
            "Today".to_string()
        } else if Some(day) == yesterday {
            "Yesterday".to_string()
        } else {
            day.format("%B %-d, %Y").to_string()
        };

        match sections.last_mut() {
            Some(section) if section.title == title => section.entries.push(entry.clone()),
            _ => sections.push(HistorySection {
                title,
                entries: vec![entry.clone()],
            }),
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(title: &str, url: &str, visited_at: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry::new(title.to_string(), url.to_string(), visited_at)
    }

    #[test]
    fn test_history_store() {
        let db = Database::open_in_memory().unwrap();
        let store = HistoryStore::new(db);
        let now = Utc::now();

        let older = entry("Example", "https://example.com", now - Duration::minutes(5));
        let newer = entry("Rust", "https://rust-lang.org", now);
        store.insert(&older).unwrap();
        store.insert(&newer).unwrap();

        let recent = store.recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, newer.id);
        assert_eq!(recent[1].id, older.id);

        store.delete(&newer.id).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        store.clear_all().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_selection() {
        let store = HistoryStore::new(Database::open_in_memory().unwrap());
        let now = Utc::now();
        let a = entry("A", "https://a.example", now);
        let b = entry("B", "https://b.example", now);
        let c = entry("C", "https://c.example", now);
        for e in [&a, &b, &c] {
            store.insert(e).unwrap();
        }

        let removed = store
            .delete_many(&[a.id.clone(), c.id.clone(), "missing".to_string()])
            .unwrap();
        assert_eq!(removed, 2);

        let left = store.recent(10).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b.id);
    }

    #[test]
    fn test_filter_uses_title_url_and_host() {
        let now = Utc::now();
        let entries = vec![
            entry("Docs", "https://developer.apple.com/documentation", now),
            entry("Search", "https://duckduckgo.com/?q=swift", now),
        ];

        assert_eq!(filter_entries(&entries, "docs").len(), 1);
        assert_eq!(filter_entries(&entries, "DUCKDUCKGO.com").len(), 1);
        assert_eq!(filter_entries(&entries, "  ").len(), 2);
        assert!(filter_entries(&entries, "nothing").is_empty());
    }

    #[test]
    fn test_sections_group_today_and_yesterday() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        let yesterday = today - Duration::days(1);
        let earlier = today - Duration::days(3);

        let entries = vec![
            entry("Today Item", "https://example.com/today", today),
            entry("Also Today", "https://example.com/today2", today - Duration::hours(1)),
            entry("Yesterday Item", "https://example.com/yesterday", yesterday),
            entry("Old Item", "https://example.com/old", earlier),
        ];

        let sections = group_by_day(&entries, &now);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Today", "Yesterday", "March 2, 2024"]);
        assert_eq!(sections[0].entries.len(), 2);
    }
}
