//! Safari history search.
//!
//! Safari stopped exporting history as a plist in High Sierra, so the only
//! source left is the private SQLite database at
//! `~/Library/Safari/History.db`. Queries go through rusqlite with the
//! bundled SQLite; no system library is involved.

use crate::error::{Result, SafariError};
use chrono::{DateTime, Local};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Most results a search will return.
pub const MAX_SEARCH_RESULTS: usize = 200;

/// Seconds between the NSDate epoch (2001-01-01 UTC) and the Unix epoch.
const NSDATE_OFFSET: f64 = 978_307_200.0;

/// Location of Safari's history database.
pub fn default_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Library/Safari/History.db"))
        .ok_or(SafariError::NoHomeDir)
}

/// A visited page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub url: String,
    pub time: DateTime<Local>,
}

/// Safari's history database.
pub struct History {
    conn: Connection,
}

impl History {
    /// Open a history database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open the default history database.
    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    /// The `count` most recently visited pages.
    pub fn recent(&self, count: usize) -> Result<Vec<Entry>> {
        const QUERY: &str = "\
            SELECT url, visit_time, title
                FROM history_items
                    LEFT JOIN history_visits
                        ON history_visits.history_item = history_items.id
                WHERE title <> '' AND url LIKE 'http%'
                ORDER BY visit_time DESC LIMIT ?1";

        self.query(QUERY, rusqlite::params![count])
    }

    /// Pages whose title contains `query`, most recent first.
    pub fn search(&self, query: &str) -> Result<Vec<Entry>> {
        self.search_limit(query, MAX_SEARCH_RESULTS)
    }

    /// Like [`History::search`] with an explicit result cap.
    pub fn search_limit(&self, query: &str, limit: usize) -> Result<Vec<Entry>> {
        const QUERY: &str = "\
            SELECT url, visit_time, title
                FROM history_items
                    LEFT JOIN history_visits
                        ON history_visits.history_item = history_items.id
                WHERE title <> '' AND title LIKE ?1 AND url LIKE 'http%'
                ORDER BY visit_time DESC LIMIT ?2";

        let pattern = format!("%{}%", query);
        self.query(QUERY, rusqlite::params![pattern, limit])
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            let url: String = row.get(0)?;
            let when: f64 = row.get(1)?;
            let title: String = row.get(2)?;
            Ok((url, when, title))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (url, when, title) = row?;
            entries.push(Entry {
                title,
                url,
                time: nsdate_to_local(when),
            });
        }

        log::debug!("history query returned {} entries", entries.len());
        Ok(entries)
    }
}

/// Convert an NSDate timestamp (seconds since 2001-01-01 UTC) to local
/// time.
fn nsdate_to_local(seconds: f64) -> DateTime<Local> {
    let unix = (seconds + NSDATE_OFFSET) as i64;
    DateTime::from_timestamp(unix, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// History database with Safari's schema and a few visits.
    fn fixture() -> (tempfile::NamedTempFile, History) {
        let file = tempfile::NamedTempFile::new().expect("temp file failed");

        let conn = Connection::open(file.path()).expect("open failed");
        conn.execute_batch(
            "CREATE TABLE history_items (id INTEGER PRIMARY KEY, url TEXT);
             CREATE TABLE history_visits (
                 id INTEGER PRIMARY KEY,
                 history_item INTEGER,
                 visit_time REAL,
                 title TEXT
             );
             INSERT INTO history_items (id, url) VALUES
                 (1, 'https://www.rust-lang.org/'),
                 (2, 'https://crates.io/'),
                 (3, 'file:///tmp/local.html');
             INSERT INTO history_visits (history_item, visit_time, title) VALUES
                 (1, 700000000.0, 'Rust Programming Language'),
                 (2, 700000100.0, 'Rust crates registry'),
                 (2, 700000200.0, ''),
                 (3, 700000300.0, 'Local file');",
        )
        .expect("schema failed");
        drop(conn);

        let history = History::open(file.path()).expect("history open failed");
        (file, history)
    }

    #[test]
    fn test_recent_orders_and_filters() {
        let (_file, history) = fixture();

        let entries = history.recent(10).expect("recent failed");
        // The untitled visit and the non-http URL are filtered out
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Rust crates registry");
        assert_eq!(entries[1].title, "Rust Programming Language");
    }

    #[test]
    fn test_recent_respects_count() {
        let (_file, history) = fixture();
        let entries = history.recent(1).expect("recent failed");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_search_matches_title() {
        let (_file, history) = fixture();

        let entries = history.search("crates").expect("search failed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://crates.io/");

        // LIKE matching is case-insensitive
        let entries = history.search("CRATES").expect("search failed");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_search_limit() {
        let (_file, history) = fixture();
        let entries = history.search_limit("Rust", 1).expect("search failed");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_search_no_matches() {
        let (_file, history) = fixture();
        let entries = history.search("no-such-page").expect("search failed");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_nsdate_conversion() {
        let (_file, history) = fixture();

        let entries = history.search("registry").expect("search failed");
        let expected_unix = 700000100 + 978307200;
        assert_eq!(
            entries[0].time.with_timezone(&Utc).timestamp(),
            expected_unix
        );
    }
}
