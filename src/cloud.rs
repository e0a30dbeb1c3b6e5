//! iCloud tabs.
//!
//! Tabs open on the user's other devices are synced into
//! `~/Library/Safari/CloudTabs.db`, another private SQLite database.

use crate::error::{Result, SafariError};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Location of Safari's iCloud tabs database.
pub fn default_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Library/Safari/CloudTabs.db"))
        .ok_or(SafariError::NoHomeDir)
}

/// A tab open on another device.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CloudTab {
    pub title: String,
    pub url: String,
    /// Name of the device the tab is open on.
    pub device: String,
}

/// The iCloud tabs database.
pub struct CloudTabs {
    conn: Connection,
}

impl CloudTabs {
    /// Open an iCloud tabs database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open the default iCloud tabs database.
    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    /// All synced tabs, grouped by device.
    pub fn tabs(&self) -> Result<Vec<CloudTab>> {
        const QUERY: &str = "\
            SELECT t.title, t.url, IFNULL(d.device_name, '')
                FROM cloud_tabs t
                    LEFT JOIN cloud_tab_devices d
                        ON t.device_uuid = d.device_uuid
                ORDER BY d.device_name, t.title";

        let mut stmt = self.conn.prepare(QUERY)?;
        let rows = stmt.query_map([], |row| {
            Ok(CloudTab {
                title: row.get(0)?,
                url: row.get(1)?,
                device: row.get(2)?,
            })
        })?;

        let mut tabs = Vec::new();
        for row in rows {
            tabs.push(row?);
        }

        log::debug!("loaded {} cloud tabs", tabs.len());
        Ok(tabs)
    }
}
