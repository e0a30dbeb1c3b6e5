//! Error types and result alias for Safari automation operations.

use thiserror::Error;

/// Errors that can occur while driving Safari or reading its data stores.
#[derive(Debug, Error)]
pub enum SafariError {
    /// A window argument did not parse as an integer.
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// A tab argument did not parse as an integer.
    #[error("Invalid tab: {0}")]
    InvalidTab(String),

    /// A window ordinal parsed but no window exists at that position.
    #[error("Invalid window: {0}")]
    WindowNotFound(i64),

    /// A tab ordinal parsed but the resolved window has no tab at that
    /// position.
    #[error("Invalid tab for window {window}: {tab}")]
    TabNotFound { window: i64, tab: i64 },

    /// The scripting bridge reported a failure.
    #[error("osascript failed: {0}")]
    ScriptFailed(String),

    /// A bridge script printed something other than the expected value.
    #[error("unexpected script output: {0}")]
    UnexpectedOutput(String),

    /// Script output could not be decoded as JSON.
    #[error("failed to decode script output: {0}")]
    Json(#[from] serde_json::Error),

    /// Bookmarks.plist could not be read or parsed.
    #[error("failed to parse bookmarks: {0}")]
    Plist(#[from] plist::Error),

    /// A query against History.db or CloudTabs.db failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The home directory could not be located, so no default data store
    /// path exists.
    #[error("could not locate the home directory")]
    NoHomeDir,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SafariError>;
