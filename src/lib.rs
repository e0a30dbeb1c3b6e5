//! # safari-use
//!
//! A Rust library for Safari automation on macOS, built on the OSA
//! scripting bridge (`osascript` running JavaScript for Automation) and
//! Safari's on-disk data stores.
//!
//! ## Features
//!
//! - **Activation**: raise a window by ordinal and optionally switch to a
//!   tab within it
//! - **Enumeration**: list open windows and tabs as typed values
//! - **Close operations**: close windows, single tabs, or tab ranges
//! - **Bookmarks / Reading List**: parse `Bookmarks.plist`
//! - **History**: search Safari's private history database
//! - **iCloud tabs**: list tabs open on the user's other devices
//!
//! ## CLI
//!
//! The `safari` binary (feature `cli`, on by default) exposes the library
//! from the terminal:
//!
//! ```bash
//! # Raise the second window and switch to its third tab
//! safari activate 2 3
//!
//! # List open tabs, bookmarks or iCloud tabs
//! safari list tabs
//! safari list cloud --json
//!
//! # Close every tab to the right of tab 4 in the frontmost window
//! safari close tabs-right 1 4
//! ```
//!
//! ## Library usage
//!
//! ### Activating a window or tab
//!
//! ```rust,no_run
//! use safari_use::TabActivator;
//!
//! # fn main() -> safari_use::Result<()> {
//! // Raise the second window without touching its current tab
//! TabActivator::new().activate(2, 0)?;
//!
//! // Raise the first window and make its third tab current
//! TabActivator::new().activate(1, 3)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Listing windows and tabs
//!
//! ```rust,no_run
//! # fn main() -> safari_use::Result<()> {
//! for window in safari_use::windows()? {
//!     println!("window {} has {} tabs", window.index, window.tabs.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Activation logic is generic over the [`WindowService`] trait, so it can
//! be driven against a fake service in tests; [`OsaWindowService`] is the
//! real bridge-backed implementation.
//!
//! ## Module overview
//!
//! - [`activate`]: window/tab activation and the [`WindowService`] trait
//! - [`tabs`]: window/tab enumeration and close operations
//! - [`bookmarks`]: `Bookmarks.plist` parsing
//! - [`history`]: history database search
//! - [`cloud`]: iCloud tabs
//! - [`error`]: error types and result alias
//!
//! macOS only at runtime: the bridge requires `/usr/bin/osascript` and the
//! data stores live under `~/Library/Safari/`.

pub mod activate;
pub mod bookmarks;
pub mod cloud;
pub mod error;
pub mod history;
mod script;
pub mod tabs;

pub use activate::{OsaWindowService, TabActivator, WindowService, parse_ordinal};
pub use error::{Result, SafariError};
pub use tabs::{
    CloseTarget, Tab, Window, activate, activate_tab, activate_window, close, close_tab,
    close_tabs_left, close_tabs_other, close_tabs_right, close_window, windows,
};
