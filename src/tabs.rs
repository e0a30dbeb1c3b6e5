//! Safari window and tab access: enumeration, activation and closing.
//!
//! Enumeration is a single bridge round-trip running an embedded JXA script
//! that emits every browser window and its tabs as JSON. The Scripting
//! Bridge is slow (roughly half a second per call); callers listing
//! repeatedly would be wise to cache the result for a few seconds.

use crate::activate::{DEFAULT_APPLICATION, TabActivator};
use crate::error::Result;
use crate::script;
use serde::{Deserialize, Serialize};

/// JXA script emitting every window and tab as JSON.
const GET_TABS_JS: &str = include_str!("scripts/get_tabs.js");

/// JXA script closing windows or tab ranges.
const CLOSE_JS: &str = include_str!("scripts/close.js");

/// A Safari tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// 1-based position within the owning window.
    pub index: usize,
    /// 1-based position of the owning window.
    pub window_index: usize,
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// A Safari window and its tabs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// 1-based front-to-back position.
    pub index: usize,
    /// 1-based ordinal of the window's current tab.
    pub active_tab: usize,
    pub tabs: Vec<Tab>,
}

/// What a close operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTarget {
    /// The window itself.
    Window,
    /// A single tab.
    Tab,
    /// Every tab in the window except the given one.
    TabsOther,
    /// Tabs to the left of the given one.
    TabsLeft,
    /// Tabs to the right of the given one.
    TabsRight,
}

impl CloseTarget {
    /// Target name understood by the close script.
    pub fn as_str(self) -> &'static str {
        match self {
            CloseTarget::Window => "win",
            CloseTarget::Tab => "tab",
            CloseTarget::TabsOther => "tabs-other",
            CloseTarget::TabsLeft => "tabs-left",
            CloseTarget::TabsRight => "tabs-right",
        }
    }
}

/// List Safari's open windows and their tabs, front to back.
///
/// Non-browser windows (anything without a current tab) are skipped.
pub fn windows() -> Result<Vec<Window>> {
    script::run_jxa_json(GET_TABS_JS, &[DEFAULT_APPLICATION])
}

/// Activate the given window and tab.
///
/// A `tab` of 0 raises the window without changing its current tab.
pub fn activate(window: i64, tab: i64) -> Result<()> {
    TabActivator::new().activate(window, tab)
}

/// Activate the given window, leaving its current tab alone.
pub fn activate_window(window: i64) -> Result<()> {
    activate(window, 0)
}

/// Activate the given tab.
pub fn activate_tab(window: i64, tab: i64) -> Result<()> {
    activate(window, tab)
}

/// Close a window or tabs within it.
///
/// A `window` of 0 means the frontmost window; a `tab` of 0 means the
/// window's current tab (for tab targets).
pub fn close(target: CloseTarget, window: usize, tab: usize) -> Result<()> {
    let window = if window == 0 { 1 } else { window };

    log::debug!(
        "close target={} window={} tab={}",
        target.as_str(),
        window,
        tab
    );

    script::run_jxa(
        CLOSE_JS,
        &[
            DEFAULT_APPLICATION,
            target.as_str(),
            &window.to_string(),
            &tab.to_string(),
        ],
    )?;

    Ok(())
}

/// Close the given window. 0 closes the frontmost window.
pub fn close_window(window: usize) -> Result<()> {
    close(CloseTarget::Window, window, 0)
}

/// Close the given tab. A `tab` of 0 closes the window's current tab.
pub fn close_tab(window: usize, tab: usize) -> Result<()> {
    close(CloseTarget::Tab, window, tab)
}

/// Close all tabs in the window except the given one.
pub fn close_tabs_other(window: usize, tab: usize) -> Result<()> {
    close(CloseTarget::TabsOther, window, tab)
}

/// Close the tabs to the left of the given one.
pub fn close_tabs_left(window: usize, tab: usize) -> Result<()> {
    close(CloseTarget::TabsLeft, window, tab)
}

/// Close the tabs to the right of the given one.
pub fn close_tabs_right(window: usize, tab: usize) -> Result<()> {
    close(CloseTarget::TabsRight, window, tab)
}
