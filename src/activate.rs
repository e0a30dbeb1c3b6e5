//! Window and tab activation.
//!
//! Activation is split into a small [`WindowService`] trait covering the
//! operations Safari exposes through the scripting bridge, and a
//! [`TabActivator`] that does ordinal resolution and the raise/switch
//! sequence on top of it. The split keeps the activation logic testable
//! against an in-memory service.

use crate::error::{Result, SafariError};
use crate::script;
use std::str::FromStr;

/// JXA script implementing the individual window operations.
const WINDOW_OPS_JS: &str = include_str!("scripts/window_ops.js");

/// The application driven by default.
pub const DEFAULT_APPLICATION: &str = "Safari";

/// Operations the activation logic needs from the automation surface.
///
/// Window and tab arguments are 1-based ordinals in the front-to-back
/// (windows) and left-to-right (tabs) enumeration order of the application.
/// Callers validate ordinals against the counts before issuing the other
/// calls; implementations may still fail any call when the window list
/// changes underneath them.
pub trait WindowService {
    /// Number of open windows.
    fn window_count(&mut self) -> Result<usize>;

    /// Number of tabs in the given window.
    fn tab_count(&mut self, window: usize) -> Result<usize>;

    /// Bring the owning application to the foreground.
    fn activate_app(&mut self) -> Result<()>;

    /// Write a window's visibility flag.
    ///
    /// Raising an already-visible window requires toggling the flag off and
    /// back on; a bare activate is not enough when the window is visible
    /// but not topmost. The toggle stays two explicit calls rather than a
    /// combined raise operation.
    fn set_window_visible(&mut self, window: usize, visible: bool) -> Result<()>;

    /// Whether the tab is the window's current tab.
    fn is_active_tab(&mut self, window: usize, tab: usize) -> Result<bool>;

    /// Make the tab the window's current tab.
    fn set_active_tab(&mut self, window: usize, tab: usize) -> Result<()>;
}

/// [`WindowService`] implementation driving an application through
/// `osascript`. Every call is one synchronous bridge round-trip.
pub struct OsaWindowService {
    application: String,
}

impl OsaWindowService {
    /// Service for Safari.
    pub fn new() -> Self {
        Self::for_application(DEFAULT_APPLICATION)
    }

    /// Service for another Safari-like scriptable application
    /// (e.g. "Safari Technology Preview").
    pub fn for_application(name: impl Into<String>) -> Self {
        Self {
            application: name.into(),
        }
    }

    /// Name of the application this service drives.
    pub fn application(&self) -> &str {
        &self.application
    }

    fn op(&self, args: &[&str]) -> Result<()> {
        let mut argv = vec![self.application.as_str()];
        argv.extend_from_slice(args);
        script::run_jxa(WINDOW_OPS_JS, &argv)?;
        Ok(())
    }

    fn op_value<T: FromStr>(&self, args: &[&str]) -> Result<T> {
        let mut argv = vec![self.application.as_str()];
        argv.extend_from_slice(args);
        script::run_jxa_value(WINDOW_OPS_JS, &argv)
    }
}

impl Default for OsaWindowService {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowService for OsaWindowService {
    fn window_count(&mut self) -> Result<usize> {
        self.op_value(&["window-count"])
    }

    fn tab_count(&mut self, window: usize) -> Result<usize> {
        self.op_value(&["tab-count", &window.to_string()])
    }

    fn activate_app(&mut self) -> Result<()> {
        self.op(&["activate-app"])
    }

    fn set_window_visible(&mut self, window: usize, visible: bool) -> Result<()> {
        let flag = if visible { "true" } else { "false" };
        self.op(&["set-visible", &window.to_string(), flag])
    }

    fn is_active_tab(&mut self, window: usize, tab: usize) -> Result<bool> {
        self.op_value(&["is-active-tab", &window.to_string(), &tab.to_string()])
    }

    fn set_active_tab(&mut self, window: usize, tab: usize) -> Result<()> {
        self.op(&["set-active-tab", &window.to_string(), &tab.to_string()])
    }
}

/// Parse the leading base-10 integer of a string.
///
/// `parseInt`-style: leading whitespace and an optional sign are consumed,
/// parsing stops at the first non-digit, and a string without leading
/// digits has no value. `"12abc"` parses to 12; `"abc"` to `None`.
pub fn parse_ordinal(s: &str) -> Option<i64> {
    let rest = s.trim_start();
    let (negative, rest) = if let Some(r) = rest.strip_prefix('-') {
        (true, r)
    } else if let Some(r) = rest.strip_prefix('+') {
        (false, r)
    } else {
        (false, rest)
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in rest[..end].bytes() {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(b - b'0'));
    }

    Some(if negative { -value } else { value })
}

/// Raises a window to the foreground and optionally switches its tab.
pub struct TabActivator<S> {
    service: S,
}

impl TabActivator<OsaWindowService> {
    /// Activator over the default Safari bridge.
    pub fn new() -> Self {
        Self::with_service(OsaWindowService::new())
    }
}

impl Default for TabActivator<OsaWindowService> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WindowService> TabActivator<S> {
    /// Activator over a custom service.
    pub fn with_service(service: S) -> Self {
        Self { service }
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Process a raw argument list: a required window ordinal and an
    /// optional tab ordinal (default 0, window only).
    ///
    /// Arguments that do not parse as integers yield
    /// [`SafariError::InvalidWindow`] / [`SafariError::InvalidTab`]
    /// carrying the raw argument text.
    pub fn run(&mut self, args: &[String]) -> Result<()> {
        let raw_window = args.first().map(String::as_str).unwrap_or("");
        let window = parse_ordinal(raw_window)
            .ok_or_else(|| SafariError::InvalidWindow(raw_window.to_string()))?;

        let tab = match args.get(1) {
            Some(raw) => {
                parse_ordinal(raw).ok_or_else(|| SafariError::InvalidTab(raw.clone()))?
            }
            None => 0,
        };

        self.activate(window, tab)
    }

    /// Bring `window` to the front and, when `tab` is non-zero, make that
    /// tab current.
    ///
    /// Ordinals are 1-based. A `tab` of 0 raises the window without
    /// touching its current tab. Switching to the already-current tab is a
    /// no-op, so repeated calls settle on the same state.
    pub fn activate(&mut self, window: i64, tab: i64) -> Result<()> {
        let win = self.resolve_window(window)?;

        if tab == 0 {
            return self.raise(win);
        }

        // Resolve the tab before touching the window, so a bad tab ordinal
        // leaves the window where it was.
        let tab_idx = self.resolve_tab(window, tab)?;

        self.raise(win)?;

        if !self.service.is_active_tab(win, tab_idx)? {
            self.service.set_active_tab(win, tab_idx)?;
        }

        Ok(())
    }

    fn resolve_window(&mut self, window: i64) -> Result<usize> {
        let count = self.service.window_count()? as i64;
        if window < 1 || window > count {
            return Err(SafariError::WindowNotFound(window));
        }
        Ok(window as usize)
    }

    fn resolve_tab(&mut self, window: i64, tab: i64) -> Result<usize> {
        let count = self.service.tab_count(window as usize)? as i64;
        if tab < 1 || tab > count {
            return Err(SafariError::TabNotFound { window, tab });
        }
        Ok(tab as usize)
    }

    /// Activate the application and force the window to the front by
    /// toggling its visibility flag off and back on.
    fn raise(&mut self, window: usize) -> Result<()> {
        self.service.activate_app()?;
        self.service.set_window_visible(window, false)?;
        self.service.set_window_visible(window, true)
    }
}
