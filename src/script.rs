//! Execution of embedded JXA scripts through the macOS OSA bridge.
//!
//! Every interaction with a live Safari goes through `/usr/bin/osascript`
//! running JavaScript for Automation. Calls are synchronous and blocking;
//! the only latency is the bridge itself. Script arguments are passed as
//! argv elements, never interpolated into script text.

use crate::error::{Result, SafariError};
use serde::de::DeserializeOwned;
use std::process::Command;
use std::str::FromStr;

/// The system OSA script runner.
const OSASCRIPT: &str = "/usr/bin/osascript";

/// Run a JXA script and return its stdout.
///
/// A non-zero exit from `osascript` maps to [`SafariError::ScriptFailed`]
/// carrying the script's stderr. Stderr from successful runs (JXA's
/// `console.log` writes there) is logged at debug level.
pub(crate) fn run_jxa(script: &str, args: &[&str]) -> Result<Vec<u8>> {
    log::debug!("running osascript with {} arg(s)", args.len());

    let output = Command::new(OSASCRIPT)
        .args(["-l", "JavaScript", "-e", script])
        .args(args)
        .output()
        .map_err(|e| SafariError::ScriptFailed(format!("failed to run {}: {}", OSASCRIPT, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(SafariError::ScriptFailed(stderr));
    }

    if !output.stderr.is_empty() {
        log::debug!(
            "osascript stderr: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(output.stdout)
}

/// Run a JXA script and decode its stdout as JSON.
pub(crate) fn run_jxa_json<T: DeserializeOwned>(script: &str, args: &[&str]) -> Result<T> {
    let data = run_jxa(script, args)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Run a JXA script and parse its trimmed stdout as a single value.
pub(crate) fn run_jxa_value<T: FromStr>(script: &str, args: &[&str]) -> Result<T> {
    let data = run_jxa(script, args)?;
    let text = String::from_utf8_lossy(&data);
    let trimmed = text.trim();
    trimmed
        .parse()
        .map_err(|_| SafariError::UnexpectedOutput(trimmed.to_string()))
}
