//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` / `debug_do!` for output shown only with `--verbose`
//! - `request` / `failure` lines for the serve loop
//!
//! # Example
//!
//! ```ignore
//! log!("collection"; "loaded {} components", count);
//! debug!("publish"; "not found: {}", path);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
    time::SystemTime,
};

use crate::utils::date::{DateTimeUtc, Precision};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Execute code only when --verbose is enabled
///
/// Use this to avoid computing expensive debug data when not needed.
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// One served request: `[HH:MM:SS] 200 GET /path`.
pub fn request(status: u16, method: &str, url: &str) {
    let status = match status {
        200..=299 => status.green().to_string(),
        300..=399 => status.cyan().to_string(),
        _ => status.yellow().to_string(),
    };
    log("serve", &format!("{} {status} {method} {url}", timestamp()));
}

/// A failure with optional multi-line detail, marked with a red cross.
pub fn failure(summary: &str, detail: &str) {
    let message = if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    };
    log("error", &format!("{} {} {message}", timestamp(), "✗".red()));
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold().to_string(),
        "publish" => prefix.bright_cyan().bold().to_string(),
        "collection" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

/// Current UTC time formatted as HH:MM:SS, dimmed
fn timestamp() -> String {
    let now = DateTimeUtc::from_system_time(SystemTime::now()).to_iso(Precision::Second);
    let clock = now.split_once('T').map_or(now.as_str(), |(_, t)| t);
    format!("[{clock}]").dimmed().to_string()
}

// ============================================================================
// Tests
// ============================================================================
