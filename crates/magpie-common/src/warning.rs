//! Deduplicated warnings with colored terminal output.
//!
//! A warning is printed at most once per unique message, so tight loops over
//! a document cannot spam stderr. Used by the selector components to report
//! unsupported syntax and documented limitations.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Messages that have already been printed.
fn warned() -> &'static Mutex<HashSet<String>> {
    static WARNED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    WARNED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Warn about an unsupported feature or limitation (prints once per unique
/// message).
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unsupported pseudo-class ':hover' in selector");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_time = warned().lock().unwrap().insert(key);

    if first_time {
        eprintln!("{YELLOW}[Magpie {component}] ⚠ {message}{RESET}");
    }
}

/// Clear all recorded warnings (call when switching to a new document).
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    warned().lock().unwrap().clear();
}
