//! Warnings with colored terminal output.
//!
//! Provides deduplication so a selector that fails repeatedly in one run is
//! only reported once.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Format a warning line for `component`.
fn format_warning(component: &str, message: &str) -> String {
    format!("[csspath {component}] ⚠ {message}")
}

/// Record `key` and report whether it had not been seen before.
fn first_sighting(key: String) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Warn about a recoverable problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("query", "Invalid selector: 'div.'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let line = format_warning(component, message);
    if first_sighting(line.clone()) {
        eprintln!("{}", line.yellow());
    }
}

/// Clear all recorded warnings (call between independent batches)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
