//! Deduplicated diagnostics for recoverable problems.
//!
//! Provides deduplication to avoid logging the same problem multiple times.
//! Used by the tokenizer to report parse errors it recovers from. They are
//! diagnostics, not failures, so they go to `tracing` at debug level and only
//! show up with `-v`.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of messages we've already reported (to deduplicate)
static REPORTED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Record `message` for `component` and tell whether this is its first report
/// since the last [`clear_warnings`].
#[must_use]
pub fn first_report(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    REPORTED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Log a recoverable problem at debug level, once per unique message.
///
/// # Example
/// ```ignore
/// debug_once("HTML Tokenizer", "duplicate-attribute parse error");
/// ```
pub fn debug_once(component: &str, message: &str) {
    if first_report(component, message) {
        tracing::debug!(component, "{message}");
    }
}

/// Clear all recorded messages (call before checking a new document).
pub fn clear_warnings() {
    let mut guard = REPORTED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
