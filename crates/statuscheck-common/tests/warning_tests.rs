//! Tests for the deduplicated warning channel and fetch error paths.

use statuscheck_common::warning::{clear_warnings, debug_once, first_report};
use statuscheck_common::{FetchError, FetchOptions, fetch_stream};

#[test]
fn test_first_report_deduplicates_and_clears() {
    let message = "unexpected character in tag name (dedup test)";
    assert!(first_report("Test", message));
    assert!(!first_report("Test", message));
    // Same message under another component is a distinct report
    assert!(first_report("Other", message));

    clear_warnings();
    assert!(first_report("Test", message));
}

#[test]
fn test_debug_once_records_the_message() {
    let message = "missing-attribute-value parse error (debug test)";
    debug_once("Test", message);
    assert!(!first_report("Test", message));
}

#[test]
fn test_invalid_url_is_request_error() {
    let result = fetch_stream("not a url", &FetchOptions::default());
    assert!(matches!(result, Err(FetchError::Request(_))));
}

#[test]
fn test_fetch_error_message_is_prefixed() {
    let Err(err) = fetch_stream("::", &FetchOptions::default()) else {
        panic!("expected an error for a malformed URL");
    };
    assert!(err.to_string().starts_with("request failed: "));
}
