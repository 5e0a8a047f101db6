//! Integration tests for character reference decoding.

use std::borrow::Cow;

use statuscheck_html::tokenizer::named_character_references::lookup_entity;
use statuscheck_html::tokenizer::unescape;

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("nbsp"), Some("\u{00A0}"));
    assert_eq!(lookup_entity("copy"), Some("\u{00A9}"));
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_unescape_plain_text_borrows() {
    assert!(matches!(unescape("Major Outage"), Cow::Borrowed("Major Outage")));
}

#[test]
fn test_unescape_mixed_references() {
    assert_eq!(
        unescape("Degraded&nbsp;Performance &amp; &#65;&#x42; &copy 2024"),
        "Degraded\u{a0}Performance & AB \u{a9} 2024"
    );
}

#[test]
fn test_unescape_numeric_edge_cases() {
    assert_eq!(unescape("&#0;"), "\u{FFFD}");
    assert_eq!(unescape("&#xD800;"), "\u{FFFD}");
    assert_eq!(unescape("&#x110000;"), "\u{FFFD}");
    assert_eq!(unescape("&#99999999999999;"), "\u{FFFD}");
    // Windows-1252 remapping
    assert_eq!(unescape("&#150;"), "\u{2013}");
    assert_eq!(unescape("&#x80;"), "\u{20AC}");
}

#[test]
fn test_unescape_leaves_unknown_references() {
    assert_eq!(unescape("AT&T"), "AT&T");
    assert_eq!(unescape("&bogus; & &#; &#x;"), "&bogus; & &#; &#x;");
}
