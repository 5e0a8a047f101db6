//! Integration tests for status-page component scraping.

use std::io::{self, Read};

use statuscheck_html::components::ComponentSelectors;
use statuscheck_html::{ComponentParser, Issue, ParseError, TokenizeError, parse_components};

/// Helper to scrape a page and return the issue descriptions
fn scrape(html: &str) -> Vec<String> {
    parse_components(html.as_bytes())
        .expect("parse failed")
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Helper to build one component block
fn component(name: &str, status: &str) -> String {
    format!(
        r#"<div class="component-container border-color">
  <div class="component-inner-container status-green">
    <div class="component-name">{name}</div>
    <div class="component-status">{status}</div>
  </div>
</div>"#
    )
}

/// Reader that hands out a single byte per call
struct OneByteReader<'a> {
    data: &'a [u8],
}

impl Read for OneByteReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.data.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.data = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn test_all_operational() {
    let html = format!(
        "<html><body>{}</body></html>",
        component("bunny.net", "Operational")
    );
    assert!(scrape(&html).is_empty());
}

#[test]
fn test_two_issues_in_document_order() {
    let html = format!(
        "<html><body>{}{}{}</body></html>",
        component("Voice Service", "MAJOR"),
        component("Website", "Operational"),
        component("ServiceNow", "MINOR"),
    );
    assert_eq!(scrape(&html), vec!["Voice Service: MAJOR", "ServiceNow: MINOR"]);
}

#[test]
fn test_status_without_name() {
    let html = r#"<div class="component-status">Partial Outage</div>"#;
    let issues = parse_components(html.as_bytes()).unwrap();
    assert_eq!(
        issues,
        vec![Issue {
            name: String::new(),
            status: "Partial Outage".to_string(),
        }]
    );
    assert_eq!(issues[0].description(), ": Partial Outage");
}

#[test]
fn test_record_resets_after_status() {
    let html = r#"
        <div class="component-name">API</div>
        <div class="component-status">Operational</div>
        <div class="component-status">Major Outage</div>"#;
    assert_eq!(scrape(html), vec![": Major Outage"]);
}

#[test]
fn test_no_markers_no_issues() {
    assert!(scrape("<html><body><p>Nothing to see</p></body></html>").is_empty());
    assert!(scrape("").is_empty());
}

#[test]
fn test_entities_are_decoded_before_comparison() {
    let html = r#"<div class="component-name">AT&amp;T &#x2F; Voice</div>
        <div class="component-status">Degraded&nbsp;Performance</div>
        <div class="component-name">Edge</div>
        <div class="component-status">Operational&#32;</div>"#;
    assert_eq!(
        scrape(html),
        vec!["AT&T / Voice: Degraded\u{a0}Performance"]
    );
}

#[test]
fn test_entities_outside_the_common_set() {
    let html = r#"<div class="component-name">&Ecirc;dge &oelig; &hyphen; &Ocirc;</div>
        <div class="component-status">Degraded&ThinSpace;x</div>
        <div class="component-name">a&notb</div>
        <div class="component-status">MAJOR</div>"#;
    assert_eq!(
        scrape(html),
        vec![
            "\u{ca}dge \u{153} \u{2010} \u{d4}: Degraded\u{2009}x",
            "a\u{ac}b: MAJOR",
        ]
    );
}

#[test]
fn test_escaped_entity_decodes_to_character() {
    let html = r#"<div class="component-name">AT&amp;amp;T</div><div class="component-status">MAJOR&amp;lt;</div>"#;
    assert_eq!(scrape(html), vec!["AT&T: MAJOR<"]);
}

#[test]
fn test_nested_status_marker_gives_empty_status() {
    let html = r#"<div class="component-status"><div class="component-status">MAJOR</div></div>"#;
    assert_eq!(scrape(html), vec![": "]);
}

#[test]
fn test_comment_after_name_marker_is_the_name() {
    let html = r#"<div class="component-name"><!--API-->API</div><div class="component-status">MAJOR</div>"#;
    assert_eq!(scrape(html), vec!["API: MAJOR"]);
}

#[test]
fn test_value_end_tag_closes_component_block() {
    let mut parser = ComponentParser::default();
    let html = r#"<div class="component"><div class="component-status"></div></div>"#;
    let issues = parser.parse(html.as_bytes()).unwrap();
    assert_eq!(issues.len(), 1);
    assert!(!parser.inside_component());
}

#[test]
fn test_text_is_trimmed() {
    let html = "<div class=\"component-name\">\n    CDN\n  </div><div class=\"component-status\">\n  Operational\n</div>";
    assert!(scrape(html).is_empty());
}

#[test]
fn test_status_is_case_sensitive() {
    let html = r#"<div class="component-name">CDN</div><div class="component-status">operational</div>"#;
    assert_eq!(scrape(html), vec!["CDN: operational"]);
}

#[test]
fn test_empty_status_element_is_an_issue() {
    let html = r#"<div class="component-name">CDN</div><div class="component-status"></div>"#;
    assert_eq!(scrape(html), vec!["CDN: "]);
}

#[test]
fn test_nested_element_in_name_gives_empty_name() {
    let html = r#"<div class="component-name"><span>CDN</span></div><div class="component-status">MAJOR</div>"#;
    assert_eq!(scrape(html), vec![": MAJOR"]);
}

#[test]
fn test_generic_marker_wins_over_name() {
    let html = r#"<div class="component component-name">Ignored</div>
        <div class="component-status">MAJOR</div>"#;
    assert_eq!(scrape(html), vec![": MAJOR"]);
}

#[test]
fn test_name_wins_over_status() {
    let html = r#"<div class="component-status component-name">DNS</div>
        <div class="component-status">MINOR</div>"#;
    assert_eq!(scrape(html), vec!["DNS: MINOR"]);
}

#[test]
fn test_duplicate_class_attribute_first_wins() {
    let html = r#"<div class="component-name" class="component-status">DNS</div>
        <div class="component-status" class="component-name">MINOR</div>"#;
    assert_eq!(scrape(html), vec!["DNS: MINOR"]);
}

#[test]
fn test_other_element_types_are_ignored() {
    let html = r#"<span class="component-name">DNS</span><p class="component-status">MINOR</p>"#;
    assert!(scrape(html).is_empty());
}

#[test]
fn test_markers_in_script_are_ignored() {
    let html = r#"<script>
        document.write('<div class="component-status">Fake</div>');
    </script>
    <style>.component-status { color: red; }</style>
    <!-- <div class="component-status">Also fake</div> -->
    <div class="component-name">API</div><div class="component-status">MINOR</div>"#;
    assert_eq!(scrape(html), vec!["API: MINOR"]);
}

#[test]
fn test_markers_in_other_attributes_are_ignored() {
    let html = r#"<div id="component-status" data-class="component-name">MAJOR</div>"#;
    assert!(scrape(html).is_empty());
}

#[test]
fn test_nested_containers_keep_component_block_open() {
    let mut parser = ComponentParser::default();
    let html = r#"<div class="component">
        <div class="component-name">API</div>
        <div class="wrapper"><div class="component-status">MAJOR</div></div>
        <div class="tooltip">"#;
    let issues = parser.parse(html.as_bytes()).unwrap();
    assert_eq!(issues.len(), 1);
    // The outer block is still open when the input ends
    assert!(parser.inside_component());

    let closed = format!("{html}</div></div>");
    let _ = parser.parse(closed.as_bytes()).unwrap();
    assert!(!parser.inside_component());
}

#[test]
fn test_custom_container() {
    let html = r#"<li class="component-name">DNS</li><li class="component-status">MINOR</li>"#;
    let mut parser = ComponentParser::new(ComponentSelectors::with_container("li"));
    let issues = parser.parse(html.as_bytes()).unwrap();
    assert_eq!(issues[0].to_string(), "DNS: MINOR");
    assert_eq!(parser.selectors().container, "li");
}

#[test]
fn test_custom_operational_label() {
    let selectors = ComponentSelectors {
        operational: "Up".to_string(),
        ..ComponentSelectors::default()
    };
    let html = r#"<div class="component-name">A</div><div class="component-status">Up</div>
        <div class="component-name">B</div><div class="component-status">Operational</div>"#;
    let issues = ComponentParser::new(selectors).parse(html.as_bytes()).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].name, "B");
}

#[test]
fn test_truncated_stream_discards_issues() {
    let html = format!(
        "{}<div class=\"component-name\">Late</div><div class=\"component-sta",
        component("Voice Service", "MAJOR")
    );
    let result = parse_components(html.as_bytes());
    match result {
        Err(ParseError::Tokenize(TokenizeError::UnexpectedEof { .. })) => {}
        other => panic!("Expected truncation error, got {other:?}"),
    }
}

#[test]
fn test_invalid_utf8_is_a_parse_error() {
    let bytes: &[u8] = b"<div class=\"component-status\">\xC3\x28</div>";
    assert!(matches!(
        parse_components(bytes),
        Err(ParseError::Tokenize(TokenizeError::InvalidUtf8 { .. }))
    ));
}

#[test]
fn test_parse_error_message_carries_cause() {
    let err = parse_components("<div class=\"x".as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "unexpected end of input inside tag on line 1");
}

#[test]
fn test_one_byte_reads_give_same_issues() {
    let html = format!(
        "{}{}<div class=\"component-name\">Caf\u{e9} \u{1F310}</div><div class=\"component-status\">Maintenance</div>",
        component("Voice Service", "MAJOR"),
        component("bunny.net", "Operational"),
    );
    let bulk = parse_components(html.as_bytes()).unwrap();
    let trickled = parse_components(OneByteReader {
        data: html.as_bytes(),
    })
    .unwrap();
    assert_eq!(bulk, trickled);
    assert_eq!(trickled.len(), 2);
    assert_eq!(trickled[1].name, "Caf\u{e9} \u{1F310}");
}
