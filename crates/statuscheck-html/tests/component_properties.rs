//! Property tests for component scraping.

use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use statuscheck_html::parse_components;
use statuscheck_html::tokenizer::unescape;

/// A name or status made of characters that never form markup.
#[derive(Debug, Clone)]
struct Label(String);

impl Arbitrary for Label {
    fn arbitrary(g: &mut Gen) -> Self {
        const ALPHABET: &[char] = &[
            'a', 'b', 'Z', 'O', '0', '9', ' ', '.', '-', '_', '(', ')', '\u{e9}', '\u{4e2d}',
        ];
        let len = usize::arbitrary(g) % 16;
        let text: String = (0..len)
            .map(|_| *g.choose(ALPHABET).unwrap_or(&'a'))
            .collect();
        Self(text.trim().to_string())
    }
}

/// Whether the component is reported as healthy.
#[derive(Debug, Clone)]
struct Entry {
    name: Label,
    status: Label,
    operational: bool,
}

impl Arbitrary for Entry {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            name: Label::arbitrary(g),
            status: Label::arbitrary(g),
            operational: bool::arbitrary(g),
        }
    }
}

impl Entry {
    fn status(&self) -> &str {
        if self.operational { "Operational" } else { &self.status.0 }
    }
}

fn render(entries: &[Entry]) -> String {
    let mut html = String::from("<!DOCTYPE html><html><body>");
    for entry in entries {
        html.push_str(&format!(
            r#"<div class="component"><div class="component-name"> {} </div><div class="component-status">{}</div></div>"#,
            entry.name.0,
            entry.status()
        ));
    }
    html.push_str("</body></html>");
    html
}

#[quickcheck]
fn prop_issues_follow_document_order(entries: Vec<Entry>) -> bool {
    let expected: Vec<(String, String)> = entries
        .iter()
        .filter(|entry| entry.status() != "Operational")
        .map(|entry| (entry.name.0.clone(), entry.status().to_string()))
        .collect();

    let Ok(issues) = parse_components(render(&entries).as_bytes()) else {
        return false;
    };
    let actual: Vec<(String, String)> = issues
        .into_iter()
        .map(|issue| (issue.name, issue.status))
        .collect();
    actual == expected
}

#[quickcheck]
fn prop_all_operational_is_empty(names: Vec<Label>) -> bool {
    let entries: Vec<Entry> = names
        .into_iter()
        .map(|name| Entry {
            name,
            status: Label(String::new()),
            operational: true,
        })
        .collect();
    parse_components(render(&entries).as_bytes()).is_ok_and(|issues| issues.is_empty())
}

#[quickcheck]
fn prop_truncation_inside_a_tag_is_an_error(entries: Vec<Entry>, cut: usize) -> TestResult {
    let html = render(&entries);
    // Cut one character into a start tag name
    let starts: Vec<usize> = html
        .match_indices('<')
        .map(|(i, _)| i + 1)
        .filter(|&i| html.as_bytes()[i].is_ascii_alphabetic())
        .collect();
    if starts.is_empty() {
        return TestResult::discard();
    }
    let end = starts[cut % starts.len()];
    TestResult::from_bool(parse_components(&html.as_bytes()[..end + 1]).is_err())
}

#[quickcheck]
fn prop_unescape_without_ampersand_is_identity(text: String) -> TestResult {
    if text.contains('&') {
        return TestResult::discard();
    }
    TestResult::from_bool(unescape(&text) == text.as_str())
}
