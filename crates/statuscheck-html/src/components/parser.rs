//! Token-stream scan that extracts non-operational components.

use std::io::Read;

use thiserror::Error;

use super::containment::ContainmentTracker;
use super::record::{ComponentRecord, Issue};
use super::selectors::{ComponentSelectors, Marker};
use crate::tokenizer::{HTMLTokenizer, Token, TokenizeError, unescape};

/// The page could not be scanned to the end.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The tokenizer stopped on a read failure, bad encoding or a truncated tag.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

/// Scans a status page for components whose status is not operational.
///
/// The scan looks at start tags of the container element type only. A name
/// or status element consumes the token that immediately follows it, whatever
/// it is; text and comment tokens supply the value, anything else yields an
/// empty string. Each status completes the current record, which becomes an
/// [`Issue`] when the status differs from the operational label.
#[derive(Debug, Default)]
pub struct ComponentParser {
    selectors: ComponentSelectors,
    record: ComponentRecord,
    containment: ContainmentTracker,
}

impl ComponentParser {
    /// Parser using the given markers.
    #[must_use]
    pub fn new(selectors: ComponentSelectors) -> Self {
        Self {
            selectors,
            record: ComponentRecord::default(),
            containment: ContainmentTracker::default(),
        }
    }

    /// Markers in use.
    #[must_use]
    pub const fn selectors(&self) -> &ComponentSelectors {
        &self.selectors
    }

    /// Whether the scan is currently inside a component block.
    ///
    /// Informational; it never decides whether an issue is reported.
    #[must_use]
    pub const fn inside_component(&self) -> bool {
        self.containment.inside_component()
    }

    /// Scan `reader` to the end and return the issues in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if tokenization fails. No partial results are
    /// returned in that case.
    pub fn parse<R: Read>(&mut self, reader: R) -> Result<Vec<Issue>, ParseError> {
        self.record = ComponentRecord::default();
        self.containment = ContainmentTracker::default();

        let mut tokenizer = HTMLTokenizer::new(reader);
        let mut issues = Vec::new();

        loop {
            let token = tokenizer.next_token()?;
            match &token {
                Token::EndOfFile => break,
                Token::StartTag {
                    name, self_closing, ..
                } if *name == self.selectors.container => {
                    let marker = token
                        .attribute("class")
                        .and_then(|class| self.selectors.classify(class));
                    if !*self_closing {
                        self.containment.open(marker == Some(Marker::Component));
                    }
                    match marker {
                        Some(Marker::Name) => {
                            let name = self.take_value(&mut tokenizer)?;
                            tracing::debug!(name = %name, "captured component name");
                            self.record.capture_name(name);
                        }
                        Some(Marker::Status) => {
                            let status = self.take_value(&mut tokenizer)?;
                            if let Some(issue) = self.complete(status) {
                                issues.push(issue);
                            }
                        }
                        Some(Marker::Component) | None => {}
                    }
                }
                Token::EndTag { name, .. } if *name == self.selectors.container => {
                    self.containment.close();
                }
                _ => {}
            }
        }

        tracing::debug!(issues = issues.len(), "finished scanning status page");
        Ok(issues)
    }

    fn complete(&mut self, status: String) -> Option<Issue> {
        if self.record.pending_name().is_none() {
            tracing::debug!(status = %status, "status without a preceding name");
        }
        let component = self.record.complete(status);
        if self.selectors.is_operational(&component.status) {
            tracing::trace!(name = %component.name, "component operational");
            None
        } else {
            tracing::debug!(
                name = %component.name,
                status = %component.status,
                "component not operational"
            );
            Some(Issue::from(component))
        }
    }

    /// Consume the token after a name or status element.
    ///
    /// The token is never scanned for markers. Text, comment and DOCTYPE
    /// tokens give their content. Markup text counts as character data first
    /// and as an encoded value second, so it is decoded twice before being
    /// trimmed. A consumed container tag still moves the depth tracker.
    fn take_value<R: Read>(
        &mut self,
        tokenizer: &mut HTMLTokenizer<R>,
    ) -> Result<String, TokenizeError> {
        let token = tokenizer.next_token()?;
        let raw = match &token {
            Token::Text { data } | Token::Comment { data } => data.as_str(),
            Token::Doctype { name } => name.as_deref().unwrap_or_default(),
            Token::StartTag {
                name, self_closing, ..
            } if *name == self.selectors.container => {
                if !*self_closing {
                    self.containment.open(false);
                }
                ""
            }
            Token::EndTag { name, .. } if *name == self.selectors.container => {
                self.containment.close();
                ""
            }
            _ => "",
        };
        Ok(unescape(&unescape(raw)).trim().to_string())
    }
}

/// Scan `reader` with the default markers.
///
/// # Errors
///
/// Returns [`ParseError`] if tokenization fails.
pub fn parse_components<R: Read>(reader: R) -> Result<Vec<Issue>, ParseError> {
    ComponentParser::default().parse(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(html: &str) -> Vec<String> {
        parse_components(html.as_bytes())
            .unwrap()
            .iter()
            .map(Issue::description)
            .collect()
    }

    #[test]
    fn reports_non_operational_component() {
        let html = r#"<div class="component">
            <div class="component-name">API</div>
            <div class="component-status">Degraded Performance</div>
        </div>"#;
        assert_eq!(issues(html), vec!["API: Degraded Performance"]);
    }

    #[test]
    fn operational_component_is_silent() {
        let html = r#"<div class="component-name">API</div><div class="component-status">Operational</div>"#;
        assert!(issues(html).is_empty());
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        let html = r#"<div class="component-name">   </div><div class="component-status">MAJOR</div>"#;
        assert_eq!(issues(html), vec![": MAJOR"]);
    }

    #[test]
    fn empty_name_element_end_tag_still_closes_it() {
        let mut parser = ComponentParser::default();
        let html = r#"<div class="component"><div class="component-name"></div>"#;
        let found = parser.parse(html.as_bytes()).unwrap();
        assert!(found.is_empty());
        // The name div's end tag is consumed as the value and still closes it
        assert!(parser.inside_component());
    }

    #[test]
    fn consumed_end_tag_keeps_depth_balanced() {
        let mut parser = ComponentParser::default();
        let html = r#"<div class="component"><div class="component-name"></div></div>"#;
        let _ = parser.parse(html.as_bytes()).unwrap();
        assert!(!parser.inside_component());
    }

    #[test]
    fn nested_status_element_is_consumed_as_value() {
        let html = r#"<div class="component-status"><div class="component-status">MAJOR</div></div>"#;
        assert_eq!(issues(html), vec![": "]);
    }

    #[test]
    fn comment_after_marker_supplies_value() {
        let html = r#"<div class="component-name"><!--API-->API</div><div class="component-status">MAJOR</div>"#;
        assert_eq!(issues(html), vec!["API: MAJOR"]);
    }

    #[test]
    fn text_is_decoded_twice() {
        let html = r#"<div class="component-name">AT&amp;amp;T</div><div class="component-status">MAJOR</div>"#;
        assert_eq!(issues(html), vec!["AT&T: MAJOR"]);
    }

    #[test]
    fn status_at_end_of_input_is_empty() {
        assert_eq!(issues(r#"<div class="component-status">"#), vec![": "]);
    }

    #[test]
    fn containment_resets_between_parses() {
        let mut parser = ComponentParser::default();
        let _ = parser.parse(r#"<div class="component">"#.as_bytes()).unwrap();
        assert!(parser.inside_component());
        let _ = parser.parse("".as_bytes()).unwrap();
        assert!(!parser.inside_component());
    }

    #[test]
    fn other_elements_are_ignored() {
        let html = r#"<span class="component-name">API</span><span class="component-status">MAJOR</span>"#;
        assert!(issues(html).is_empty());
    }

    #[test]
    fn custom_container_element() {
        let html = r#"<li class="component-name">DNS</li><li class="component-status">MINOR</li>
            <div class="component-status">ignored</div>"#;
        let found = ComponentParser::new(ComponentSelectors::with_container("li"))
            .parse(html.as_bytes())
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description(), "DNS: MINOR");
    }

    #[test]
    fn truncated_tag_is_an_error() {
        let result = parse_components(r#"<div class="component-status">MAJOR</div><div class="comp"#.as_bytes());
        assert!(matches!(result, Err(ParseError::Tokenize(_))));
    }
}
