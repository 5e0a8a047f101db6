//! HTML scanning for status pages.
//!
//! A streaming tokenizer over any [`std::io::Read`] and a component scanner
//! built on it. Nothing builds a DOM; the page is read once, front to back.
//!
//! ```
//! use statuscheck_html::parse_components;
//!
//! let html = r#"<div class="component-name">API</div>
//!               <div class="component-status">Major Outage</div>"#;
//! let issues = parse_components(html.as_bytes()).unwrap();
//! assert_eq!(issues[0].to_string(), "API: Major Outage");
//! ```

/// Component extraction from the token stream.
pub mod components;
/// Streaming HTML tokenizer.
pub mod tokenizer;

pub use components::{ComponentParser, ComponentSelectors, Issue, ParseError, parse_components};
pub use tokenizer::{HTMLTokenizer, Token, TokenizeError};
