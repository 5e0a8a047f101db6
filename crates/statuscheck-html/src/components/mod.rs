//! Status-page component scraping.
//!
//! Walks the token stream of a status page and reports every component whose
//! status text is not the operational label.

/// Component block depth tracking.
pub mod containment;
/// The scan itself.
pub mod parser;
/// Completed records and reported issues.
pub mod record;
/// Class-name markers.
pub mod selectors;

pub use containment::ContainmentTracker;
pub use parser::{ComponentParser, ParseError, parse_components};
pub use record::{Component, ComponentRecord, Issue};
pub use selectors::{ComponentSelectors, DEFAULT_CONTAINER, Marker, OPERATIONAL};
