//! Fetch, scan and classify a status page.

use std::io::Read;

use statuscheck_common::warning::clear_warnings;
use statuscheck_common::{FetchError, fetch_stream};
use statuscheck_html::components::ComponentSelectors;
use statuscheck_html::{ComponentParser, Issue, ParseError};
use thiserror::Error;

use crate::config::Cli;
use crate::report::CheckState;

/// Why a check could not produce a list of issues.
#[derive(Debug, Error)]
pub enum CheckError {
    /// No status page URL was configured.
    #[error("--url or STATUS_PAGE_URL environment variable is required")]
    MissingUrl,
    /// The status page could not be retrieved.
    #[error("error fetching status page: {0}")]
    Fetch(#[source] FetchError),
    /// The status page could not be scanned.
    #[error("error parsing HTML: {0}")]
    Parse(#[source] ParseError),
}

impl CheckError {
    /// Severity reported for this failure.
    #[must_use]
    pub const fn state(&self) -> CheckState {
        match self {
            Self::MissingUrl => CheckState::Warning,
            Self::Fetch(_) | Self::Parse(_) => CheckState::Critical,
        }
    }
}

/// Run the whole check: resolve the URL, fetch, scan.
///
/// The response is dropped before this returns, whatever the outcome.
///
/// # Errors
///
/// [`CheckError::MissingUrl`] before any network activity if no URL is set,
/// otherwise [`CheckError::Fetch`] or [`CheckError::Parse`].
pub fn execute_check(cli: &Cli) -> Result<Vec<Issue>, CheckError> {
    let url = cli.url().ok_or(CheckError::MissingUrl)?;
    let response = fetch_stream(url, &cli.fetch_options()).map_err(CheckError::Fetch)?;
    check_document(response, cli.selectors())
}

/// Scan an already-open document. Parse warnings are reported afresh for
/// each document.
///
/// # Errors
///
/// Returns [`CheckError::Parse`] if the document cannot be tokenized.
pub fn check_document<R: Read>(
    reader: R,
    selectors: ComponentSelectors,
) -> Result<Vec<Issue>, CheckError> {
    clear_warnings();
    let issues = ComponentParser::new(selectors)
        .parse(reader)
        .map_err(CheckError::Parse)?;
    tracing::info!(issues = issues.len(), "status page checked");
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_is_a_warning() {
        let cli = Cli {
            url: None,
            ..Cli::with_url("unused")
        };
        let err = execute_check(&cli).unwrap_err();
        assert!(matches!(err, CheckError::MissingUrl));
        assert_eq!(err.state(), CheckState::Warning);
    }

    #[test]
    fn invalid_url_is_a_fetch_error() {
        let err = execute_check(&Cli::with_url("not a url")).unwrap_err();
        assert!(matches!(err, CheckError::Fetch(FetchError::Request(_))));
        assert_eq!(err.state(), CheckState::Critical);
        assert!(err.to_string().starts_with("error fetching status page: request failed: "));
    }

    #[test]
    fn truncated_document_is_a_parse_error() {
        let err = check_document("<div class".as_bytes(), ComponentSelectors::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "error parsing HTML: unexpected end of input inside tag on line 1"
        );
    }
}
