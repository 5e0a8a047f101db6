//! HTTP fetch utilities for the statuscheck monitor.
//!
//! Provides a blocking HTTP GET wrapper that hands the response body back as a
//! stream, so the parser can consume the document without buffering it.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use thiserror::Error;
use tracing::{debug, warn};

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("statuscheck/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to retrieve the status page.
///
/// A non-success HTTP status is not an error here: the
/// body of an error page is still handed to the parser.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request could not be built, sent, or answered.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// Knobs for a single retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Upper bound on the whole exchange, including reading the body.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetch a URL and return the response, whose body implements [`std::io::Read`].
///
/// The caller owns the response; dropping it releases the connection on every
/// exit path, including a failed parse.
///
/// # Errors
///
/// Returns [`FetchError::Client`] if the HTTP client cannot be created and
/// [`FetchError::Request`] if the URL is invalid or the transport fails.
pub fn fetch_stream(url: &str, options: &FetchOptions) -> Result<Response, FetchError> {
    let client = Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(FetchError::Client)?;

    debug!(url, timeout = ?options.timeout, "fetching status page");

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .map_err(FetchError::Request)?;

    let status = response.status();
    if status.is_success() {
        debug!(%status, "status page responded");
    } else {
        warn!(%status, url, "status page returned a non-success status; parsing body anyway");
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(FetchOptions::default().timeout, Duration::from_secs(30));
    }

    #[test]
    fn user_agent_carries_crate_version() {
        assert!(USER_AGENT.starts_with("statuscheck/"));
    }
}
