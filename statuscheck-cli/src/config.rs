//! Command-line and environment configuration.

use std::time::Duration;

use clap::{ArgAction, Parser};
use statuscheck_common::FetchOptions;
use statuscheck_html::components::{ComponentSelectors, DEFAULT_CONTAINER};

/// Environment variable consulted when `--url` is absent.
pub const URL_ENV: &str = "STATUS_PAGE_URL";

/// Report status-page components that are not operational
#[derive(Parser, Debug, Clone)]
#[command(name = "check-statuspage")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXIT CODES:
    0  OK        all components operational
    1  WARNING   configuration problem (missing URL)
    2  CRITICAL  non-operational components, or the page could not be read
    3  UNKNOWN   invalid command line

EXAMPLES:
    # Check a hosted status page
    check-statuspage --url https://status.example.com

    # Same, configured through the environment
    STATUS_PAGE_URL=https://status.example.com check-statuspage

    # Pages that mark components on list items, with debug logging
    check-statuspage -u https://status.example.com --container li -v
")]
pub struct Cli {
    /// Status page URL
    #[arg(short, long, env = URL_ENV, value_name = "URL")]
    pub url: Option<String>,

    /// Element type whose class attribute carries the component markers
    #[arg(long, value_name = "ELEMENT", default_value = DEFAULT_CONTAINER)]
    pub container: String,

    /// Request timeout in seconds
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Configuration with only a URL set.
    #[must_use]
    pub fn with_url(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            container: DEFAULT_CONTAINER.to_string(),
            timeout: 30,
            verbose: 0,
        }
    }

    /// The URL, if one was given and is not blank.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    /// Component markers for the configured container.
    #[must_use]
    pub fn selectors(&self) -> ComponentSelectors {
        ComponentSelectors::with_container(&self.container)
    }

    /// Request settings.
    #[must_use]
    pub const fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["check-statuspage", "--url", "https://status.example.com"])
            .unwrap();
        assert_eq!(cli.url(), Some("https://status.example.com"));
        assert_eq!(cli.container, "div");
        assert_eq!(cli.fetch_options().timeout, Duration::from_secs(30));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from([
            "check-statuspage",
            "-u",
            "https://status.example.com",
            "-t",
            "5",
            "-vv",
            "--container",
            "LI",
        ])
        .unwrap();
        assert_eq!(cli.fetch_options().timeout, Duration::from_secs(5));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.selectors().container, "li");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["check-statuspage", "-t", "0"]).is_err());
    }

    #[test]
    fn blank_url_counts_as_missing() {
        assert_eq!(Cli::with_url("   ").url(), None);
    }
}
