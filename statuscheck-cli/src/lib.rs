//! Status-page monitoring check.
//!
//! Fetches a hosted status page, lists every component that is not
//! operational and maps the result onto monitoring-plugin exit codes.

/// Fetch-and-scan pipeline.
pub mod check;
/// Command-line configuration.
pub mod config;
/// Subscriber setup.
pub mod logging;
/// Output and exit codes.
pub mod report;

use std::io::{self, Write};

pub use check::{CheckError, check_document, execute_check};
pub use config::Cli;
pub use logging::init_logging;
pub use report::{CheckState, write_report};

/// Run the check described by `cli`, print the result to `out` and return
/// the resulting state.
///
/// # Errors
///
/// Returns any error from writing to `out`. Check failures are part of the
/// report, not errors.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> io::Result<CheckState> {
    let outcome = execute_check(cli);
    if let Err(err) = &outcome {
        tracing::debug!(error = %err, "check failed");
    }
    write_report(out, &outcome)
}
