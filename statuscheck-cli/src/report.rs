//! Check output and exit codes.

use std::io::{self, Write};
use std::process::ExitCode;

use statuscheck_html::Issue;
use strum_macros::Display;

use crate::check::CheckError;

/// Monitoring-plugin check state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CheckState {
    /// Everything is operational.
    Ok,
    /// The check is misconfigured.
    Warning,
    /// Something is down or the page could not be read.
    Critical,
    /// The check could not run at all.
    Unknown,
}

impl CheckState {
    /// Process exit code for this state.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }
}

impl From<CheckState> for ExitCode {
    fn from(state: CheckState) -> Self {
        Self::from(state.exit_code())
    }
}

/// Print the outcome of a check and return its state.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    outcome: &Result<Vec<Issue>, CheckError>,
) -> io::Result<CheckState> {
    match outcome {
        Ok(issues) if issues.is_empty() => {
            writeln!(out, "All components operational.")?;
            Ok(CheckState::Ok)
        }
        Ok(issues) => {
            writeln!(out, "Non-operational components:")?;
            for issue in issues {
                writeln!(out, " - {issue}")?;
            }
            Ok(CheckState::Critical)
        }
        Err(err) => {
            let state = err.state();
            writeln!(out, "{state}: {err}")?;
            Ok(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(outcome: &Result<Vec<Issue>, CheckError>) -> (CheckState, String) {
        let mut out = Vec::new();
        let state = write_report(&mut out, outcome).unwrap();
        (state, String::from_utf8(out).unwrap())
    }

    #[test]
    fn exit_codes() {
        assert_eq!(CheckState::Ok.exit_code(), 0);
        assert_eq!(CheckState::Warning.exit_code(), 1);
        assert_eq!(CheckState::Critical.exit_code(), 2);
        assert_eq!(CheckState::Unknown.exit_code(), 3);
    }

    #[test]
    fn state_names() {
        assert_eq!(CheckState::Ok.to_string(), "OK");
        assert_eq!(CheckState::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn empty_is_ok() {
        let (state, text) = render(&Ok(Vec::new()));
        assert_eq!(state, CheckState::Ok);
        assert_eq!(text, "All components operational.\n");
    }

    #[test]
    fn issues_are_listed() {
        let issues = vec![Issue {
            name: "API".to_string(),
            status: "MAJOR".to_string(),
        }];
        let (state, text) = render(&Ok(issues));
        assert_eq!(state, CheckState::Critical);
        assert_eq!(text, "Non-operational components:\n - API: MAJOR\n");
    }

    #[test]
    fn missing_url_is_reported() {
        let (state, text) = render(&Err(CheckError::MissingUrl));
        assert_eq!(state, CheckState::Warning);
        assert_eq!(
            text,
            "WARNING: --url or STATUS_PAGE_URL environment variable is required\n"
        );
    }
}
