//! The component currently being assembled, and what comes out of it.

use core::fmt;
use std::mem;

/// A completed component record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name; empty when the status had no preceding name.
    pub name: String,
    /// Status text as shown on the page.
    pub status: String,
}

/// A component reporting a state other than operational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Component name, possibly empty.
    pub name: String,
    /// The non-operational status.
    pub status: String,
}

impl Issue {
    /// `"<name>: <status>"`
    #[must_use]
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<Component> for Issue {
    fn from(component: Component) -> Self {
        Self {
            name: component.name,
            status: component.status,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.status)
    }
}

/// The single in-flight record.
///
/// ```text
/// Idle --name--> NameCaptured --status--> (Component) --> Idle
///   \------------------status-----------/
/// ```
///
/// Completing the record hands out the finished [`Component`] and always
/// returns to `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ComponentRecord {
    /// Nothing captured yet.
    #[default]
    Idle,
    /// A name is waiting for its status.
    NameCaptured {
        /// The pending name.
        name: String,
    },
}

impl ComponentRecord {
    /// Store the pending name. A later name replaces an earlier one.
    pub fn capture_name(&mut self, name: String) {
        *self = Self::NameCaptured { name };
    }

    /// Pair `status` with the pending name (empty if none) and reset.
    pub fn complete(&mut self, status: String) -> Component {
        let name = match mem::take(self) {
            Self::Idle => String::new(),
            Self::NameCaptured { name } => name,
        };
        Component { name, status }
    }

    /// The name waiting for a status, if any.
    #[must_use]
    pub fn pending_name(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::NameCaptured { name } => Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_pairs_and_resets() {
        let mut record = ComponentRecord::default();
        record.capture_name("Voice Service".to_string());
        assert_eq!(record.pending_name(), Some("Voice Service"));

        let component = record.complete("MAJOR".to_string());
        assert_eq!(component.name, "Voice Service");
        assert_eq!(component.status, "MAJOR");
        assert_eq!(record, ComponentRecord::Idle);
    }

    #[test]
    fn status_without_name_has_empty_name() {
        let mut record = ComponentRecord::default();
        let issue = Issue::from(record.complete("Partial Outage".to_string()));
        assert_eq!(issue.description(), ": Partial Outage");
    }

    #[test]
    fn later_name_replaces_earlier() {
        let mut record = ComponentRecord::default();
        record.capture_name("first".to_string());
        record.capture_name("second".to_string());
        assert_eq!(record.complete("MINOR".to_string()).name, "second");
    }
}
