//! Class-name markers that identify status blocks.

/// Default element type wrapping status blocks.
pub const DEFAULT_CONTAINER: &str = "div";
/// Default status text of a healthy component.
pub const OPERATIONAL: &str = "Operational";

/// What a container element's class attribute marks it as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A block holding one component.
    Component,
    /// The element whose text is the component name.
    Name,
    /// The element whose text is the component status.
    Status,
}

/// The substrings and element type the scraper looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSelectors {
    /// Element type carrying the markers (lowercase).
    pub container: String,
    /// Generic component block marker.
    pub component: String,
    /// Component name marker.
    pub name: String,
    /// Component status marker.
    pub status: String,
    /// Status text meaning "nothing to report".
    pub operational: String,
}

impl Default for ComponentSelectors {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            component: "component".to_string(),
            name: "component-name".to_string(),
            status: "component-status".to_string(),
            operational: OPERATIONAL.to_string(),
        }
    }
}

impl ComponentSelectors {
    /// Default markers on a different container element.
    #[must_use]
    pub fn with_container(container: &str) -> Self {
        Self {
            container: container.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Classify a class attribute value.
    ///
    /// Only the first matching marker counts, checked in the order
    /// component, name, status. A class token is a component marker when it
    /// contains the component substring without being one of the more
    /// specific markers, so `"component component-name"` is a component block
    /// while `"component-name"` is a name.
    #[must_use]
    pub fn classify(&self, class: &str) -> Option<Marker> {
        if class
            .split_ascii_whitespace()
            .any(|token| self.is_component_token(token))
        {
            Some(Marker::Component)
        } else if class.contains(self.name.as_str()) {
            Some(Marker::Name)
        } else if class.contains(self.status.as_str()) {
            Some(Marker::Status)
        } else {
            None
        }
    }

    fn is_component_token(&self, token: &str) -> bool {
        token.contains(self.component.as_str())
            && !token.contains(self.name.as_str())
            && !token.contains(self.status.as_str())
    }

    /// Whether `status` means the component is healthy. Exact match only.
    #[must_use]
    pub fn is_operational(&self, status: &str) -> bool {
        status == self.operational
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_single_markers() {
        let selectors = ComponentSelectors::default();
        assert_eq!(selectors.classify("component"), Some(Marker::Component));
        assert_eq!(selectors.classify("component-name"), Some(Marker::Name));
        assert_eq!(selectors.classify("component-status"), Some(Marker::Status));
        assert_eq!(selectors.classify("header"), None);
        assert_eq!(selectors.classify(""), None);
    }

    #[test]
    fn substring_matches_count() {
        let selectors = ComponentSelectors::default();
        assert_eq!(selectors.classify("flex component-container"), Some(Marker::Component));
        assert_eq!(selectors.classify("text-sm component-name-label"), Some(Marker::Name));
        assert_eq!(selectors.classify("badge component-status--major"), Some(Marker::Status));
    }

    #[test]
    fn generic_marker_takes_priority_when_combined() {
        let selectors = ComponentSelectors::default();
        assert_eq!(selectors.classify("component component-name"), Some(Marker::Component));
        assert_eq!(selectors.classify("component-status component"), Some(Marker::Component));
        // Name is checked before status
        assert_eq!(selectors.classify("component-status component-name"), Some(Marker::Name));
    }

    #[test]
    fn operational_is_exact() {
        let selectors = ComponentSelectors::default();
        assert!(selectors.is_operational("Operational"));
        assert!(!selectors.is_operational("operational"));
        assert!(!selectors.is_operational("Operational "));
    }

    #[test]
    fn container_is_lowercased() {
        assert_eq!(ComponentSelectors::with_container("SECTION").container, "section");
    }
}
