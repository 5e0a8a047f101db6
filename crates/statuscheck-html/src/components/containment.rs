//! Tracks whether the scan is inside a component block.

/// Depth counter over the container element type.
///
/// Every opened container raises the depth; the component block is left only
/// when the container that opened it is closed, so nested containers inside a
/// block do not end it early.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainmentTracker {
    depth: usize,
    /// Depth of the container that opened the current component block.
    component_depth: Option<usize>,
}

impl ContainmentTracker {
    /// A container start tag. `marks_component` opens a component block
    /// unless one is already open.
    pub fn open(&mut self, marks_component: bool) {
        self.depth += 1;
        if marks_component && self.component_depth.is_none() {
            self.component_depth = Some(self.depth);
            tracing::debug!(depth = self.depth, "entered component block");
        }
    }

    /// A container end tag. Stray end tags at depth zero are ignored.
    pub fn close(&mut self) {
        if self.depth == 0 {
            return;
        }
        if self.component_depth == Some(self.depth) {
            self.component_depth = None;
            tracing::debug!(depth = self.depth, "left component block");
        }
        self.depth -= 1;
    }

    /// Whether a component block is open.
    #[must_use]
    pub const fn inside_component(&self) -> bool {
        self.component_depth.is_some()
    }

    /// Number of open container elements.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_containers_keep_block_open() {
        let mut tracker = ContainmentTracker::default();
        tracker.open(true); // <div class="component">
        tracker.open(false); //   <div class="component-name">
        tracker.close(); //   </div>
        assert!(tracker.inside_component());
        tracker.close(); // </div>
        assert!(!tracker.inside_component());
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn inner_component_marker_does_not_reopen() {
        let mut tracker = ContainmentTracker::default();
        tracker.open(true);
        tracker.open(true);
        tracker.close();
        assert!(tracker.inside_component());
        tracker.close();
        assert!(!tracker.inside_component());
    }

    #[test]
    fn stray_end_tags_are_ignored() {
        let mut tracker = ContainmentTracker::default();
        tracker.close();
        assert_eq!(tracker.depth(), 0);
        tracker.open(true);
        assert!(tracker.inside_component());
    }
}
