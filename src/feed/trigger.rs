/// Where the viewport sits relative to the content, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportMetrics {
    /// Index of the first row on screen.
    pub first_visible: usize,
    /// Number of rows the viewport can show.
    pub visible_rows: usize,
    /// Rows of content currently loaded.
    pub total_rows: usize,
}

/// Fires when the bottom of the viewport comes within `threshold_rows` of
/// the end of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTrigger {
    threshold_rows: usize,
}

impl ScrollTrigger {
    pub fn new(threshold_rows: usize) -> Self {
        Self { threshold_rows }
    }

    pub fn threshold_rows(&self) -> usize {
        self.threshold_rows
    }

    /// An empty or zero-height viewport never fires; retrying an empty
    /// feed is an explicit user action.
    pub fn is_near_bottom(&self, metrics: ViewportMetrics) -> bool {
        if metrics.total_rows == 0 || metrics.visible_rows == 0 {
            return false;
        }
        let bottom = metrics.first_visible.saturating_add(metrics.visible_rows);
        bottom.saturating_add(self.threshold_rows) >= metrics.total_rows
    }
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(first_visible: usize, visible_rows: usize, total_rows: usize) -> ViewportMetrics {
        ViewportMetrics { first_visible, visible_rows, total_rows }
    }

    #[test]
    fn fires_within_threshold() {
        let trigger = ScrollTrigger::new(5);
        assert!(!trigger.is_near_bottom(at(0, 10, 40)));
        assert!(!trigger.is_near_bottom(at(24, 10, 40)));
        assert!(trigger.is_near_bottom(at(25, 10, 40)));
        assert!(trigger.is_near_bottom(at(30, 10, 40)));
    }

    #[test]
    fn short_content_fires_immediately() {
        let trigger = ScrollTrigger::new(0);
        assert!(trigger.is_near_bottom(at(0, 20, 12)));
    }

    #[test]
    fn empty_content_never_fires() {
        let trigger = ScrollTrigger::default();
        assert!(!trigger.is_near_bottom(at(0, 20, 0)));
        assert!(!trigger.is_near_bottom(at(0, 0, 10)));
    }
}
