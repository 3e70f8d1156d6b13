//! Trailing-edge debounce for layout requests.
//!
//! Rapid palette or content changes each ask for a layout pass; only the last
//! request survives, and it fires once its delay has passed. Time is passed in
//! by the caller so the host's run loop drives it.

use std::time::Duration;

use web_time::Instant;

/// Delay between the last request and the layout pass.
pub const LAYOUT_DEBOUNCE: Duration = Duration::from_millis(100);

/// At most one pending layout request; a new request replaces it.
#[derive(Debug, Clone)]
pub struct LayoutDebouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for LayoutDebouncer {
    fn default() -> Self {
        Self::new(LAYOUT_DEBOUNCE)
    }
}

impl LayoutDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending request and schedule a new one at `now + delay`.
    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once per request, when its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = LayoutDebouncer::default();
        assert!(!debouncer.poll(start));

        debouncer.request(start);
        assert!(!debouncer.poll(start + Duration::from_millis(99)));
        assert!(debouncer.poll(start + Duration::from_millis(100)));
        assert!(!debouncer.poll(start + Duration::from_millis(500)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_new_request_replaces_pending() {
        let start = Instant::now();
        let mut debouncer = LayoutDebouncer::default();
        debouncer.request(start);
        debouncer.request(start + Duration::from_millis(80));

        assert!(!debouncer.poll(start + Duration::from_millis(120)));
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(180)));
        assert!(debouncer.poll(start + Duration::from_millis(180)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = LayoutDebouncer::new(Duration::from_millis(10));
        debouncer.request(start);
        debouncer.cancel();
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }
}
