use std::time::{Duration, Instant};

/// Trailing-edge debouncer with explicit state.
///
/// Each `push` restarts the quiet window and replaces the pending value, so a
/// burst yields one value once the source has been quiet for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            deadline: None,
        }
    }

    #[must_use]
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn push(&mut self, value: T, at: Instant) {
        let deadline = at + self.quiet;
        // Out-of-order timestamps never shorten an already scheduled window.
        self.deadline = Some(self.deadline.map_or(deadline, |current| current.max(deadline)));
        self.pending = Some(value);
    }

    /// Takes the pending value once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_settles_once_on_latest_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.push(1, start);
        debouncer.push(2, start + Duration::from_millis(40));
        debouncer.push(3, start + Duration::from_millis(80));

        assert_eq!(debouncer.poll(start + Duration::from_millis(150)), None);
        assert_eq!(
            debouncer.next_deadline(),
            Some(start + Duration::from_millis(180))
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(180)), Some(3));
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn zero_quiet_window_fires_immediately() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.push("a", now);
        assert_eq!(debouncer.poll(now), Some("a"));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.push(7, now);
        debouncer.cancel();
        assert_eq!(debouncer.poll(now + Duration::from_secs(1)), None);
        assert_eq!(debouncer.next_deadline(), None);
    }
}
