//! Coalescing of rapid edits into a single write.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Trailing-edge debouncer driven by caller-supplied instants.
///
/// Every [`touch`](Debouncer::touch) pushes the deadline back; a write is due
/// once `delay` has passed without another touch.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    fire_at: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fire_at: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an edit at `now`, resetting the timer.
    pub fn touch(&mut self, now: Instant) {
        self.fire_at = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.fire_at.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.fire_at.is_some_and(|at| now >= at)
    }

    /// Disarm and report whether a write was due.
    pub fn take_if_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.fire_at = None;
            true
        } else {
            false
        }
    }

    /// Disarm and report whether anything was pending, due or not.
    pub fn take_pending(&mut self) -> bool {
        self.fire_at.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.fire_at = None;
    }
}
