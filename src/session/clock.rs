use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current instant, injectable so countdown behavior is
/// testable without sleeping.
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// Production time source.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced time source for unit tests. Handles are cheap clones
/// sharing the same underlying instant.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Owns the elapsed-time origin of a typing test and, for timed tests, the
/// countdown budget. The origin is fixed once, on the first keystroke.
#[derive(Clone, Debug)]
pub struct TestClock<S: TimeSource = WallClock> {
    source: S,
    started_at: Option<Instant>,
    budget: Option<Duration>,
    expiry_signalled: bool,
}

impl TestClock<WallClock> {
    pub fn new(budget: Option<Duration>) -> Self {
        Self::with_source(WallClock, budget)
    }
}

impl<S: TimeSource> TestClock<S> {
    pub fn with_source(source: S, budget: Option<Duration>) -> Self {
        Self {
            source,
            started_at: None,
            budget,
            expiry_signalled: false,
        }
    }

    /// Fix the elapsed-time origin. Later calls are no-ops; the origin never
    /// moves once set.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.source.now());
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn budget_secs(&self) -> Option<u64> {
        self.budget.map(|b| b.as_secs())
    }

    /// Wall-clock delta from the first keystroke. `None` before the test
    /// has started.
    pub fn elapsed_secs(&self) -> Option<f64> {
        let started = self.started_at?;
        Some(self.source.now().duration_since(started).as_secs_f64())
    }

    /// Seconds left in the budget, floored to whole seconds for display.
    /// `None` for untimed tests; the full budget before the first keystroke.
    pub fn remaining_secs(&self) -> Option<u64> {
        let budget = self.budget?;
        let elapsed = match self.elapsed_secs() {
            Some(secs) => secs,
            None => return Some(budget.as_secs()),
        };
        let remaining = (budget.as_secs_f64() - elapsed).max(0.0);
        Some(remaining as u64)
    }

    /// Check whether the budget has run out. Returns `true` exactly once;
    /// the latch guarantees at most one forced-completion signal per session
    /// no matter how many ticks arrive afterwards.
    pub fn poll_expired(&mut self) -> bool {
        if self.expiry_signalled {
            return false;
        }
        let Some(budget) = self.budget else {
            return false;
        };
        let Some(started) = self.started_at else {
            return false;
        };
        if self.source.now().duration_since(started) >= budget {
            self.expiry_signalled = true;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_none_before_start() {
        let clock = TestClock::new(None);
        assert!(clock.elapsed_secs().is_none());
        assert!(!clock.has_started());
    }

    #[test]
    fn test_start_fixes_origin_once() {
        let source = ManualClock::new();
        let mut clock = TestClock::with_source(source.clone(), None);
        clock.start();
        source.advance(Duration::from_secs(5));
        // A second start must not move the origin
        clock.start();
        assert_eq!(clock.elapsed_secs(), Some(5.0));
    }

    #[test]
    fn test_remaining_full_budget_before_start() {
        let clock = TestClock::new(Some(Duration::from_secs(60)));
        assert_eq!(clock.remaining_secs(), Some(60));
    }

    #[test]
    fn test_remaining_counts_down_and_floors_at_zero() {
        let source = ManualClock::new();
        let mut clock = TestClock::with_source(source.clone(), Some(Duration::from_secs(60)));
        clock.start();
        source.advance(Duration::from_millis(10_500));
        assert_eq!(clock.remaining_secs(), Some(49));
        source.advance(Duration::from_secs(120));
        assert_eq!(clock.remaining_secs(), Some(0));
    }

    #[test]
    fn test_remaining_none_when_untimed() {
        let mut clock = TestClock::new(None);
        clock.start();
        assert_eq!(clock.remaining_secs(), None);
    }

    #[test]
    fn test_poll_expired_fires_exactly_once() {
        let source = ManualClock::new();
        let mut clock = TestClock::with_source(source.clone(), Some(Duration::from_secs(60)));
        clock.start();
        source.advance(Duration::from_secs(59));
        assert!(!clock.poll_expired());
        source.advance(Duration::from_secs(1));
        assert!(clock.poll_expired());
        // Stale ticks after expiry must not re-signal
        assert!(!clock.poll_expired());
        source.advance(Duration::from_secs(600));
        assert!(!clock.poll_expired());
    }

    #[test]
    fn test_poll_expired_never_fires_before_start() {
        let source = ManualClock::new();
        let mut clock = TestClock::with_source(source.clone(), Some(Duration::from_secs(1)));
        source.advance(Duration::from_secs(10));
        assert!(!clock.poll_expired());
    }

    #[test]
    fn test_poll_expired_never_fires_untimed() {
        let source = ManualClock::new();
        let mut clock = TestClock::with_source(source.clone(), None);
        clock.start();
        source.advance(Duration::from_secs(3600));
        assert!(!clock.poll_expired());
    }
}
