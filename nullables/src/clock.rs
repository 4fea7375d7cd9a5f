//! Nullable clock — deterministic time for testing.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tipy_types::{Clock, ClockError, UnixTimestamp};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. [`NullClock::make_unavailable`]
/// makes every read fail until [`NullClock::restore`] is called.
pub struct NullClock {
    current: AtomicI64,
    unavailable: AtomicBool,
}

impl NullClock {
    pub fn new(initial_secs: i64) -> Self {
        Self {
            current: AtomicI64::new(initial_secs),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: i64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: i64) {
        self.current.store(secs, Ordering::SeqCst);
    }

    pub fn make_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn restore(&self) {
        self.unavailable.store(false, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Result<UnixTimestamp, ClockError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClockError("null clock marked unavailable".into()));
        }
        Ok(UnixTimestamp::new(self.current.load(Ordering::SeqCst)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(1_700_000_000);
        assert_eq!(clock.now().unwrap().as_secs(), 1_700_000_000);
        clock.advance(30);
        assert_eq!(clock.now().unwrap().as_secs(), 1_700_000_030);
        clock.set(5);
        assert_eq!(clock.now().unwrap().as_secs(), 5);
    }

    #[test]
    fn unavailable_clock_errors_until_restored() {
        let clock = NullClock::new(10);
        clock.make_unavailable();
        assert!(clock.now().is_err());
        clock.restore();
        assert_eq!(clock.now().unwrap().as_secs(), 10);
    }
}
