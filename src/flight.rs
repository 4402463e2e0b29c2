//! Single-flight guards for user-triggered actions.
//!
//! Each guarded action (login, roster fetch, capture) owns one `SingleFlight`.
//! A new invocation is rejected while a previous one is still outstanding; the
//! flag is released when the returned guard is dropped, including on early
//! returns and errors.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Clone, Debug, Default)]
pub struct SingleFlight {
    busy: Arc<AtomicBool>,
}

impl SingleFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the action as in flight, or returns `None` if it already is.
    #[must_use]
    pub fn try_begin(&self) -> Option<FlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the in-flight flag on drop.
#[derive(Debug)]
pub struct FlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_rejected_while_guard_lives() {
        let flight = SingleFlight::new();
        let guard = flight.try_begin();
        assert!(guard.is_some());
        assert!(flight.is_busy());
        assert!(flight.try_begin().is_none());

        drop(guard);
        assert!(!flight.is_busy());
        assert!(flight.try_begin().is_some());
    }

    #[test]
    fn clones_share_the_same_flag() {
        let flight = SingleFlight::new();
        let other = flight.clone();
        let _guard = flight.try_begin();
        assert!(other.is_busy());
        assert!(other.try_begin().is_none());
    }
}
