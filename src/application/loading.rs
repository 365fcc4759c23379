use crate::observable::Observable;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An `is_loading` observable backed by a count of requests in flight.
///
/// The flag goes true when any request starts and false only when the last
/// one finishes, so overlapping requests cannot clear it early.
pub(crate) struct LoadingFlag {
    flag: Observable<bool>,
    in_flight: AtomicUsize,
}

impl LoadingFlag {
    pub(crate) fn new() -> Self {
        Self {
            flag: Observable::new(false),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn observable(&self) -> &Observable<bool> {
        &self.flag
    }

    pub(crate) fn begin(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        self.flag.set(true);
    }

    /// Publishes `false` if this was the last request in flight.
    pub(crate) fn finish(&self) {
        if self.release() == 0 {
            self.flag.set(false);
        }
    }

    /// Counts the request as finished but leaves the flag alone.
    pub(crate) fn finish_quietly(&self) {
        self.release();
    }

    fn release(&self) -> usize {
        let previous = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_sub(1)))
            .unwrap_or_default();
        previous.saturating_sub(1)
    }
}
