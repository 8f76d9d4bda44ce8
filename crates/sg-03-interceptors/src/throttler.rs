//! # Throttlers
//!
//! Bounded concurrency for message processing.
//!
//! ## Usage
//!
//! Slots are taken through [`ThrottleGuard::acquire`]; the slot is released
//! when the guard drops, on every exit path.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Concurrency gate.
pub trait InterceptorThrottler: Send + Sync {
    fn can_process(&self) -> bool;

    fn start_processing(&self);

    fn end_processing(&self);

    /// Take a slot if one is free. Implementations should make the check
    /// and the take atomic.
    fn try_start_processing(&self) -> bool {
        if self.can_process() {
            self.start_processing();
            true
        } else {
            false
        }
    }
}

/// Counts in-flight messages against a fixed capacity.
pub struct ConcurrencyThrottler {
    capacity: usize,
    in_flight: AtomicUsize,
}

impl ConcurrencyThrottler {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl InterceptorThrottler for ConcurrencyThrottler {
    fn can_process(&self) -> bool {
        self.in_flight.load(Ordering::Relaxed) < self.capacity
    }

    fn start_processing(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    fn end_processing(&self) {
        loop {
            let current = self.in_flight.load(Ordering::Relaxed);
            if current == 0 {
                return;
            }
            if self
                .in_flight
                .compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }
        }
    }

    fn try_start_processing(&self) -> bool {
        loop {
            let current = self.in_flight.load(Ordering::Relaxed);
            if current >= self.capacity {
                return false;
            }
            if self
                .in_flight
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }
}

/// Holds one throttler slot until dropped.
pub struct ThrottleGuard<'a> {
    throttler: &'a dyn InterceptorThrottler,
}

impl<'a> ThrottleGuard<'a> {
    /// `None` when the throttler is full.
    pub fn acquire(throttler: &'a dyn InterceptorThrottler) -> Option<Self> {
        throttler
            .try_start_processing()
            .then_some(Self { throttler })
    }
}

impl Drop for ThrottleGuard<'_> {
    fn drop(&mut self) {
        self.throttler.end_processing();
    }
}
