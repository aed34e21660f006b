//! Best known tour shared by all workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::models::Tour;

/// The best feasible tour found so far.
///
/// The tour sits behind a mutex; its length is mirrored in an atomic so
/// pruning checks never take the lock. A stale read can only delay pruning.
pub struct Incumbent {
    tour: Mutex<Option<Tour>>,
    length_bits: AtomicU64,
}

impl Default for Incumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl Incumbent {
    /// An empty incumbent (length `+inf`).
    pub fn new() -> Self {
        Self {
            tour: Mutex::new(None),
            length_bits: AtomicU64::new(f64::INFINITY.to_bits()),
        }
    }

    /// Current best length, `+inf` if none.
    pub fn length(&self) -> f64 {
        f64::from_bits(self.length_bits.load(Ordering::Acquire))
    }

    /// Replaces the incumbent if `tour` is strictly shorter. Returns `true` on replacement.
    pub fn offer(&self, tour: Tour) -> bool {
        let mut best = self.tour.lock().unwrap_or_else(PoisonError::into_inner);
        let current = best.as_ref().map_or(f64::INFINITY, Tour::length);
        if tour.length() < current {
            self.length_bits
                .store(tour.length().to_bits(), Ordering::Release);
            *best = Some(tour);
            true
        } else {
            false
        }
    }

    /// A copy of the current best tour.
    pub fn snapshot(&self) -> Option<Tour> {
        self.tour
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
