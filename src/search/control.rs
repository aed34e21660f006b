//! Search budgets and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::warn;

/// Cloneable handle that asks a running solve to stop.
///
/// # Examples
///
/// ```
/// use tsp_exact::search::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Workers stop dequeuing; in-flight work is discarded.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Why the search stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NodeLimit,
    TimeLimit,
    Cancelled,
}

/// Budget shared by all workers. The first limit hit wins.
pub struct Budget {
    start: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    cancel: CancelToken,
    stopped: AtomicBool,
    reason: Mutex<Option<StopReason>>,
}

impl Budget {
    pub fn new(time_limit_ms: Option<u64>, node_limit: Option<u64>, cancel: CancelToken) -> Self {
        Self {
            start: Instant::now(),
            time_limit: time_limit_ms.map(Duration::from_millis),
            node_limit,
            cancel,
            stopped: AtomicBool::new(false),
            reason: Mutex::new(None),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Records `reason` unless another one was recorded first.
    pub fn trip(&self, reason: StopReason) {
        let mut slot = self.reason.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            warn!(
                "search: stopping reason={:?} elapsed_ms={}",
                reason,
                self.elapsed().as_millis()
            );
            *slot = Some(reason);
        }
        self.stopped.store(true, Ordering::Release);
    }

    /// Checks cancellation and the wall clock. Returns `true` if the search must stop.
    pub fn should_stop(&self) -> bool {
        if self.stopped.load(Ordering::Acquire) {
            return true;
        }
        if self.cancel.is_cancelled() {
            self.trip(StopReason::Cancelled);
            return true;
        }
        if self.time_limit.is_some_and(|limit| self.elapsed() >= limit) {
            self.trip(StopReason::TimeLimit);
            return true;
        }
        false
    }

    /// Like [`should_stop`](Self::should_stop), also tripping the node limit
    /// once `processed` nodes have been handled.
    pub fn exhausted(&self, processed: u64) -> bool {
        if self.should_stop() {
            return true;
        }
        if self.node_limit.is_some_and(|limit| processed >= limit) {
            self.trip(StopReason::NodeLimit);
            return true;
        }
        false
    }

    /// The recorded stop reason, if any.
    pub fn reason(&self) -> Option<StopReason> {
        *self.reason.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_budget() {
        let b = Budget::new(None, None, CancelToken::new());
        assert!(!b.should_stop());
        assert!(!b.exhausted(1_000_000));
        assert_eq!(b.reason(), None);
    }

    #[test]
    fn test_node_limit() {
        let b = Budget::new(None, Some(3), CancelToken::new());
        assert!(!b.exhausted(2));
        assert!(b.exhausted(3));
        assert_eq!(b.reason(), Some(StopReason::NodeLimit));
        assert!(b.should_stop());
    }

    #[test]
    fn test_time_limit() {
        let b = Budget::new(Some(0), None, CancelToken::new());
        assert!(b.should_stop());
        assert_eq!(b.reason(), Some(StopReason::TimeLimit));
    }

    #[test]
    fn test_first_reason_wins() {
        let token = CancelToken::new();
        let b = Budget::new(None, Some(1), token.clone());
        assert!(b.exhausted(1));
        token.cancel();
        assert!(b.should_stop());
        assert_eq!(b.reason(), Some(StopReason::NodeLimit));
    }
}
