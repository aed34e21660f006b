//! Shared best-bound frontier.
//!
//! A binary heap of open nodes ordered by lowest bound, ties broken by
//! insertion order, guarded by a mutex and a condition variable. An
//! in-flight counter tracks nodes handed to workers: the search is complete
//! once the heap is empty and no worker still holds a node.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::node::SearchNode;

struct Entry {
    seq: u64,
    node: SearchNode,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // BinaryHeap is a max-heap: the greatest entry has the lowest bound, then the lowest seq.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .bound
            .total_cmp(&self.node.bound)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct State {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
    in_flight: usize,
    closed: bool,
}

/// Open nodes shared by all workers.
pub struct Frontier {
    state: Mutex<State>,
    ready: Condvar,
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds an open node.
    pub fn push(&self, node: SearchNode) {
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.heap.push(Entry { seq, node });
        drop(state);
        self.ready.notify_one();
    }

    /// Takes the best open node, blocking while other workers may still add some.
    ///
    /// Returns `None` once the search is complete, the frontier is closed, or
    /// `should_stop` returns `true`. Waits are bounded by `poll`, after which
    /// `should_stop` is re-checked.
    pub fn pop(&self, poll: Duration, should_stop: impl Fn() -> bool) -> Option<SearchNode> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(entry) = state.heap.pop() {
                state.in_flight += 1;
                return Some(entry.node);
            }
            if state.in_flight == 0 {
                state.closed = true;
                drop(state);
                self.ready.notify_all();
                return None;
            }
            if should_stop() {
                return None;
            }
            state = self
                .ready
                .wait_timeout(state, poll)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Marks a popped node as fully processed (children already pushed).
    pub fn done(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        let finished = state.in_flight == 0 && state.heap.is_empty();
        drop(state);
        if finished {
            self.ready.notify_all();
        }
    }

    /// Stops handing out nodes and wakes every waiting worker.
    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Drops open nodes whose bound is at or above `cutoff`. Returns how many.
    pub fn prune(&self, cutoff: f64) -> usize {
        let mut state = self.lock();
        let before = state.heap.len();
        state.heap.retain(|e| e.node.bound < cutoff);
        before - state.heap.len()
    }

    /// Lowest bound among open nodes.
    pub fn best_bound(&self) -> Option<f64> {
        self.lock().heap.peek().map(|e| e.node.bound)
    }

    /// Number of open nodes.
    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().heap.is_empty()
    }

    /// Returns `true` if no open node remains and no worker holds one.
    pub fn is_exhausted(&self) -> bool {
        let state = self.lock();
        state.heap.is_empty() && state.in_flight == 0
    }
}
