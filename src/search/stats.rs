//! Search counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Summary of one solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchStats {
    pub nodes_explored: u64,
    pub nodes_pruned: u64,
    pub nodes_branched: u64,
    pub integral_nodes: u64,
    pub lp_solves: u64,
    pub cuts_added: u64,
    /// Cuts slack at their node's final relaxation and not passed to its children.
    pub cuts_dropped: u64,
    pub incumbent_updates: u64,
    pub max_depth: u64,
    /// Integral relaxations that failed tour extraction. Nonzero means a
    /// solver bug; those nodes were branched instead of accepted.
    pub malformed_tours: u64,
    /// Relaxation bound at the root after its cut rounds.
    pub root_bound: Option<f64>,
    /// Length of the heuristic warm-start tour.
    pub heuristic_length: Option<f64>,
    pub threads: usize,
    pub elapsed_ms: u64,
}

/// Lock-free counters updated by the workers.
#[derive(Default)]
pub(crate) struct Counters {
    pub nodes_explored: AtomicU64,
    pub nodes_pruned: AtomicU64,
    pub nodes_branched: AtomicU64,
    pub integral_nodes: AtomicU64,
    pub lp_solves: AtomicU64,
    pub cuts_added: AtomicU64,
    pub cuts_dropped: AtomicU64,
    pub incumbent_updates: AtomicU64,
    pub max_depth: AtomicU64,
    pub malformed_tours: AtomicU64,
    root_bound: Mutex<Option<f64>>,
}

impl Counters {
    pub fn bump(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add(counter: &AtomicU64, amount: u64) {
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    pub fn set_root_bound(&self, bound: f64) {
        *self.root_bound.lock().unwrap_or_else(PoisonError::into_inner) = Some(bound);
    }

    pub fn snapshot(&self) -> SearchStats {
        SearchStats {
            nodes_explored: Self::get(&self.nodes_explored),
            nodes_pruned: Self::get(&self.nodes_pruned),
            nodes_branched: Self::get(&self.nodes_branched),
            integral_nodes: Self::get(&self.integral_nodes),
            lp_solves: Self::get(&self.lp_solves),
            cuts_added: Self::get(&self.cuts_added),
            cuts_dropped: Self::get(&self.cuts_dropped),
            incumbent_updates: Self::get(&self.incumbent_updates),
            max_depth: Self::get(&self.max_depth),
            malformed_tours: Self::get(&self.malformed_tours),
            root_bound: *self.root_bound.lock().unwrap_or_else(PoisonError::into_inner),
            ..SearchStats::default()
        }
    }
}
