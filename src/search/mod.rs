//! Branch-and-bound search.
//!
//! - [`TspSolver`] — entry point: heuristic warm start, then parallel search
//! - [`SearchNode`] / [`NodeState`] — node lifecycle, fixings and inherited cuts
//! - [`Frontier`] — best-bound, FIFO-tie open list shared by the workers
//! - [`Incumbent`] — best tour with lock-free length reads
//! - [`CancelToken`] — cooperative cancellation

mod branching;
mod control;
mod driver;
mod frontier;
mod incumbent;
mod node;
mod solver;
mod stats;

pub use branching::select_branch_edge;
pub use control::{CancelToken, StopReason};
pub use frontier::Frontier;
pub use incumbent::Incumbent;
pub use node::{CutChain, EdgeFixing, Fixing, NodeState, SearchNode};
pub use solver::{SolveResult, SolveStatus, TspSolver};
pub use stats::SearchStats;
