//! Local search operators for improving tours.
//!
//! - [`two_opt_improve`] — 2-opt segment reversal with a pass budget

mod two_opt;

pub use two_opt::{route_distance, two_opt_improve};
