//! Tour evaluation and extraction.
//!
//! - [`tour_length`] / [`validate_order`] — length and structure of a closed order
//! - [`extract_cycle`] — validated cycle reconstruction from integral edge values

mod evaluator;
mod extractor;

pub use evaluator::{tour_length, validate_order};
pub use extractor::extract_cycle;
