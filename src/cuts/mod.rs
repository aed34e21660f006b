//! Subtour-elimination cut generation.
//!
//! - [`SubtourCut`] — a normalized `x(δ(S)) >= 2` constraint
//! - [`CutSeparator`] — finds violated cuts via connected components or
//!   Stoer–Wagner minimum cut
//! - [`UnionFind`] — component detection on the support graph

mod cut;
mod min_cut;
mod separator;
mod union_find;

pub use cut::{SubtourCut, SUBTOUR_RHS};
pub use min_cut::{stoer_wagner, PhaseCut};
pub use separator::{CutSeparator, Separation, SeparationMethod};
pub use union_find::UnionFind;
