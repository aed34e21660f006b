//! Subtour-elimination cut separation.
//!
//! # Algorithm
//!
//! 1. Build the support graph of the relaxed solution: edges with value
//!    `>= 0.5` for integral solutions, `> tolerance` otherwise.
//! 2. If the support graph is disconnected, every component `S` is a
//!    violated subtour (`x(δ(S)) ≈ 0 < 2`). All components are emitted,
//!    smallest first.
//! 3. If the support graph is connected and the solution is fractional,
//!    run Stoer–Wagner with edge values as capacities. Every phase cut of
//!    weight `< 2` is a violated subtour constraint; emitted most violated
//!    first.
//!
//! An integral, connected solution yields no cut: under the degree
//! constraints it is a Hamiltonian cycle.

use std::collections::BTreeSet;

use super::min_cut::stoer_wagner;
use super::{SubtourCut, UnionFind, SUBTOUR_RHS};
use crate::models::EdgeIndex;

/// Edge value at or above which an integral solution selects an edge.
const INTEGRAL_SUPPORT: f64 = 0.5;

/// How a separation round found its cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparationMethod {
    /// No violated cut exists.
    None,
    /// Connected components of the support graph.
    Components,
    /// Stoer–Wagner minimum cut on the fractional solution.
    MinCut,
}

/// Result of one separation round.
#[derive(Debug, Clone)]
pub struct Separation {
    /// Violated cuts, strongest first.
    pub cuts: Vec<SubtourCut>,

    /// Number of connected components in the support graph.
    pub components: usize,

    /// Global minimum cut weight, if the min-cut stage ran.
    pub min_cut: Option<f64>,

    /// Which stage produced the cuts.
    pub method: SeparationMethod,
}

impl Separation {
    /// Returns `true` if no violated cut was found.
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

/// Detects violated subtour-elimination constraints in relaxed solutions.
///
/// # Examples
///
/// ```
/// use tsp_exact::cuts::CutSeparator;
/// use tsp_exact::models::EdgeIndex;
///
/// let edges = EdgeIndex::new(6);
/// let mut values = vec![0.0; edges.len()];
/// for (a, b) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
///     values[edges.index(a, b)] = 1.0;
/// }
/// let sep = CutSeparator::new(1e-6, 10).separate(&values, &edges);
/// assert_eq!(sep.components, 2);
/// assert_eq!(sep.cuts[0].members(), &[3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct CutSeparator {
    tolerance: f64,
    max_cuts: usize,
}

impl CutSeparator {
    /// Creates a separator.
    ///
    /// * `tolerance` — values `<= tolerance` are treated as zero, and a cut
    ///   must be violated by more than `tolerance` to be reported
    /// * `max_cuts` — cap on cuts returned per round (at least 1)
    pub fn new(tolerance: f64, max_cuts: usize) -> Self {
        Self {
            tolerance,
            max_cuts: max_cuts.max(1),
        }
    }

    /// Separates violated subtour cuts from edge values indexed by `edges`.
    pub fn separate(&self, values: &[f64], edges: &EdgeIndex) -> Separation {
        let n = edges.num_cities();
        let integral = values
            .iter()
            .all(|&v| v <= self.tolerance || v >= 1.0 - self.tolerance);
        let in_support = |v: f64| {
            if integral {
                v >= INTEGRAL_SUPPORT
            } else {
                v > self.tolerance
            }
        };

        let mut uf = UnionFind::new(n);
        for (e, (i, j)) in edges.iter() {
            if in_support(values[e]) {
                uf.union(i, j);
            }
        }
        let components = uf.num_components();

        if components > 1 {
            let mut seen = BTreeSet::new();
            let mut cuts: Vec<SubtourCut> = uf
                .groups()
                .iter()
                .filter_map(|g| SubtourCut::new(g, n))
                .filter(|c| seen.insert(c.clone()))
                .filter(|c| c.violation(values, edges) > self.tolerance)
                .collect();
            cuts.sort_by_key(|c| c.len());
            cuts.truncate(self.max_cuts);
            let method = if cuts.is_empty() {
                SeparationMethod::None
            } else {
                SeparationMethod::Components
            };
            return Separation {
                cuts,
                components,
                min_cut: None,
                method,
            };
        }

        if integral {
            return Separation {
                cuts: Vec::new(),
                components,
                min_cut: None,
                method: SeparationMethod::None,
            };
        }

        self.separate_min_cut(values, edges)
    }

    fn separate_min_cut(&self, values: &[f64], edges: &EdgeIndex) -> Separation {
        let n = edges.num_cities();
        let mut weights = vec![0.0; n * n];
        for (e, (i, j)) in edges.iter() {
            weights[i * n + j] = values[e];
            weights[j * n + i] = values[e];
        }

        let threshold = SUBTOUR_RHS - self.tolerance;
        let Some((min, phase_cuts)) = stoer_wagner(n, &mut weights, threshold) else {
            return Separation {
                cuts: Vec::new(),
                components: 1,
                min_cut: None,
                method: SeparationMethod::None,
            };
        };

        let mut seen = BTreeSet::new();
        let mut scored: Vec<(f64, SubtourCut)> = phase_cuts
            .iter()
            .filter_map(|pc| SubtourCut::new(&pc.members, n))
            .filter(|c| seen.insert(c.clone()))
            .map(|c| (c.violation(values, edges), c))
            .filter(|(v, _)| *v > self.tolerance)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.len().cmp(&b.1.len())));
        scored.truncate(self.max_cuts);

        let cuts: Vec<SubtourCut> = scored.into_iter().map(|(_, c)| c).collect();
        let method = if cuts.is_empty() {
            SeparationMethod::None
        } else {
            SeparationMethod::MinCut
        };
        Separation {
            cuts,
            components: 1,
            min_cut: Some(min.weight),
            method,
        }
    }
}
