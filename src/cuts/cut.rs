//! Subtour-elimination constraint.

use crate::models::EdgeIndex;
use crate::relaxation::{Relation, Row};

/// Right-hand side of every subtour-elimination constraint.
pub const SUBTOUR_RHS: f64 = 2.0;

/// A subtour-elimination cut: the edges crossing the boundary of `S` must sum to at least 2.
///
/// Stored normalized to the side that does not contain city 0, sorted
/// ascending, so equal cuts compare equal regardless of which side was found.
///
/// # Examples
///
/// ```
/// use tsp_exact::cuts::SubtourCut;
/// use tsp_exact::models::EdgeIndex;
///
/// // {0, 1, 2} and {3, 4, 5} describe the same cut on six cities.
/// let a = SubtourCut::new(&[2, 0, 1], 6).unwrap();
/// let b = SubtourCut::new(&[3, 4, 5], 6).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.members(), &[3, 4, 5]);
/// assert_eq!(a.crossing_edges(&EdgeIndex::new(6)).len(), 9);
///
/// // Singletons are implied by the degree constraints.
/// assert!(SubtourCut::new(&[4], 6).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubtourCut {
    members: Vec<usize>,
}

impl SubtourCut {
    /// Builds the cut for subset `subset` of `n` cities.
    ///
    /// Returns `None` unless `2 <= |S| <= n - 2` after deduplication, or if
    /// any member is out of range.
    pub fn new(subset: &[usize], n: usize) -> Option<Self> {
        let mut inside = vec![false; n];
        for &c in subset {
            if c >= n {
                return None;
            }
            inside[c] = true;
        }
        let flip = inside[0];
        let members: Vec<usize> = (0..n).filter(|&c| inside[c] != flip).collect();
        if members.len() < 2 || members.len() + 2 > n {
            return None;
        }
        Some(Self { members })
    }

    /// Cities on the side not containing city 0.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of cities on the stored side.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; a cut has at least two members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Indices of edges with exactly one endpoint in the stored side.
    pub fn crossing_edges(&self, edges: &EdgeIndex) -> Vec<usize> {
        let n = edges.num_cities();
        let mut inside = vec![false; n];
        for &c in &self.members {
            inside[c] = true;
        }
        let mut out = Vec::with_capacity(self.members.len() * (n - self.members.len()));
        for &a in &self.members {
            for b in (0..n).filter(|&b| !inside[b]) {
                out.push(edges.index(a, b));
            }
        }
        out.sort_unstable();
        out
    }

    /// Sum of edge values crossing the cut.
    pub fn crossing_value(&self, values: &[f64], edges: &EdgeIndex) -> f64 {
        self.crossing_edges(edges).iter().map(|&e| values[e]).sum()
    }

    /// Violation `2 - crossing` (positive means violated).
    pub fn violation(&self, values: &[f64], edges: &EdgeIndex) -> f64 {
        SUBTOUR_RHS - self.crossing_value(values, edges)
    }

    /// LP row `sum(crossing edges) >= 2`.
    pub fn to_row(&self, edges: &EdgeIndex) -> Row {
        let terms = self
            .crossing_edges(edges)
            .into_iter()
            .map(|e| (e, 1.0))
            .collect();
        Row::new(terms, Relation::Ge, SUBTOUR_RHS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let cut = SubtourCut::new(&[0, 1], 5).expect("valid");
        assert_eq!(cut.members(), &[2, 3, 4]);
        let same = SubtourCut::new(&[4, 3, 2, 2], 5).expect("valid");
        assert_eq!(cut, same);
    }

    #[test]
    fn test_size_limits() {
        assert!(SubtourCut::new(&[1, 2], 3).is_none());
        assert!(SubtourCut::new(&[1, 2], 4).is_some());
        assert!(SubtourCut::new(&[1, 2, 3], 4).is_none());
        assert!(SubtourCut::new(&[1, 9], 4).is_none());
        assert!(SubtourCut::new(&[], 4).is_none());
    }

    #[test]
    fn test_row_and_violation() {
        let edges = EdgeIndex::new(6);
        let cut = SubtourCut::new(&[3, 4, 5], 6).expect("valid");
        let row = cut.to_row(&edges);
        assert_eq!(row.terms.len(), 9);
        assert_eq!(row.relation, Relation::Ge);
        assert_eq!(row.rhs, 2.0);

        let mut values = vec![0.0; edges.len()];
        for &(a, b) in &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
            values[edges.index(a, b)] = 1.0;
        }
        assert_eq!(cut.crossing_value(&values, &edges), 0.0);
        assert_eq!(cut.violation(&values, &edges), 2.0);
    }
}
