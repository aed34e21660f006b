//! Dense indexing of undirected edges.

/// Maps unordered city pairs `(i, j)`, `i != j`, to dense edge indices and back.
///
/// Edges are laid out in lower-triangular order: `(0,1), (0,2), (1,2), (0,3), ...`,
/// so edge `(i, j)` with `i < j` lives at `j * (j - 1) / 2 + i`.
///
/// # Examples
///
/// ```
/// use tsp_exact::models::EdgeIndex;
///
/// let edges = EdgeIndex::new(4);
/// assert_eq!(edges.len(), 6);
/// assert_eq!(edges.index(0, 1), 0);
/// assert_eq!(edges.index(2, 1), edges.index(1, 2));
/// assert_eq!(edges.endpoints(edges.index(1, 3)), (1, 3));
/// ```
#[derive(Debug, Clone)]
pub struct EdgeIndex {
    num_cities: usize,
    endpoints: Vec<(usize, usize)>,
}

impl EdgeIndex {
    /// Builds the edge table for a complete graph on `num_cities` nodes.
    pub fn new(num_cities: usize) -> Self {
        let mut endpoints = Vec::with_capacity(num_cities * num_cities.saturating_sub(1) / 2);
        for j in 1..num_cities {
            for i in 0..j {
                endpoints.push((i, j));
            }
        }
        Self {
            num_cities,
            endpoints,
        }
    }

    /// Number of cities in the underlying graph.
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Number of edges, `n * (n - 1) / 2`.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns `true` if the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Dense index of the edge between `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `a == b`.
    pub fn index(&self, a: usize, b: usize) -> usize {
        debug_assert_ne!(a, b, "self-loops have no edge index");
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        j * (j - 1) / 2 + i
    }

    /// Endpoints `(i, j)` with `i < j` of the given edge.
    pub fn endpoints(&self, edge: usize) -> (usize, usize) {
        self.endpoints[edge]
    }

    /// Iterates over `(edge, (i, j))` for all edges.
    pub fn iter(&self) -> impl Iterator<Item = (usize, (usize, usize))> + '_ {
        self.endpoints.iter().copied().enumerate()
    }

    /// Edge indices incident to `city`.
    pub fn incident(&self, city: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_cities)
            .filter(move |&other| other != city)
            .map(move |other| self.index(city, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_pairs() {
        let edges = EdgeIndex::new(7);
        assert_eq!(edges.len(), 21);
        for (e, (i, j)) in edges.iter() {
            assert!(i < j);
            assert_eq!(edges.index(i, j), e);
            assert_eq!(edges.index(j, i), e);
        }
    }

    #[test]
    fn test_incident() {
        let edges = EdgeIndex::new(5);
        let inc: Vec<usize> = edges.incident(2).collect();
        assert_eq!(inc.len(), 4);
        for e in inc {
            let (i, j) = edges.endpoints(e);
            assert!(i == 2 || j == 2);
        }
    }

    #[test]
    fn test_small_graphs() {
        assert!(EdgeIndex::new(0).is_empty());
        assert!(EdgeIndex::new(1).is_empty());
        assert_eq!(EdgeIndex::new(2).len(), 1);
    }
}
