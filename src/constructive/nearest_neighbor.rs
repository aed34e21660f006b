//! Nearest-neighbor tour construction.
//!
//! Builds a tour greedily: starting from city 0, always visit the nearest
//! unvisited city, then return to 0.
//!
//! # Complexity
//!
//! O(n²) where n = number of cities.
//!
//! # Reference
//!
//! This is the simplest constructive heuristic for the TSP. While tour
//! quality is typically 15-25% above optimal, it provides a fast initial
//! upper bound.

use crate::distance::DistanceMatrix;

/// Constructs an open cycle `[start, c1, ..., c_{n-1}]` with the nearest-neighbor heuristic.
///
/// Ties are broken towards the lower city index.
///
/// # Examples
///
/// ```
/// use tsp_exact::distance::DistanceMatrix;
/// use tsp_exact::constructive::nearest_neighbor;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]).unwrap();
/// assert_eq!(nearest_neighbor(&dm, 0), vec![0, 1, 2, 3]);
/// ```
pub fn nearest_neighbor(distances: &DistanceMatrix, start: usize) -> Vec<usize> {
    let n = distances.size();
    if n == 0 {
        return Vec::new();
    }

    let mut unvisited: Vec<usize> = (0..n).filter(|&c| c != start).collect();
    let mut cycle = Vec::with_capacity(n);
    cycle.push(start);
    let mut current = start;

    while let Some(next) = distances.nearest_neighbor(current, &unvisited) {
        unvisited.retain(|&c| c != next);
        cycle.push(next);
        current = next;
    }

    cycle
}
