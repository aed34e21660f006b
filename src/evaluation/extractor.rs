//! Reconstruction of an ordered cycle from an integral edge selection.
//!
//! Walks from city 0 along selected edges. The walk is only trusted after
//! checking that every city has exactly two selected edges and that the walk
//! covers all cities before returning to 0; a disconnected or branched edge
//! set is reported as [`TspError::MalformedTour`] instead of being silently
//! truncated.

use crate::error::{TspError, TspResult};
use crate::models::EdgeIndex;

/// Value at or above which an edge variable counts as selected.
const SELECTED: f64 = 0.5;

/// Extracts the open cycle `[0, c1, ..., c_{n-1}]` from edge values.
///
/// # Examples
///
/// ```
/// use tsp_exact::evaluation::extract_cycle;
/// use tsp_exact::models::EdgeIndex;
///
/// let edges = EdgeIndex::new(4);
/// let mut values = vec![0.0; edges.len()];
/// for (a, b) in [(0, 2), (2, 1), (1, 3), (3, 0)] {
///     values[edges.index(a, b)] = 1.0;
/// }
/// let cycle = extract_cycle(&values, &edges).unwrap();
/// assert_eq!(cycle, vec![0, 2, 1, 3]);
/// ```
pub fn extract_cycle(values: &[f64], edges: &EdgeIndex) -> TspResult<Vec<usize>> {
    let n = edges.num_cities();
    if values.len() != edges.len() {
        return Err(TspError::malformed(format!(
            "expected {} edge values, got {}",
            edges.len(),
            values.len()
        )));
    }

    let mut neighbors: Vec<Vec<usize>> = vec![Vec::with_capacity(2); n];
    for (e, (i, j)) in edges.iter() {
        if values[e] >= SELECTED {
            neighbors[i].push(j);
            neighbors[j].push(i);
        }
    }
    if let Some((city, adj)) = neighbors.iter().enumerate().find(|(_, adj)| adj.len() != 2) {
        return Err(TspError::malformed(format!(
            "city {city} has {} selected edges",
            adj.len()
        )));
    }

    // Break the direction tie deterministically: leave 0 towards its smaller neighbor.
    let first = neighbors[0][0].min(neighbors[0][1]);
    let mut cycle = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    let mut current = 0;
    cycle.push(0);
    visited[0] = true;
    let mut next = first;

    for _ in 1..n {
        if visited[next] {
            return Err(TspError::malformed(format!(
                "subtour closes at city {next} after {} of {n} cities",
                cycle.len()
            )));
        }
        visited[next] = true;
        cycle.push(next);
        let prev = std::mem::replace(&mut current, next);
        let adj = &neighbors[current];
        next = if adj[0] == prev { adj[1] } else { adj[0] };
    }

    if next != 0 {
        return Err(TspError::malformed(format!(
            "walk ended at city {current} without returning to city 0"
        )));
    }
    Ok(cycle)
}
