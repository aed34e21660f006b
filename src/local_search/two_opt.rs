//! 2-opt tour improvement.
//!
//! # Algorithm
//!
//! For each pair of edges (i-1, i) and (j, j+1) of the closed tour, compute
//! the change in length from reversing the segment between them:
//!
//! ```text
//! delta = d(r[i-1], r[j]) + d(r[i], r[j+1]) - d(r[i-1], r[i]) - d(r[j], r[j+1])
//! ```
//!
//! If delta < 0, reverse the segment [i..=j] and accept the improvement.
//! Passes repeat until no improvement is found or the pass budget runs out
//! (first-improvement strategy).
//!
//! # Complexity
//!
//! O(n²) per pass.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;

/// Minimum improvement for a move to be accepted.
const IMPROVEMENT_EPS: f64 = 1e-10;

/// Applies 2-opt to the interior of a tour anchored at `start`.
///
/// `route` lists every city except `start`, in visiting order. Returns the
/// improved sequence and the closed tour length. At most `max_passes` full
/// sweeps are made; `0` leaves the route unchanged.
///
/// # Examples
///
/// ```
/// use tsp_exact::distance::DistanceMatrix;
/// use tsp_exact::local_search::two_opt_improve;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, -1.0)]).unwrap();
///
/// // 0 → 1 → 3 → 2 → 0 crosses itself.
/// let (improved, len) = two_opt_improve(&[1, 3, 2], 0, &dm, 50);
/// assert_eq!(improved, vec![1, 2, 3]);
/// assert!((len - 4.0 * 2f64.sqrt()).abs() < 1e-9);
/// ```
pub fn two_opt_improve(
    route: &[usize],
    start: usize,
    distances: &DistanceMatrix,
    max_passes: usize,
) -> (Vec<usize>, f64) {
    let mut current = route.to_vec();
    let n = current.len();

    if n >= 2 {
        for _ in 0..max_passes {
            let mut improved = false;
            for i in 0..n - 1 {
                for j in i + 1..n {
                    let delta = two_opt_delta(&current, start, distances, i, j);
                    if delta < -IMPROVEMENT_EPS {
                        current[i..=j].reverse();
                        improved = true;
                    }
                }
            }
            if !improved {
                break;
            }
        }
    }

    let dist = route_distance(&current, start, distances);
    (current, dist)
}

/// Computes the length change from reversing `route[i..=j]`.
///
/// Before: ...-prev_i - route[i] - ... - route[j] - next_j-...
/// After:  ...-prev_i - route[j] - ... - route[i] - next_j-...
fn two_opt_delta(
    route: &[usize],
    start: usize,
    distances: &DistanceMatrix,
    i: usize,
    j: usize,
) -> f64 {
    let n = route.len();
    let prev_i = if i == 0 { start } else { route[i - 1] };
    let next_j = if j == n - 1 { start } else { route[j + 1] };

    let old_cost = distances.get(prev_i, route[i]) + distances.get(route[j], next_j);
    let new_cost = distances.get(prev_i, route[j]) + distances.get(route[i], next_j);

    new_cost - old_cost
}

/// Computes the closed length `start → route[0] → ... → route[n-1] → start`.
///
/// An empty route has length 0.
pub fn route_distance(route: &[usize], start: usize, distances: &DistanceMatrix) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let inner: f64 = route
        .windows(2)
        .map(|w| distances.get(w[0], w[1]))
        .sum();
    distances.get(start, first) + inner + distances.get(last, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> DistanceMatrix {
        DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)])
            .expect("valid")
    }

    fn diamond() -> DistanceMatrix {
        DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, -1.0)])
            .expect("valid")
    }

    #[test]
    fn test_2opt_already_optimal() {
        let dm = line();
        let (improved, dist) = two_opt_improve(&[1, 2, 3], 0, &dm, 50);
        assert_eq!(improved, vec![1, 2, 3]);
        assert!((dist - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_2opt_reverses_crossing() {
        let dm = diamond();
        let original = route_distance(&[1, 3, 2], 0, &dm);
        let (improved, dist) = two_opt_improve(&[1, 3, 2], 0, &dm, 50);
        assert!(dist < original - 1e-9);
        assert_eq!(improved, vec![1, 2, 3]);
    }

    #[test]
    fn test_2opt_zero_passes_is_identity() {
        let dm = diamond();
        let (improved, dist) = two_opt_improve(&[1, 3, 2], 0, &dm, 0);
        assert_eq!(improved, vec![1, 3, 2]);
        assert!((dist - route_distance(&[1, 3, 2], 0, &dm)).abs() < 1e-12);
    }

    #[test]
    fn test_2opt_empty_route() {
        let dm = line();
        let (improved, dist) = two_opt_improve(&[], 0, &dm, 50);
        assert!(improved.is_empty());
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_2opt_single_city() {
        let dm = line();
        let (improved, dist) = two_opt_improve(&[2], 0, &dm, 50);
        assert_eq!(improved, vec![2]);
        assert!((dist - 4.0).abs() < 1e-10); // 0→2→0 = 2+2
    }

    #[test]
    fn test_route_distance() {
        let dm = line();
        let d = route_distance(&[1, 2, 3], 0, &dm);
        assert!((d - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_2opt_does_not_worsen() {
        let dm = DistanceMatrix::from_points(&[
            (5.0, 5.0),
            (0.0, 0.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
        ])
        .expect("valid");
        let initial = vec![1, 4, 2, 3]; // deliberately bad order
        let initial_dist = route_distance(&initial, 0, &dm);
        let (improved, improved_dist) = two_opt_improve(&initial, 0, &dm, 50);
        assert!(improved_dist <= initial_dist + 1e-10);
        let mut sorted = improved.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }
}
