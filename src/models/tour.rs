//! Tour type.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::evaluation::{tour_length, validate_order};
use crate::error::TspResult;

/// A closed tour through every city.
///
/// The order always starts and ends at city 0 and has length `n + 1`.
///
/// # Examples
///
/// ```
/// use tsp_exact::distance::DistanceMatrix;
/// use tsp_exact::models::Tour;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
/// let tour = Tour::from_cycle(&[2, 3, 0, 1], &dm).unwrap();
/// assert_eq!(tour.order(), &[0, 1, 2, 3, 0]);
/// assert!((tour.length() - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    order: Vec<usize>,
    length: f64,
}

impl Tour {
    /// Builds a tour from an open cycle (each city exactly once, any rotation).
    ///
    /// The cycle is rotated so city 0 comes first, closed back to 0, validated,
    /// and its length computed from `distances`.
    pub fn from_cycle(cycle: &[usize], distances: &DistanceMatrix) -> TspResult<Self> {
        let start = cycle.iter().position(|&c| c == 0).unwrap_or(0);
        let mut order = Vec::with_capacity(cycle.len() + 1);
        order.extend_from_slice(&cycle[start..]);
        order.extend_from_slice(&cycle[..start]);
        order.push(0);
        Self::from_order(order, distances)
    }

    /// Builds a tour from a closed order (`0, ..., 0`), validating it.
    pub fn from_order(order: Vec<usize>, distances: &DistanceMatrix) -> TspResult<Self> {
        validate_order(&order, distances.size())?;
        let length = tour_length(&order, distances);
        Ok(Self { order, length })
    }

    /// City indices in visit order, starting and ending at 0.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Interior cities, excluding the start/end city 0.
    pub fn interior(&self) -> &[usize] {
        &self.order[1..self.order.len() - 1]
    }

    /// Total tour length in matrix units.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of cities visited.
    pub fn num_cities(&self) -> usize {
        self.order.len() - 1
    }

    /// The same cycle traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut order = self.order.clone();
        order.reverse();
        Self {
            order,
            length: self.length,
        }
    }

    /// Consecutive city pairs along the tour.
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order.windows(2).map(|w| (w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> DistanceMatrix {
        DistanceMatrix::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
            .expect("valid points")
    }

    #[test]
    fn test_from_cycle_rotates() {
        let dm = square();
        let tour = Tour::from_cycle(&[3, 0, 1, 2], &dm).expect("valid cycle");
        assert_eq!(tour.order(), &[0, 1, 2, 3, 0]);
        assert_eq!(tour.interior(), &[1, 2, 3]);
        assert_eq!(tour.num_cities(), 4);
    }

    #[test]
    fn test_crossing_tour_longer() {
        let dm = square();
        let crossing = Tour::from_cycle(&[0, 2, 1, 3], &dm).expect("valid cycle");
        assert!(crossing.length() > 4.0 + 1e-9);
    }

    #[test]
    fn test_reversed_same_length() {
        let dm = square();
        let tour = Tour::from_cycle(&[0, 2, 1, 3], &dm).expect("valid cycle");
        let rev = tour.reversed();
        assert_eq!(rev.order(), &[0, 3, 1, 2, 0]);
        let recomputed = tour_length(rev.order(), &dm);
        assert!((recomputed - tour.length()).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_non_permutation() {
        let dm = square();
        assert!(Tour::from_cycle(&[0, 1, 1, 3], &dm).is_err());
        assert!(Tour::from_cycle(&[0, 1, 2], &dm).is_err());
    }

    #[test]
    fn test_legs() {
        let dm = square();
        let tour = Tour::from_cycle(&[0, 1, 2, 3], &dm).expect("valid cycle");
        let legs: Vec<_> = tour.legs().collect();
        assert_eq!(legs, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
    }
}
