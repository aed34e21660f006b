//! Heuristic upper bound: nearest neighbour followed by 2-opt.
//!
//! Used only to seed and polish the incumbent; the exact search never
//! depends on it for correctness.

use log::debug;

use crate::constructive::nearest_neighbor;
use crate::distance::DistanceMatrix;
use crate::error::TspResult;
use crate::local_search::two_opt_improve;
use crate::models::Tour;

/// Builds quick feasible tours.
///
/// # Examples
///
/// ```
/// use tsp_exact::distance::DistanceMatrix;
/// use tsp_exact::heuristic::HeuristicBounder;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
/// let tour = HeuristicBounder::new(100).bound(&dm).unwrap();
/// assert!((tour.length() - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HeuristicBounder {
    max_passes: usize,
}

impl HeuristicBounder {
    /// Creates a bounder whose 2-opt runs at most `max_passes` sweeps.
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Nearest-neighbour tour from city 0, improved by 2-opt.
    pub fn bound(&self, distances: &DistanceMatrix) -> TspResult<Tour> {
        let cycle = nearest_neighbor(distances, 0);
        let seed = Tour::from_cycle(&cycle, distances)?;
        let improved = self.polish(&seed, distances)?;
        debug!(
            "heuristic: bound nn={:.4} two_opt={:.4}",
            seed.length(),
            improved.length()
        );
        Ok(improved)
    }

    /// Runs 2-opt on an existing tour. Never returns a longer tour.
    pub fn polish(&self, tour: &Tour, distances: &DistanceMatrix) -> TspResult<Tour> {
        let (interior, _) = two_opt_improve(tour.interior(), 0, distances, self.max_passes);
        let mut order = Vec::with_capacity(interior.len() + 2);
        order.push(0);
        order.extend(interior);
        order.push(0);
        let polished = Tour::from_order(order, distances)?;
        if polished.length() < tour.length() {
            Ok(polished)
        } else {
            Ok(tour.clone())
        }
    }
}
