//! Public solve entry point.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use super::control::{CancelToken, StopReason};
use super::driver::Search;
use super::stats::SearchStats;
use crate::distance::DistanceMatrix;
use crate::error::{TspError, TspResult};
use crate::heuristic::HeuristicBounder;
use crate::models::{City, Tour, MIN_CITIES};
use crate::relaxation::{MinilpSolver, RelaxationSolver};
use crate::settings::SolverSettings;

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The search tree was exhausted; the tour is optimal.
    Optimal,
    /// The node budget ran out; the tour is the best found.
    NodeLimit,
    /// The time budget ran out; the tour is the best found.
    TimeLimit,
    /// The solve was cancelled; the tour is the best found.
    Cancelled,
}

impl From<StopReason> for SolveStatus {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::NodeLimit => SolveStatus::NodeLimit,
            StopReason::TimeLimit => SolveStatus::TimeLimit,
            StopReason::Cancelled => SolveStatus::Cancelled,
        }
    }
}

/// Tour, status and statistics of a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    pub tour: Tour,
    pub status: SolveStatus,
    pub stats: SearchStats,
}

impl SolveResult {
    /// Returns `true` if the tour is certified optimal.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Exact symmetric TSP solver.
///
/// # Examples
///
/// ```
/// use tsp_exact::distance::DistanceMatrix;
/// use tsp_exact::search::TspSolver;
/// use tsp_exact::settings::SolverSettings;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
/// let result = TspSolver::new(SolverSettings::default()).solve_matrix(&dm).unwrap();
/// assert!(result.is_optimal());
/// assert!((result.tour.length() - 4.0).abs() < 1e-9);
/// ```
#[derive(Clone)]
pub struct TspSolver {
    settings: SolverSettings,
    backend: Arc<dyn RelaxationSolver>,
    cancel: CancelToken,
}

impl TspSolver {
    /// A solver using the default [`MinilpSolver`] backend.
    pub fn new(settings: SolverSettings) -> Self {
        Self::with_backend(settings, MinilpSolver)
    }

    /// A solver using a custom relaxation backend.
    pub fn with_backend(settings: SolverSettings, backend: impl RelaxationSolver + 'static) -> Self {
        Self {
            settings,
            backend: Arc::new(backend),
            cancel: CancelToken::new(),
        }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Handle that stops every solve run by this solver, now and later.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Solves over haversine distances between `cities` (km).
    pub fn solve(&self, cities: &[City]) -> TspResult<SolveResult> {
        let distances = DistanceMatrix::from_cities(cities)?;
        self.solve_matrix(&distances)
    }

    /// Solves over an explicit symmetric matrix.
    ///
    /// # Errors
    ///
    /// * [`TspError::InvalidInput`] for fewer than 3 cities or an asymmetric matrix
    /// * [`TspError::InvalidSettings`] if the settings fail validation
    /// * [`TspError::NoIncumbent`] if a budget stopped the search before any tour was known
    /// * [`TspError::Infeasible`] if the search finished without a tour
    /// * [`TspError::Relaxation`] if the backend failed
    pub fn solve_matrix(&self, distances: &DistanceMatrix) -> TspResult<SolveResult> {
        self.settings.validate()?;
        let n = distances.size();
        if n < MIN_CITIES {
            return Err(TspError::invalid_input(format!(
                "need at least {MIN_CITIES} cities, got {n}"
            )));
        }
        if !distances.is_symmetric(0.0) {
            return Err(TspError::invalid_input("distance matrix is not symmetric"));
        }

        let threads = self.settings.worker_count();
        info!(
            "solver: start n={} threads={} backend={}",
            n,
            threads,
            self.backend.name()
        );

        let search = Search::new(
            distances,
            &self.settings,
            self.backend.as_ref(),
            self.cancel.clone(),
        );

        let heuristic_length = if self.settings.use_heuristic {
            let tour = HeuristicBounder::new(self.settings.two_opt_max_passes).bound(distances)?;
            let length = tour.length();
            search.seed(tour);
            Some(length)
        } else {
            None
        };

        search.run(threads)?;

        let stop = search.stop_reason();
        let mut stats = search.stats();
        stats.heuristic_length = heuristic_length;
        stats.threads = threads;

        let Some(tour) = search.best_tour() else {
            return Err(if stop.is_some() {
                TspError::NoIncumbent
            } else {
                TspError::Infeasible
            });
        };
        let status = stop.map_or(SolveStatus::Optimal, SolveStatus::from);

        info!(
            "solver: done status={:?} length={:.4} nodes={} lp_solves={} cuts={} elapsed_ms={}",
            status,
            tour.length(),
            stats.nodes_explored,
            stats.lp_solves,
            stats.cuts_added,
            stats.elapsed_ms
        );

        Ok(SolveResult {
            tour,
            status,
            stats,
        })
    }
}
