//! Relaxation solver trait and result types.

use thiserror::Error;

use super::LinearProgram;

/// Failures reported by a relaxation backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelaxationError {
    /// No point satisfies the bounds and rows. The node can be pruned.
    #[error("relaxation is infeasible")]
    Infeasible,

    /// The objective is unbounded below (cannot happen with bounded edge variables).
    #[error("relaxation is unbounded")]
    Unbounded,

    /// The backend reported a numerical failure.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

/// Optimal solution of a relaxation.
#[derive(Debug, Clone)]
pub struct Relaxation {
    /// Optimal objective value (a lower bound for the node's subtree).
    pub objective: f64,

    /// Variable values, snapped to exactly 0 or 1 within tolerance.
    pub values: Vec<f64>,

    /// Per-row flag: `true` if the row holds with equality.
    pub tight_rows: Vec<bool>,
}

impl Relaxation {
    /// Builds a relaxation result from raw backend values.
    ///
    /// Values within `tol` of 0 or 1 are snapped, and row tightness is
    /// evaluated against the program's rows.
    pub fn from_values(lp: &LinearProgram, raw: Vec<f64>, objective: f64, tol: f64) -> Self {
        let values: Vec<f64> = raw.into_iter().map(|v| snap(v, tol)).collect();
        let tight_rows = lp
            .rows()
            .iter()
            .map(|row| row.is_tight(&values, tol.max(1e-9) * 10.0))
            .collect();
        Self {
            objective,
            values,
            tight_rows,
        }
    }

    /// Returns `true` if every value is exactly 0 or 1 (after snapping).
    pub fn is_integral(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0 || v == 1.0)
    }

    /// Number of rows that hold with equality.
    pub fn num_tight(&self) -> usize {
        self.tight_rows.iter().filter(|&&t| t).count()
    }
}

/// Snaps `v` to 0 or 1 if it lies within `tol` of either, and clamps into `[0, 1]`.
pub fn snap(v: f64, tol: f64) -> f64 {
    if v.abs() <= tol {
        0.0
    } else if (v - 1.0).abs() <= tol {
        1.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// A linear programming backend used to bound search nodes.
///
/// Implementations must minimize, respect variable bounds, and report
/// infeasibility as [`RelaxationError::Infeasible`] rather than as a
/// numerical failure. Calls are synchronous and must terminate.
pub trait RelaxationSolver: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Solves `lp` to optimality. `tol` is the integrality snapping tolerance.
    fn solve(&self, lp: &LinearProgram, tol: f64) -> Result<Relaxation, RelaxationError>;
}
