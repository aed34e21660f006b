//! Error types for the TSP engine.

use thiserror::Error;

use crate::relaxation::RelaxationError;

/// Errors that can occur while building or solving a TSP instance.
#[derive(Error, Debug)]
pub enum TspError {
    /// Input cities or distances were rejected before any solve started.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The search ended without ever finding a feasible tour.
    #[error("Infeasible: no tour satisfies the constraints")]
    Infeasible,

    /// An accepted edge selection did not reconstruct into a single
    /// Hamiltonian cycle.
    #[error("Malformed tour: {0}")]
    MalformedTour(String),

    /// A search budget ran out before any tour was found.
    #[error("Search budget exhausted before any tour was found")]
    NoIncumbent,

    /// The relaxation backend failed for a reason other than infeasibility.
    #[error("Relaxation solver failed: {0}")]
    Relaxation(#[from] RelaxationError),

    /// A search worker thread panicked.
    #[error("Search worker panicked")]
    WorkerPanicked,

    /// Solver settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logger installation failed.
    #[error("Logger error: {0}")]
    Logger(String),
}

impl TspError {
    /// Shorthand for [`TspError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for [`TspError::MalformedTour`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedTour(msg.into())
    }
}

/// Result type for TSP operations.
pub type TspResult<T> = Result<T, TspError>;
