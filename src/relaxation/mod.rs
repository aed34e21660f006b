//! Linear relaxation interface.
//!
//! The search driver only sees [`LinearProgram`] and the
//! [`RelaxationSolver`] trait; [`MinilpSolver`] is the default backend.
//! Any other LP implementation can be plugged in through the trait without
//! touching the driver or the cut separator.

mod backend;
mod minilp_backend;
mod program;

pub use backend::{snap, Relaxation, RelaxationError, RelaxationSolver};
pub use minilp_backend::MinilpSolver;
pub use program::{LinearProgram, Relation, Row};
