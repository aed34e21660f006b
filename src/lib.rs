//! # tsp-exact
//!
//! Exact solver for the symmetric travelling salesman problem: linear
//! relaxation over edge variables, dynamic subtour-elimination cuts, and a
//! multi-threaded best-bound branch-and-bound seeded by a 2-opt heuristic.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (City, EdgeIndex, Tour)
//! - [`distance`] — Haversine and planar distance matrices
//! - [`evaluation`] — Tour validation, length, and cycle extraction
//! - [`relaxation`] — LP description, backend trait, `minilp` adapter
//! - [`cuts`] — Union-find and Stoer–Wagner subtour separation
//! - [`constructive`] — Nearest-neighbor construction
//! - [`local_search`] — 2-opt improvement
//! - [`heuristic`] — Upper bound from nearest neighbor + 2-opt
//! - [`search`] — Branch-and-bound driver and [`TspSolver`]
//! - [`settings`] — Solver configuration
//! - [`instances`] — Built-in landmarks, random and JSON instances
//! - [`logging`] / [`cli`] — Support for the `tsp-exact` binary
//!
//! ## Example
//!
//! ```
//! use tsp_exact::{instances, SolverSettings, TspSolver};
//!
//! let cities = instances::random_cities(7, 1);
//! let result = TspSolver::new(SolverSettings::default()).solve(&cities).unwrap();
//! assert!(result.is_optimal());
//! assert_eq!(result.tour.order().len(), 8);
//! ```

pub mod cli;
pub mod constructive;
pub mod cuts;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod heuristic;
pub mod instances;
pub mod local_search;
pub mod logging;
pub mod models;
pub mod relaxation;
pub mod search;
pub mod settings;

pub use error::{TspError, TspResult};
pub use models::{City, Tour};
pub use search::{CancelToken, SearchStats, SolveResult, SolveStatus, TspSolver};
pub use settings::SolverSettings;
