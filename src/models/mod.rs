//! Domain model types for the TSP engine.
//!
//! Provides cities with geographic coordinates, dense undirected edge
//! indexing for the relaxation, and closed tours as the solve output.

mod city;
mod edge;
mod tour;

pub use city::{validate_cities, City, MIN_CITIES};
pub use edge::EdgeIndex;
pub use tour::Tour;
