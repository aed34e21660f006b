//! Distance model.
//!
//! Provides the haversine great-circle formula and a dense symmetric
//! distance matrix built from cities, planar points, or explicit data.

mod haversine;
mod matrix;

pub use haversine::{haversine_km, EARTH_RADIUS_KM};
pub use matrix::DistanceMatrix;
