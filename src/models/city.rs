//! City type and coordinate validation.

use serde::{Deserialize, Serialize};

use crate::distance::haversine_km;
use crate::error::{TspError, TspResult};

/// Minimum number of cities for a meaningful cycle.
pub const MIN_CITIES: usize = 3;

/// A named location on the globe.
///
/// City 0 is the designated start and end of every tour.
///
/// # Examples
///
/// ```
/// use tsp_exact::models::City;
///
/// let airport = City::new(0, "New Istanbul Airport", 41.2753, 28.7519);
/// assert_eq!(airport.index(), 0);
/// assert!(airport.validate().is_ok());
///
/// let bad = City::new(1, "Nowhere", 91.0, 0.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    index: usize,
    name: String,
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    longitude: f64,
}

impl City {
    /// Creates a new city. Coordinates are in degrees.
    pub fn new(index: usize, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            index,
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Stable index of this city (0 = start/end).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Checks that both coordinates are finite and within range.
    pub fn validate(&self) -> TspResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(TspError::invalid_input(format!(
                "city {} ({}) has latitude {} outside [-90, 90]",
                self.index, self.name, self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(TspError::invalid_input(format!(
                "city {} ({}) has longitude {} outside [-180, 180]",
                self.index, self.name, self.longitude
            )));
        }
        Ok(())
    }

    /// Great-circle distance to another city in kilometers.
    pub fn distance_to(&self, other: &City) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Validates a full city set.
///
/// Requires at least [`MIN_CITIES`] entries, valid coordinates, and indices
/// forming exactly `0..n` (no duplicates, no gaps).
pub fn validate_cities(cities: &[City]) -> TspResult<()> {
    if cities.len() < MIN_CITIES {
        return Err(TspError::invalid_input(format!(
            "need at least {MIN_CITIES} cities for a cycle, got {}",
            cities.len()
        )));
    }

    let n = cities.len();
    let mut seen = vec![false; n];
    for city in cities {
        city.validate()?;
        let idx = city.index();
        if idx >= n {
            return Err(TspError::invalid_input(format!(
                "city index {idx} out of range for {n} cities"
            )));
        }
        if seen[idx] {
            return Err(TspError::invalid_input(format!(
                "duplicate city at index {idx}"
            )));
        }
        seen[idx] = true;
    }
    Ok(())
}
