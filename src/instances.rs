//! Problem instances: the built-in landmark set, random generation and JSON loading.

use std::fs;
use std::path::Path;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{TspError, TspResult};
use crate::models::{validate_cities, City};

/// Thirteen Istanbul landmarks. City 0 is the airport, the tour's start and end.
///
/// # Examples
///
/// ```
/// use tsp_exact::instances::istanbul_landmarks;
///
/// let cities = istanbul_landmarks();
/// assert_eq!(cities.len(), 13);
/// assert_eq!(cities[0].name(), "New Istanbul Airport");
/// ```
pub fn istanbul_landmarks() -> Vec<City> {
    const LANDMARKS: [(&str, f64, f64); 13] = [
        ("New Istanbul Airport", 41.2753, 28.7519),
        ("Hagia Sophia / Sultanahmet", 41.008469, 28.980261),
        ("Topkapi Palace", 41.011574, 28.983269),
        ("Blue Mosque (Sultanahmet Mosque)", 41.005745, 28.977114),
        ("Grand Bazaar", 41.010658, 28.968058),
        ("Eminönü / Spice Bazaar area", 41.01478, 28.9694),
        ("Galata Tower", 41.025658, 28.974155),
        ("Taksim Square", 41.036945, 28.985832),
        ("İstiklal Avenue (approx center)", 41.033806, 28.977905),
        ("Karaköy (Galata Bridge north end)", 41.0225, 28.9733),
        ("Ortaköy", 41.04806, 29.02361),
        ("Beşiktaş (ferry/center)", 41.0439, 29.0073),
        ("Kadıköy (ferry/center)", 41.0427, 29.0073),
    ];
    LANDMARKS
        .iter()
        .enumerate()
        .map(|(i, &(name, lat, lon))| City::new(i, name, lat, lon))
        .collect()
}

/// `n` cities with uniformly random coordinates inside a box around Istanbul.
///
/// The same seed always yields the same cities.
///
/// # Examples
///
/// ```
/// use tsp_exact::instances::random_cities;
///
/// let a = random_cities(8, 42);
/// assert_eq!(a.len(), 8);
/// assert_eq!(a, random_cities(8, 42));
/// ```
pub fn random_cities(n: usize, seed: u64) -> Vec<City> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let lat = rng.random_range(40.80..41.30);
            let lon = rng.random_range(28.50..29.40);
            City::new(i, format!("City {i}"), lat, lon)
        })
        .collect()
}

/// Reads a JSON array of cities and validates it.
///
/// Each entry needs `index`, `name`, `latitude` (or `lat`) and `longitude`
/// (or `lon` / `lng`).
pub fn load_cities_json(path: impl AsRef<Path>) -> TspResult<Vec<City>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let cities = parse_cities_json(&text)?;
    debug!("instances: loaded n={} path={}", cities.len(), path.display());
    Ok(cities)
}

/// Parses and validates a JSON array of cities.
pub fn parse_cities_json(text: &str) -> TspResult<Vec<City>> {
    let cities: Vec<City> = serde_json::from_str(text)?;
    validate_cities(&cities)?;
    Ok(cities)
}

/// Serializes cities as pretty JSON, the format [`load_cities_json`] reads.
pub fn cities_to_json(cities: &[City]) -> TspResult<String> {
    serde_json::to_string_pretty(cities).map_err(TspError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    #[test]
    fn test_landmarks_valid() {
        let cities = istanbul_landmarks();
        assert!(validate_cities(&cities).is_ok());
        assert!(cities.iter().enumerate().all(|(i, c)| c.index() == i));
        let dm = DistanceMatrix::from_cities(&cities).expect("valid");
        // The airport is far from the old city.
        assert!(dm.get(0, 1) > 25.0);
    }

    #[test]
    fn test_random_cities_seeded() {
        let a = random_cities(10, 7);
        let b = random_cities(10, 8);
        assert_ne!(a, b);
        assert!(validate_cities(&a).is_ok());
        for c in &a {
            assert!((40.80..41.30).contains(&c.latitude()));
            assert!((28.50..29.40).contains(&c.longitude()));
        }
    }

    #[test]
    fn test_parse_aliases() {
        let text = r#"[
            {"index": 0, "name": "A", "lat": 41.0, "lon": 29.0},
            {"index": 1, "name": "B", "latitude": 41.1, "longitude": 29.0},
            {"index": 2, "name": "C", "lat": 41.1, "lng": 29.1}
        ]"#;
        let cities = parse_cities_json(text).expect("valid");
        assert_eq!(cities.len(), 3);
        assert_eq!(cities[2].longitude(), 29.1);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(matches!(parse_cities_json("not json"), Err(TspError::Json(_))));
        let two = r#"[
            {"index": 0, "name": "A", "lat": 41.0, "lon": 29.0},
            {"index": 1, "name": "B", "lat": 41.1, "lon": 29.0}
        ]"#;
        assert!(matches!(parse_cities_json(two), Err(TspError::InvalidInput(_))));
    }

    #[test]
    fn test_json_roundtrip_file() {
        let cities = random_cities(5, 1);
        let path = std::env::temp_dir().join(format!("tsp_exact_cities_{}.json", std::process::id()));
        fs::write(&path, cities_to_json(&cities).expect("serialize")).expect("write");
        let loaded = load_cities_json(&path).expect("load");
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.len(), cities.len());
        for (a, b) in loaded.iter().zip(&cities) {
            assert_eq!(a.index(), b.index());
            assert_eq!(a.name(), b.name());
            assert!((a.latitude() - b.latitude()).abs() < 1e-12);
            assert!((a.longitude() - b.longitude()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_cities_json("/nonexistent/cities.json"),
            Err(TspError::Io(_))
        ));
    }
}
