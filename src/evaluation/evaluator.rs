//! Tour length and structural validation.

use crate::distance::DistanceMatrix;
use crate::error::{TspError, TspResult};

/// Computes the length of a closed order `0 → ... → 0` by summing matrix lookups
/// along consecutive pairs.
///
/// # Examples
///
/// ```
/// use tsp_exact::distance::DistanceMatrix;
/// use tsp_exact::evaluation::tour_length;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]).unwrap();
/// assert!((tour_length(&[0, 1, 2, 0], &dm) - 12.0).abs() < 1e-10);
/// ```
pub fn tour_length(order: &[usize], distances: &DistanceMatrix) -> f64 {
    order.windows(2).map(|w| distances.get(w[0], w[1])).sum()
}

/// Checks that `order` is a closed tour over `n` cities.
///
/// A valid order has length `n + 1`, starts and ends at city 0, visits every
/// city in `0..n` exactly once in between, and never repeats a city on
/// consecutive positions.
pub fn validate_order(order: &[usize], n: usize) -> TspResult<()> {
    if order.len() != n + 1 {
        return Err(TspError::malformed(format!(
            "tour has {} entries, expected {}",
            order.len(),
            n + 1
        )));
    }
    if order.first() != Some(&0) || order.last() != Some(&0) {
        return Err(TspError::malformed("tour must start and end at city 0"));
    }

    let mut seen = vec![false; n];
    for &city in &order[..n] {
        if city >= n {
            return Err(TspError::malformed(format!("city {city} out of range")));
        }
        if seen[city] {
            return Err(TspError::malformed(format!("city {city} visited twice")));
        }
        seen[city] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> DistanceMatrix {
        DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)])
            .expect("valid points")
    }

    #[test]
    fn test_tour_length() {
        let dm = line();
        // 0→1→2→3→0 = 1 + 1 + 1 + 3
        assert!((tour_length(&[0, 1, 2, 3, 0], &dm) - 6.0).abs() < 1e-10);
        // 0→2→1→3→0 = 2 + 1 + 2 + 3
        assert!((tour_length(&[0, 2, 1, 3, 0], &dm) - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_tour_length_reversal() {
        let dm = line();
        let fwd = tour_length(&[0, 2, 1, 3, 0], &dm);
        let rev = tour_length(&[0, 3, 1, 2, 0], &dm);
        assert!((fwd - rev).abs() < 1e-12);
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate_order(&[0, 3, 1, 2, 0], 4).is_ok());
    }

    #[test]
    fn test_validate_wrong_length() {
        assert!(validate_order(&[0, 1, 2, 0], 4).is_err());
    }

    #[test]
    fn test_validate_wrong_endpoints() {
        assert!(validate_order(&[1, 0, 2, 3, 1], 4).is_err());
        assert!(validate_order(&[0, 1, 2, 3, 2], 4).is_err());
    }

    #[test]
    fn test_validate_repeat() {
        let err = validate_order(&[0, 1, 1, 3, 0], 4).unwrap_err();
        assert!(matches!(err, TspError::MalformedTour(_)));
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(validate_order(&[0, 1, 9, 3, 0], 4).is_err());
    }
}
