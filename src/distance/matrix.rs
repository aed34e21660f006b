//! Dense distance matrix.

use crate::error::{TspError, TspResult};
use crate::models::{validate_cities, City, EdgeIndex, MIN_CITIES};

/// A dense, symmetric n×n distance matrix stored in row-major order.
///
/// Every constructor validates its input: at least three locations, finite
/// non-negative values, and `d(i, j) == d(j, i)`. The diagonal is zero and
/// never read by the solver.
///
/// # Examples
///
/// ```
/// use tsp_exact::models::City;
/// use tsp_exact::distance::DistanceMatrix;
///
/// let cities = vec![
///     City::new(0, "Airport", 41.2753, 28.7519),
///     City::new(1, "Hagia Sophia", 41.008469, 28.980261),
///     City::new(2, "Galata Tower", 41.025658, 28.974155),
/// ];
/// let dm = DistanceMatrix::from_cities(&cities).unwrap();
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(0, 1), dm.get(1, 0));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a zero matrix of the given size.
    fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a haversine (kilometer) matrix from city coordinates.
    ///
    /// Cities may be given in any order; row `i` corresponds to the city
    /// whose [`City::index`] is `i`.
    pub fn from_cities(cities: &[City]) -> TspResult<Self> {
        validate_cities(cities)?;
        let n = cities.len();
        let mut by_index: Vec<&City> = cities.iter().collect();
        by_index.sort_by_key(|c| c.index());

        let mut dm = Self::zeros(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = by_index[i].distance_to(by_index[j]);
                dm.set_pair(i, j, d);
            }
        }
        Ok(dm)
    }

    /// Computes a planar Euclidean matrix from `(x, y)` points.
    pub fn from_points(points: &[(f64, f64)]) -> TspResult<Self> {
        check_size(points.len())?;
        if let Some(i) = points
            .iter()
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(TspError::invalid_input(format!(
                "point {i} has a non-finite coordinate"
            )));
        }

        let n = points.len();
        let mut dm = Self::zeros(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                dm.set_pair(i, j, (dx * dx + dy * dy).sqrt());
            }
        }
        Ok(dm)
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Fails if the data length doesn't match `size * size`, or if any
    /// off-diagonal value is negative, non-finite, or asymmetric.
    pub fn from_data(size: usize, data: Vec<f64>) -> TspResult<Self> {
        check_size(size)?;
        if data.len() != size * size {
            return Err(TspError::invalid_input(format!(
                "expected {} matrix entries, got {}",
                size * size,
                data.len()
            )));
        }

        let mut dm = Self { data, size };
        for i in 0..size {
            dm.data[i * size + i] = 0.0;
            for j in (i + 1)..size {
                let (dij, dji) = (dm.get(i, j), dm.get(j, i));
                if !dij.is_finite() || dij < 0.0 {
                    return Err(TspError::invalid_input(format!(
                        "distance ({i}, {j}) = {dij} is not a finite non-negative value"
                    )));
                }
                if dij != dji {
                    return Err(TspError::invalid_input(format!(
                        "distance ({i}, {j}) = {dij} differs from ({j}, {i}) = {dji}"
                    )));
                }
            }
        }
        Ok(dm)
    }

    /// Returns the distance between locations `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    fn set_pair(&mut self, i: usize, j: usize, distance: f64) {
        self.data[i * self.size + j] = distance;
        self.data[j * self.size + i] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the nearest neighbor of `from` among the given candidates.
    ///
    /// Ties go to the earlier candidate. Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }

    /// Per-edge costs in [`EdgeIndex`] order.
    pub fn edge_costs(&self, edges: &EdgeIndex) -> Vec<f64> {
        edges.iter().map(|(_, (i, j))| self.get(i, j)).collect()
    }
}

fn check_size(n: usize) -> TspResult<()> {
    if n < MIN_CITIES {
        return Err(TspError::invalid_input(format!(
            "need at least {MIN_CITIES} locations for a cycle, got {n}"
        )));
    }
    Ok(())
}
