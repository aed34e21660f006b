//! Branching variable selection.

/// Distances from 0.5 closer than this count as a tie.
const TIE_EPS: f64 = 1e-12;

/// Picks the edge to branch on.
///
/// Prefers the unfixed edge whose value is closest to 0.5. Distances within
/// `1e-12` of each other tie, and ties go to the lowest index. If no unfixed
/// edge is fractional, falls back to the first unfixed edge with value
/// `>= 0.5`, then to the first unfixed edge.
/// Returns `None` only when every edge is fixed.
///
/// # Examples
///
/// ```
/// use tsp_exact::search::select_branch_edge;
///
/// let values = [1.0, 0.4, 0.5, 0.7, 0.0];
/// assert_eq!(select_branch_edge(&values, &[false; 5], 1e-6), Some(2));
/// assert_eq!(select_branch_edge(&values, &[false, false, true, false, false], 1e-6), Some(1));
/// ```
pub fn select_branch_edge(values: &[f64], fixed: &[bool], tol: f64) -> Option<usize> {
    let unfixed = || {
        values
            .iter()
            .enumerate()
            .filter(|&(e, _)| !fixed.get(e).copied().unwrap_or(false))
    };

    let mut best: Option<(usize, f64)> = None;
    for (e, &v) in unfixed() {
        if v <= tol || v >= 1.0 - tol {
            continue;
        }
        let distance = (v - 0.5).abs();
        if best.map_or(true, |(_, d)| distance < d - TIE_EPS) {
            best = Some((e, distance));
        }
    }
    if let Some((e, _)) = best {
        return Some(e);
    }

    unfixed()
        .find(|&(_, &v)| v >= 0.5)
        .or_else(|| unfixed().next())
        .map(|(e, _)| e)
}
