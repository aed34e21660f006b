//! Stoer–Wagner global minimum cut.
//!
//! Each phase grows a set `A` from node 0 by repeatedly adding the most
//! tightly connected node. The last node added (together with every node
//! previously merged into it) is separated from the rest by the
//! "cut of the phase"; the lightest phase cut is a global minimum cut.
//! The last node is then merged into the second-to-last one.
//!
//! Node 0 is always the seed of `A` and absorbs merges but is never merged
//! away, so the reported side of every phase cut excludes node 0.

/// A cut produced at the end of one Stoer–Wagner phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCut {
    /// Total weight of edges crossing the cut.
    pub weight: f64,

    /// Nodes on the side that does not contain node 0, sorted ascending.
    pub members: Vec<usize>,
}

/// Runs Stoer–Wagner on a dense symmetric weight matrix.
///
/// `weights` is the flattened `size × size` matrix and is consumed as
/// scratch space. Returns the global minimum cut and every phase cut whose
/// weight is strictly below `collect_below`, in discovery order.
///
/// Returns `None` if `size < 2`.
pub fn stoer_wagner(
    size: usize,
    weights: &mut [f64],
    collect_below: f64,
) -> Option<(PhaseCut, Vec<PhaseCut>)> {
    if size < 2 || weights.len() != size * size {
        return None;
    }

    let mut members: Vec<Vec<usize>> = (0..size).map(|v| vec![v]).collect();
    let mut active = vec![true; size];
    let mut best: Option<PhaseCut> = None;
    let mut collected = Vec::new();

    let mut in_a = vec![false; size];
    let mut conn = vec![0.0; size];

    for phase in 0..(size - 1) {
        in_a.iter_mut().for_each(|x| *x = false);
        in_a[0] = true;
        for v in 0..size {
            conn[v] = weights[v];
        }

        let mut prev = 0;
        let mut last = 0;
        for _ in 0..(size - 1 - phase) {
            let mut pick = None;
            let mut pick_weight = f64::NEG_INFINITY;
            for v in 1..size {
                if active[v] && !in_a[v] && conn[v] > pick_weight {
                    pick = Some(v);
                    pick_weight = conn[v];
                }
            }
            let Some(v) = pick else { break };

            prev = last;
            last = v;
            in_a[v] = true;
            for u in 1..size {
                if active[u] && !in_a[u] {
                    conn[u] += weights[u * size + v];
                }
            }
        }

        let mut side = members[last].clone();
        side.sort_unstable();
        let cut = PhaseCut {
            weight: conn[last],
            members: side,
        };
        if cut.weight < collect_below {
            collected.push(cut.clone());
        }
        if best.as_ref().map_or(true, |b| cut.weight < b.weight) {
            best = Some(cut);
        }

        // Merge `last` into `prev`.
        let moved = std::mem::take(&mut members[last]);
        members[prev].extend(moved);
        active[last] = false;
        for u in 0..size {
            weights[prev * size + u] += weights[last * size + u];
        }
        for u in 0..size {
            weights[u * size + prev] = weights[prev * size + u];
        }
    }

    best.map(|b| (b, collected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(rows: &[[f64; 8]]) -> Vec<f64> {
        rows.iter().flat_map(|r| r.iter().copied()).collect()
    }

    #[test]
    fn test_stoer_wagner_paper_example() {
        // Example from the original paper with nodes 0 and 1 swapped.
        let weights = [
            [0.0, 2.0, 3.0, 0.0, 2.0, 2.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0],
            [3.0, 0.0, 0.0, 4.0, 0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 2.0, 2.0],
            [2.0, 3.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 2.0, 2.0, 0.0, 1.0, 0.0, 3.0],
            [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0, 0.0],
        ];
        let mut flat = flatten(&weights);
        let (min, _) = stoer_wagner(8, &mut flat, 0.0).expect("non-trivial graph");
        assert_eq!(min.weight, 4.0);
        assert_eq!(min.members, vec![2, 3, 6, 7]);
    }

    #[test]
    fn test_disconnected_graph_zero_cut() {
        // Two triangles {0,1,2} and {3,4,5}.
        let n = 6;
        let mut w = vec![0.0; n * n];
        for &(a, b) in &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
            w[a * n + b] = 1.0;
            w[b * n + a] = 1.0;
        }
        let (min, collected) = stoer_wagner(n, &mut w, 2.0).expect("non-trivial graph");
        assert_eq!(min.weight, 0.0);
        assert!(collected.iter().any(|c| c.members == vec![3, 4, 5]));
        assert!(collected.iter().all(|c| !c.members.contains(&0)));
    }

    #[test]
    fn test_cycle_min_cut_two() {
        // A single 5-cycle has minimum cut weight 2.
        let n = 5;
        let mut w = vec![0.0; n * n];
        for k in 0..n {
            let (a, b) = (k, (k + 1) % n);
            w[a * n + b] = 1.0;
            w[b * n + a] = 1.0;
        }
        let (min, collected) = stoer_wagner(n, &mut w, 2.0 - 1e-9).expect("non-trivial graph");
        assert!((min.weight - 2.0).abs() < 1e-12);
        assert!(collected.is_empty());
    }

    #[test]
    fn test_too_small() {
        assert!(stoer_wagner(1, &mut [0.0], 2.0).is_none());
    }
}
