//! Relaxation backend over the `minilp` simplex solver.

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};

use super::{LinearProgram, Relation, Relaxation, RelaxationError, RelaxationSolver};

/// Dual simplex backend provided by the `minilp` crate.
///
/// Every call rebuilds the problem from scratch, so one instance can be
/// shared freely between worker threads.
///
/// # Examples
///
/// ```
/// use tsp_exact::relaxation::{LinearProgram, MinilpSolver, Relation, RelaxationSolver, Row};
///
/// // min x0 + 2 x1  s.t.  x0 + x1 >= 1.5,  x in [0, 1]^2
/// let mut lp = LinearProgram::new(vec![1.0, 2.0]);
/// lp.add_row(Row::new(vec![(0, 1.0), (1, 1.0)], Relation::Ge, 1.5));
/// let r = MinilpSolver.solve(&lp, 1e-6).unwrap();
/// assert!((r.objective - 2.0).abs() < 1e-9);
/// assert_eq!(r.values[0], 1.0);
/// assert!((r.values[1] - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpSolver;

impl RelaxationSolver for MinilpSolver {
    fn name(&self) -> &'static str {
        "minilp"
    }

    fn solve(&self, lp: &LinearProgram, tol: f64) -> Result<Relaxation, RelaxationError> {
        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<_> = lp
            .objective()
            .iter()
            .enumerate()
            .map(|(v, &c)| problem.add_var(c, lp.bounds(v)))
            .collect();

        for row in lp.rows() {
            let mut expr = LinearExpr::empty();
            for &(v, a) in &row.terms {
                expr.add(vars[v], a);
            }
            let op = match row.relation {
                Relation::Le => ComparisonOp::Le,
                Relation::Eq => ComparisonOp::Eq,
                Relation::Ge => ComparisonOp::Ge,
            };
            problem.add_constraint(expr, op, row.rhs);
        }

        #[allow(unreachable_patterns)]
        let solution = problem.solve().map_err(|e| match e {
            minilp::Error::Infeasible => RelaxationError::Infeasible,
            minilp::Error::Unbounded => RelaxationError::Unbounded,
            other => RelaxationError::Numerical(format!("{other:?}")),
        })?;

        let raw: Vec<f64> = vars.iter().map(|&v| solution[v]).collect();
        if raw.iter().any(|v| !v.is_finite()) || !solution.objective().is_finite() {
            return Err(RelaxationError::Numerical(
                "backend returned a non-finite value".to_string(),
            ));
        }
        Ok(Relaxation::from_values(lp, raw, solution.objective(), tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relaxation::Row;

    #[test]
    fn test_simple_lp() {
        // min -x0 - x1  s.t.  x0 + x1 <= 1.5
        let mut lp = LinearProgram::new(vec![-1.0, -1.0]);
        lp.add_row(Row::new(vec![(0, 1.0), (1, 1.0)], Relation::Le, 1.5));
        let r = MinilpSolver.solve(&lp, 1e-6).expect("feasible");
        assert!((r.objective + 1.5).abs() < 1e-9);
        assert_eq!(r.tight_rows, vec![true]);
    }

    #[test]
    fn test_fixed_bounds() {
        let mut lp = LinearProgram::new(vec![1.0, 1.0]);
        lp.set_bounds(0, 1.0, 1.0);
        lp.add_row(Row::new(vec![(0, 1.0), (1, 1.0)], Relation::Ge, 1.0));
        let r = MinilpSolver.solve(&lp, 1e-6).expect("feasible");
        assert_eq!(r.values, vec![1.0, 0.0]);
        assert!((r.objective - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible() {
        let mut lp = LinearProgram::new(vec![1.0, 1.0]);
        lp.add_row(Row::new(vec![(0, 1.0), (1, 1.0)], Relation::Eq, 3.0));
        assert_eq!(
            MinilpSolver.solve(&lp, 1e-6).unwrap_err(),
            RelaxationError::Infeasible
        );
    }

    #[test]
    fn test_triangle_degree_constraints() {
        // Three cities, edges (0,1), (0,2), (1,2): degree 2 forces every edge to 1.
        let mut lp = LinearProgram::new(vec![3.0, 4.0, 5.0]);
        lp.add_row(Row::new(vec![(0, 1.0), (1, 1.0)], Relation::Eq, 2.0));
        lp.add_row(Row::new(vec![(0, 1.0), (2, 1.0)], Relation::Eq, 2.0));
        lp.add_row(Row::new(vec![(1, 1.0), (2, 1.0)], Relation::Eq, 2.0));
        let r = MinilpSolver.solve(&lp, 1e-6).expect("feasible");
        assert!(r.is_integral());
        assert_eq!(r.values, vec![1.0, 1.0, 1.0]);
        assert!((r.objective - 12.0).abs() < 1e-9);
    }
}
