//! Backend-independent linear program description.

/// Sense of a linear constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `a^T x <= rhs`
    Le,
    /// `a^T x == rhs`
    Eq,
    /// `a^T x >= rhs`
    Ge,
}

/// A sparse linear constraint row.
#[derive(Debug, Clone)]
pub struct Row {
    /// `(variable, coefficient)` pairs.
    pub terms: Vec<(usize, f64)>,

    /// Constraint sense.
    pub relation: Relation,

    /// Right-hand side.
    pub rhs: f64,
}

impl Row {
    /// Creates a row.
    pub fn new(terms: Vec<(usize, f64)>, relation: Relation, rhs: f64) -> Self {
        Self {
            terms,
            relation,
            rhs,
        }
    }

    /// Left-hand side value `a^T x`.
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, a)| a * x[v]).sum()
    }

    /// Amount by which `x` violates this row (zero if satisfied).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let lhs = self.activity(x);
        match self.relation {
            Relation::Le => (lhs - self.rhs).max(0.0),
            Relation::Ge => (self.rhs - lhs).max(0.0),
            Relation::Eq => (lhs - self.rhs).abs(),
        }
    }

    /// Returns `true` if the row holds with equality within `tol`.
    pub fn is_tight(&self, x: &[f64], tol: f64) -> bool {
        (self.activity(x) - self.rhs).abs() <= tol
    }
}

/// A minimization LP over bounded continuous variables.
///
/// # Examples
///
/// ```
/// use tsp_exact::relaxation::{LinearProgram, Relation, Row};
///
/// let mut lp = LinearProgram::new(vec![1.0, 2.0]);
/// lp.add_row(Row::new(vec![(0, 1.0), (1, 1.0)], Relation::Ge, 1.0));
/// lp.set_bounds(1, 0.0, 0.0);
/// assert_eq!(lp.num_vars(), 2);
/// assert_eq!(lp.bounds(1), (0.0, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct LinearProgram {
    objective: Vec<f64>,
    bounds: Vec<(f64, f64)>,
    rows: Vec<Row>,
}

impl LinearProgram {
    /// Creates an LP with the given objective and every variable bounded in `[0, 1]`.
    pub fn new(objective: Vec<f64>) -> Self {
        let bounds = vec![(0.0, 1.0); objective.len()];
        Self {
            objective,
            bounds,
            rows: Vec::new(),
        }
    }

    /// Sets the bounds of variable `var`.
    pub fn set_bounds(&mut self, var: usize, lb: f64, ub: f64) {
        self.bounds[var] = (lb, ub);
    }

    /// Appends a constraint row and returns its index.
    pub fn add_row(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of constraint rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Objective coefficients.
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Bounds of variable `var`.
    pub fn bounds(&self, var: usize) -> (f64, f64) {
        self.bounds[var]
    }

    /// Constraint rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Objective value `c^T x`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_violation() {
        let row = Row::new(vec![(0, 1.0), (1, 1.0)], Relation::Ge, 2.0);
        assert_eq!(row.violation(&[1.0, 1.0]), 0.0);
        assert!((row.violation(&[0.5, 0.5]) - 1.0).abs() < 1e-12);
        assert!(row.is_tight(&[1.0, 1.0], 1e-9));
        assert!(!row.is_tight(&[1.0, 2.0], 1e-9));

        let le = Row::new(vec![(0, 2.0)], Relation::Le, 1.0);
        assert!((le.violation(&[1.0]) - 1.0).abs() < 1e-12);
        let eq = Row::new(vec![(0, 1.0)], Relation::Eq, 1.0);
        assert!((eq.violation(&[0.25]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_program_defaults() {
        let mut lp = LinearProgram::new(vec![3.0, 4.0, 5.0]);
        assert_eq!(lp.bounds(0), (0.0, 1.0));
        lp.set_bounds(2, 1.0, 1.0);
        assert_eq!(lp.bounds(2), (1.0, 1.0));
        assert_eq!(lp.num_rows(), 0);
        assert_eq!(lp.add_row(Row::new(vec![(0, 1.0)], Relation::Le, 1.0)), 0);
        assert!((lp.evaluate(&[1.0, 0.0, 1.0]) - 8.0).abs() < 1e-12);
    }
}
