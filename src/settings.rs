//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{TspError, TspResult};

/// Tuning knobs for [`TspSolver`](crate::search::TspSolver).
///
/// Every field has a default, so a JSON document may override any subset.
///
/// # Examples
///
/// ```
/// use tsp_exact::settings::SolverSettings;
///
/// let settings: SolverSettings = serde_json::from_str(r#"{"threads": 2}"#).unwrap();
/// assert_eq!(settings.threads, 2);
/// assert_eq!(settings.max_cut_rounds, 20);
///
/// let settings = SolverSettings::default()
///     .with_node_limit(10_000)
///     .with_time_limit_ms(5_000);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Fractional cut rounds per node before branching.
    pub max_cut_rounds: usize,

    /// Snapping and violation tolerance.
    pub tolerance: f64,

    /// Cap on cuts added per separation round.
    pub max_cuts_per_round: usize,

    /// Stop after this many processed nodes.
    pub node_limit: Option<u64>,

    /// Stop after this many milliseconds of wall-clock time.
    pub time_limit_ms: Option<u64>,

    /// Worker threads; 0 uses the available parallelism.
    pub threads: usize,

    /// Seed the incumbent with nearest neighbour + 2-opt.
    pub use_heuristic: bool,

    /// Run 2-opt on tours accepted at integral nodes.
    pub polish_integral_tours: bool,

    /// Pass budget for every 2-opt run.
    pub two_opt_max_passes: usize,

    /// Log a progress line every this many nodes (0 disables).
    pub log_freq: u64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_cut_rounds: 20,
            tolerance: 1e-6,
            max_cuts_per_round: 50,
            node_limit: None,
            time_limit_ms: None,
            threads: 0,
            use_heuristic: true,
            polish_integral_tours: true,
            two_opt_max_passes: 100,
            log_freq: 1000,
        }
    }
}

impl SolverSettings {
    /// Sets the fractional cut-round cap.
    pub fn with_max_cut_rounds(mut self, rounds: usize) -> Self {
        self.max_cut_rounds = rounds;
        self
    }

    /// Sets the tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the per-round cut cap.
    pub fn with_max_cuts_per_round(mut self, cuts: usize) -> Self {
        self.max_cuts_per_round = cuts;
        self
    }

    /// Sets the node budget.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the worker count (0 = available parallelism).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Enables or disables the heuristic warm start.
    pub fn with_heuristic(mut self, enabled: bool) -> Self {
        self.use_heuristic = enabled;
        self
    }

    /// Enables or disables 2-opt polishing of integral tours.
    pub fn with_polish_integral_tours(mut self, enabled: bool) -> Self {
        self.polish_integral_tours = enabled;
        self
    }

    /// Sets the 2-opt pass budget.
    pub fn with_two_opt_max_passes(mut self, passes: usize) -> Self {
        self.two_opt_max_passes = passes;
        self
    }

    /// Sets the progress log frequency.
    pub fn with_log_freq(mut self, every: u64) -> Self {
        self.log_freq = every;
        self
    }

    /// Number of worker threads to spawn.
    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Rejects settings the search cannot run with.
    pub fn validate(&self) -> TspResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 0.5 {
            return Err(TspError::InvalidSettings(format!(
                "tolerance must lie in (0, 0.5), got {}",
                self.tolerance
            )));
        }
        if self.max_cuts_per_round == 0 {
            return Err(TspError::InvalidSettings(
                "max_cuts_per_round must be at least 1".into(),
            ));
        }
        if self.node_limit == Some(0) {
            return Err(TspError::InvalidSettings(
                "node_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = SolverSettings::default();
        assert_eq!(s.max_cut_rounds, 20);
        assert_eq!(s.tolerance, 1e-6);
        assert_eq!(s.max_cuts_per_round, 50);
        assert!(s.node_limit.is_none());
        assert!(s.use_heuristic);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let s: SolverSettings =
            serde_json::from_str(r#"{"node_limit": 500, "use_heuristic": false}"#)
                .expect("valid json");
        assert_eq!(s.node_limit, Some(500));
        assert!(!s.use_heuristic);
        assert_eq!(s.max_cut_rounds, 20);
    }

    #[test]
    fn test_json_roundtrip() {
        let s = SolverSettings::default().with_threads(3).with_time_limit_ms(250);
        let text = serde_json::to_string(&s).expect("serialize");
        let back: SolverSettings = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, s);
    }

    #[test]
    fn test_validate_rejects() {
        assert!(SolverSettings::default().with_tolerance(0.0).validate().is_err());
        assert!(SolverSettings::default().with_tolerance(f64::NAN).validate().is_err());
        assert!(SolverSettings::default().with_max_cuts_per_round(0).validate().is_err());
        assert!(SolverSettings::default().with_node_limit(0).validate().is_err());
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(SolverSettings::default().with_threads(3).worker_count(), 3);
        assert!(SolverSettings::default().worker_count() >= 1);
    }
}
