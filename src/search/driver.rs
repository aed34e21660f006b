//! Parallel branch-and-bound over the subtour relaxation.
//!
//! # Algorithm
//!
//! Each worker repeatedly takes the open node with the lowest bound and:
//!
//! 1. Prunes it if its inherited bound cannot beat the incumbent or its
//!    fixings leave some city unable to reach degree 2.
//! 2. Solves the relaxation (degree rows, inherited cuts, fixings).
//! 3. Separates subtour cuts and re-solves until none is violated. Fractional
//!    rounds are capped; integral solutions with subtours are always cut.
//! 4. Accepts an integral single cycle as a candidate tour, otherwise
//!    branches on the most fractional edge (forced in / forced out).
//!
//! Workers share the frontier, the incumbent, the counters and the budget.
//! A processed node is dropped; its children keep only the cut chain, extended
//! by the node's own cuts that were tight at its final relaxation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::{debug, error, info, trace};

use super::branching::select_branch_edge;
use super::control::{Budget, CancelToken, StopReason};
use super::frontier::Frontier;
use super::incumbent::Incumbent;
use super::node::{CutChain, EdgeFixing, Fixing, NodeState, SearchNode};
use super::stats::{Counters, SearchStats};
use crate::cuts::{CutSeparator, SubtourCut};
use crate::distance::DistanceMatrix;
use crate::error::{TspError, TspResult};
use crate::evaluation::extract_cycle;
use crate::heuristic::HeuristicBounder;
use crate::models::{EdgeIndex, Tour};
use crate::relaxation::{
    LinearProgram, Relation, Relaxation, RelaxationError, RelaxationSolver, Row,
};
use crate::settings::SolverSettings;

/// How long an idle worker sleeps before re-checking the budget.
const POLL: Duration = Duration::from_millis(20);

/// Relative slack below the incumbent length at which a bound still prunes.
const PRUNE_EPS: f64 = 1e-9;

/// Right-hand side of every degree row.
const DEGREE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Pruned,
    Integral,
    Branched,
    Interrupted,
}

/// State shared by the workers of one solve.
pub(crate) struct Search<'a> {
    distances: &'a DistanceMatrix,
    settings: &'a SolverSettings,
    backend: &'a dyn RelaxationSolver,
    edges: EdgeIndex,
    costs: Vec<f64>,
    degree_rows: Vec<Row>,
    separator: CutSeparator,
    bounder: HeuristicBounder,
    frontier: Frontier,
    incumbent: Incumbent,
    counters: Counters,
    budget: Budget,
    next_id: AtomicU64,
    interrupted: AtomicBool,
    failure: Mutex<Option<TspError>>,
}

impl<'a> Search<'a> {
    pub fn new(
        distances: &'a DistanceMatrix,
        settings: &'a SolverSettings,
        backend: &'a dyn RelaxationSolver,
        cancel: CancelToken,
    ) -> Self {
        let edges = EdgeIndex::new(distances.size());
        let costs = distances.edge_costs(&edges);
        let degree_rows = (0..edges.num_cities())
            .map(|city| {
                let terms = edges.incident(city).map(|e| (e, 1.0)).collect();
                Row::new(terms, Relation::Eq, DEGREE)
            })
            .collect();
        Self {
            distances,
            settings,
            backend,
            edges,
            costs,
            degree_rows,
            separator: CutSeparator::new(settings.tolerance, settings.max_cuts_per_round),
            bounder: HeuristicBounder::new(settings.two_opt_max_passes),
            frontier: Frontier::new(),
            incumbent: Incumbent::new(),
            counters: Counters::default(),
            budget: Budget::new(settings.time_limit_ms, settings.node_limit, cancel),
            next_id: AtomicU64::new(1),
            interrupted: AtomicBool::new(false),
            failure: Mutex::new(None),
        }
    }

    /// Offers a warm-start tour to the incumbent.
    pub fn seed(&self, tour: Tour) {
        let length = tour.length();
        if self.incumbent.offer(tour) {
            info!("search: seeded incumbent length={length:.4}");
        }
    }

    /// Runs the search with `threads` workers until completion, a budget stop or a failure.
    pub fn run(&self, threads: usize) -> TspResult<()> {
        self.frontier.push(SearchNode::root());

        std::thread::scope(|s| {
            let mut handles = Vec::with_capacity(threads);
            for worker in 0..threads {
                let spawned = std::thread::Builder::new()
                    .name(format!("bnb-{worker}"))
                    .spawn_scoped(s, move || self.worker(worker));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        self.fail(TspError::Io(e));
                        break;
                    }
                }
            }
            for handle in handles {
                if handle.join().is_err() {
                    self.fail(TspError::WorkerPanicked);
                }
            }
        });

        match self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Why the search ended early, or `None` if the tree was fully explored.
    pub fn stop_reason(&self) -> Option<StopReason> {
        let reason = self.budget.reason()?;
        if self.interrupted.load(Ordering::Acquire) || !self.frontier.is_exhausted() {
            Some(reason)
        } else {
            None
        }
    }

    pub fn stats(&self) -> SearchStats {
        let mut stats = self.counters.snapshot();
        stats.elapsed_ms = u64::try_from(self.budget.elapsed().as_millis()).unwrap_or(u64::MAX);
        stats
    }

    pub fn best_tour(&self) -> Option<Tour> {
        self.incumbent.snapshot()
    }

    fn fail(&self, e: TspError) {
        error!("search: aborting {e}");
        let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(e);
        }
        drop(slot);
        self.interrupted.store(true, Ordering::Release);
        self.frontier.close();
    }

    fn worker(&self, worker: usize) {
        trace!("search: worker={worker} started");
        while let Some(node) = self.frontier.pop(POLL, || self.budget.should_stop()) {
            let processed = self.counters.nodes_explored.fetch_add(1, Ordering::Relaxed);
            if self.budget.exhausted(processed) {
                self.counters.nodes_explored.fetch_sub(1, Ordering::Relaxed);
                self.interrupted.store(true, Ordering::Release);
                self.frontier.done();
                self.frontier.close();
                break;
            }

            let outcome = self.process(node);
            self.frontier.done();
            match outcome {
                Ok(Outcome::Interrupted) => {
                    self.interrupted.store(true, Ordering::Release);
                    self.frontier.close();
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    self.fail(e);
                    break;
                }
            }

            let explored = processed + 1;
            if self.settings.log_freq > 0 && explored % self.settings.log_freq == 0 {
                info!(
                    "search: progress nodes={} open={} best_bound={:.4} incumbent={:.4}",
                    explored,
                    self.frontier.len(),
                    self.frontier.best_bound().unwrap_or(f64::NAN),
                    self.incumbent.length()
                );
            }
        }
        trace!("search: worker={worker} finished");
    }

    /// Bound at or above which a node cannot improve the incumbent.
    fn cutoff(&self) -> f64 {
        let best = self.incumbent.length();
        if best.is_finite() {
            best - PRUNE_EPS * best.abs().max(1.0)
        } else {
            f64::INFINITY
        }
    }

    fn prune(&self, mut node: SearchNode, reason: &str) -> Outcome {
        let from = node.state();
        node.advance(NodeState::Pruned);
        Counters::bump(&self.counters.nodes_pruned);
        debug!(
            "search: prune node={} depth={} from={:?} reason={} bound={:.4}",
            node.id, node.depth, from, reason, node.bound
        );
        Outcome::Pruned
    }

    fn program(&self, node: &SearchNode) -> LinearProgram {
        let mut lp = LinearProgram::new(self.costs.clone());
        node.apply_fixings(&mut lp);
        for row in &self.degree_rows {
            lp.add_row(row.clone());
        }
        if let Some(chain) = node.cuts() {
            for cut in chain.iter() {
                lp.add_row(cut.to_row(&self.edges));
            }
        }
        lp
    }

    fn process(&self, mut node: SearchNode) -> TspResult<Outcome> {
        if node.bound >= self.cutoff() {
            return Ok(self.prune(node, "parent_bound"));
        }
        if !node.degree_feasible(&self.edges) {
            return Ok(self.prune(node, "degree"));
        }

        let tol = self.settings.tolerance;
        let inherited = node.num_cuts();
        let mut lp = self.program(&node);
        let mut local_cuts: Vec<SubtourCut> = Vec::new();
        let mut rounds = 0;

        let relaxation = loop {
            if self.budget.should_stop() {
                return Ok(Outcome::Interrupted);
            }
            let relaxation = match self.backend.solve(&lp, tol) {
                Ok(r) => r,
                Err(RelaxationError::Infeasible) => return Ok(self.prune(node, "infeasible")),
                Err(e) => return Err(e.into()),
            };
            Counters::bump(&self.counters.lp_solves);
            node.advance(NodeState::Relaxed);
            node.bound = relaxation.objective;
            if node.depth == 0 {
                self.counters.set_root_bound(node.bound);
            }
            if node.bound >= self.cutoff() {
                return Ok(self.prune(node, "bound"));
            }

            let integral = relaxation.is_integral();
            if !integral && rounds >= self.settings.max_cut_rounds {
                break relaxation;
            }
            let separation = self.separator.separate(&relaxation.values, &self.edges);
            if separation.is_empty() {
                break relaxation;
            }
            if !integral {
                rounds += 1;
            }

            node.advance(NodeState::Cutting);
            debug!(
                "search: cuts node={} round={} method={:?} components={} added={} bound={:.4}",
                node.id,
                rounds,
                separation.method,
                separation.components,
                separation.cuts.len(),
                node.bound
            );
            Counters::add(&self.counters.cuts_added, separation.cuts.len() as u64);
            for cut in separation.cuts {
                lp.add_row(cut.to_row(&self.edges));
                local_cuts.push(cut);
            }
        };

        if node.depth == 0 {
            info!(
                "search: root bound={:.4} cuts={} lp_rows={} tight={}",
                node.bound,
                local_cuts.len(),
                lp.num_rows(),
                relaxation.num_tight()
            );
        }

        if relaxation.is_integral() {
            match extract_cycle(&relaxation.values, &self.edges) {
                Ok(cycle) => {
                    node.advance(NodeState::Integral);
                    Counters::bump(&self.counters.integral_nodes);
                    let tour = Tour::from_cycle(&cycle, self.distances)?;
                    self.accept(tour, node.id)?;
                    return Ok(Outcome::Integral);
                }
                Err(e) => {
                    Counters::bump(&self.counters.malformed_tours);
                    error!(
                        "search: invariant violation node={} {e}; branching instead",
                        node.id
                    );
                }
            }
        }

        let kept = self.tight_cuts(&relaxation, inherited, local_cuts);
        Ok(self.branch(node, &relaxation, kept))
    }

    /// Keeps the node's own cuts whose rows hold with equality in `relaxation`.
    ///
    /// The node's rows are the degree rows, then `inherited` chain cuts, then
    /// `cuts` in insertion order. A row with no tightness flag is kept.
    fn tight_cuts(
        &self,
        relaxation: &Relaxation,
        inherited: usize,
        cuts: Vec<SubtourCut>,
    ) -> Vec<SubtourCut> {
        let first = self.degree_rows.len() + inherited;
        let total = cuts.len();
        let kept: Vec<SubtourCut> = cuts
            .into_iter()
            .enumerate()
            .filter(|(k, _)| relaxation.tight_rows.get(first + k).copied().unwrap_or(true))
            .map(|(_, cut)| cut)
            .collect();
        Counters::add(&self.counters.cuts_dropped, (total - kept.len()) as u64);
        kept
    }

    fn accept(&self, tour: Tour, node_id: u64) -> TspResult<()> {
        let tour = if self.settings.polish_integral_tours {
            self.bounder.polish(&tour, self.distances)?
        } else {
            tour
        };
        let length = tour.length();
        if self.incumbent.offer(tour) {
            Counters::bump(&self.counters.incumbent_updates);
            let dropped = self.frontier.prune(self.cutoff());
            Counters::add(&self.counters.nodes_pruned, dropped as u64);
            info!("search: incumbent improved length={length:.4} node={node_id} dropped={dropped}");
        }
        Ok(())
    }

    fn branch(&self, mut node: SearchNode, relaxation: &Relaxation, cuts: Vec<SubtourCut>) -> Outcome {
        let fixed = node.fixed_mask(self.edges.len());
        let Some(edge) = select_branch_edge(&relaxation.values, &fixed, self.settings.tolerance)
        else {
            return self.prune(node, "all_fixed");
        };

        node.advance(NodeState::Branched);
        Counters::bump(&self.counters.nodes_branched);
        let chain = CutChain::extend(node.cuts().cloned(), cuts);
        for fixing in [Fixing::In, Fixing::Out] {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let child = node.child(id, EdgeFixing { edge, fixing }, chain.clone());
            self.counters
                .max_depth
                .fetch_max(child.depth as u64, Ordering::Relaxed);
            self.frontier.push(child);
        }
        debug!(
            "search: branch node={} depth={} edge={:?} value={:.4} bound={:.4}",
            node.id,
            node.depth,
            self.edges.endpoints(edge),
            relaxation.values[edge],
            node.bound
        );
        Outcome::Branched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relaxation::MinilpSolver;

    fn two_clusters() -> DistanceMatrix {
        // Two tight triangles far apart: the degree-only relaxation picks both
        // triangles, so the root must cut before it can close a tour.
        DistanceMatrix::from_points(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (0.5, 1.0),
            (20.0, 0.0),
            (21.0, 0.0),
            (20.5, 1.0),
        ])
        .expect("valid")
    }

    #[test]
    fn test_root_cuts_subtours() {
        let dm = two_clusters();
        let settings = SolverSettings::default().with_threads(1).with_heuristic(false);
        let search = Search::new(&dm, &settings, &MinilpSolver, CancelToken::new());
        search.run(1).expect("search");
        let stats = search.stats();
        assert!(stats.cuts_added >= 1);
        assert!(stats.root_bound.is_some());
        let tour = search.best_tour().expect("tour");
        assert_eq!(tour.num_cities(), 6);
        assert_eq!(search.stop_reason(), None);
    }

    #[test]
    fn test_infeasible_fixings_prune_without_lp() {
        let dm = two_clusters();
        let settings = SolverSettings::default();
        let search = Search::new(&dm, &settings, &MinilpSolver, CancelToken::new());
        let e = |a, b| search.edges.index(a, b);
        let node = SearchNode::root()
            .child(1, EdgeFixing { edge: e(0, 1), fixing: Fixing::In }, None)
            .child(2, EdgeFixing { edge: e(0, 2), fixing: Fixing::In }, None)
            .child(3, EdgeFixing { edge: e(0, 3), fixing: Fixing::In }, None);
        let outcome = search.process(node).expect("process");
        assert_eq!(outcome, Outcome::Pruned);
        assert_eq!(Counters::get(&search.counters.lp_solves), 0);
    }

    #[test]
    fn test_bound_prunes_against_incumbent() {
        let dm = two_clusters();
        let settings = SolverSettings::default();
        let search = Search::new(&dm, &settings, &MinilpSolver, CancelToken::new());
        search.seed(Tour::from_cycle(&[0, 1, 4, 3, 5, 2], &dm).expect("tour"));
        let mut node = SearchNode::root();
        node.bound = search.incumbent.length();
        assert_eq!(search.process(node).expect("process"), Outcome::Pruned);
    }

    /// Always answers with two triangles joined by edge 2-3: connected and
    /// integral, but city 2 and city 3 have degree 3.
    struct BridgedTriangles;

    impl RelaxationSolver for BridgedTriangles {
        fn name(&self) -> &'static str {
            "bridged-triangles"
        }

        fn solve(&self, lp: &LinearProgram, tol: f64) -> Result<Relaxation, RelaxationError> {
            let edges = EdgeIndex::new(6);
            let mut values = vec![0.0; edges.len()];
            for (a, b) in [(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (3, 5)] {
                values[edges.index(a, b)] = 1.0;
            }
            Ok(Relaxation::from_values(lp, values, 7.0, tol))
        }
    }

    #[test]
    fn test_malformed_integral_solution_is_branched() {
        let dm = two_clusters();
        let settings = SolverSettings::default();
        let search = Search::new(&dm, &settings, &BridgedTriangles, CancelToken::new());

        let outcome = search.process(SearchNode::root()).expect("process");
        assert_eq!(outcome, Outcome::Branched);
        assert!(search.best_tour().is_none());
        assert!(search.incumbent.length().is_infinite());
        assert_eq!(search.frontier.len(), 2);

        let stats = search.stats();
        assert_eq!(stats.malformed_tours, 1);
        assert_eq!(stats.integral_nodes, 0);
        assert_eq!(stats.incumbent_updates, 0);
        assert_eq!(stats.nodes_branched, 1);
    }

    #[test]
    fn test_children_inherit_only_tight_cuts() {
        let dm = two_clusters();
        let settings = SolverSettings::default();
        let search = Search::new(&dm, &settings, &MinilpSolver, CancelToken::new());
        let cuts = vec![
            SubtourCut::new(&[1, 2], 6).expect("cut"),
            SubtourCut::new(&[3, 4, 5], 6).expect("cut"),
            SubtourCut::new(&[4, 5], 6).expect("cut"),
        ];
        // 6 degree rows, 1 inherited cut, then the three new cuts.
        let mut tight_rows = vec![true; 7];
        tight_rows.extend([false, true, false]);
        let relaxation = Relaxation {
            objective: 0.0,
            values: vec![0.0; search.edges.len()],
            tight_rows,
        };

        let kept = search.tight_cuts(&relaxation, 1, cuts.clone());
        assert_eq!(kept, vec![cuts[1].clone()]);
        assert_eq!(search.stats().cuts_dropped, 2);

        let unknown = Relaxation {
            tight_rows: Vec::new(),
            ..relaxation
        };
        assert_eq!(search.tight_cuts(&unknown, 1, cuts.clone()), cuts);
    }

    #[test]
    fn test_cancelled_before_start() {
        let dm = two_clusters();
        let settings = SolverSettings::default();
        let token = CancelToken::new();
        token.cancel();
        let search = Search::new(&dm, &settings, &MinilpSolver, token);
        search.run(2).expect("search");
        assert_eq!(search.stop_reason(), Some(StopReason::Cancelled));
        assert!(search.best_tour().is_none());
        assert_eq!(search.stats().nodes_explored, 0);
    }
}
