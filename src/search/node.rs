//! Search nodes, edge fixings and the shared cut chain.

use std::sync::Arc;

use log::trace;

use crate::cuts::SubtourCut;
use crate::models::EdgeIndex;
use crate::relaxation::LinearProgram;

/// Direction of a branching decision on one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixing {
    /// Edge forced into the tour (bounds `[1, 1]`).
    In,
    /// Edge forced out of the tour (bounds `[0, 0]`).
    Out,
}

/// A branching decision: `edge` is fixed in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFixing {
    pub edge: usize,
    pub fixing: Fixing,
}

/// Lifecycle of a search node.
///
/// `Created → Relaxed → {Cutting → Relaxed}* → {Pruned | Integral | Branched}`.
/// A node may also be pruned straight from `Created` (infeasible fixings or
/// relaxation) or from `Cutting` (relaxation infeasible once cuts are added).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Created,
    Relaxed,
    Cutting,
    Pruned,
    Integral,
    Branched,
}

impl NodeState {
    /// Returns `true` if `self → next` is a legal transition.
    pub fn can_transition_to(self, next: NodeState) -> bool {
        use NodeState::*;
        matches!(
            (self, next),
            (Created, Relaxed)
                | (Created, Pruned)
                | (Relaxed, Cutting)
                | (Cutting, Relaxed)
                | (Cutting, Pruned)
                | (Relaxed, Pruned)
                | (Relaxed, Integral)
                | (Relaxed, Branched)
        )
    }
}

/// Persistent list of cuts shared between a node and its descendants.
///
/// Each link holds the cuts one node introduced; children point at their
/// parent's link, so siblings share the ancestry without copying it.
#[derive(Debug)]
pub struct CutChain {
    cuts: Vec<SubtourCut>,
    parent: Option<Arc<CutChain>>,
}

impl CutChain {
    /// Appends `cuts` to `parent`. Returns `parent` unchanged if `cuts` is empty.
    pub fn extend(parent: Option<Arc<CutChain>>, cuts: Vec<SubtourCut>) -> Option<Arc<CutChain>> {
        if cuts.is_empty() {
            return parent;
        }
        Some(Arc::new(CutChain { cuts, parent }))
    }

    /// All cuts in the chain, newest link first.
    pub fn iter(&self) -> impl Iterator<Item = &SubtourCut> {
        let mut link = Some(self);
        std::iter::from_fn(move || {
            let current = link?;
            link = current.parent.as_deref();
            Some(current.cuts.iter())
        })
        .flatten()
    }

    /// Total number of cuts in the chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always `false`; empty chains are represented by `None`.
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty() && self.parent.is_none()
    }
}

/// One node of the branch-and-bound tree.
#[derive(Debug)]
pub struct SearchNode {
    pub id: u64,
    pub parent_id: Option<u64>,
    pub depth: usize,
    /// Bound used for frontier ordering: the parent's relaxation until this
    /// node is relaxed, then its own.
    pub bound: f64,
    fixings: Vec<EdgeFixing>,
    cuts: Option<Arc<CutChain>>,
    state: NodeState,
}

impl SearchNode {
    /// The root: no fixings, no cuts.
    pub fn root() -> Self {
        Self {
            id: 0,
            parent_id: None,
            depth: 0,
            bound: f64::NEG_INFINITY,
            fixings: Vec::new(),
            cuts: None,
            state: NodeState::Created,
        }
    }

    /// A child inheriting this node's fixings plus `fixing`, with `cuts` as its chain.
    pub fn child(&self, id: u64, fixing: EdgeFixing, cuts: Option<Arc<CutChain>>) -> Self {
        let mut fixings = Vec::with_capacity(self.fixings.len() + 1);
        fixings.extend_from_slice(&self.fixings);
        fixings.push(fixing);
        Self {
            id,
            parent_id: Some(self.id),
            depth: self.depth + 1,
            bound: self.bound,
            fixings,
            cuts,
            state: NodeState::Created,
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn fixings(&self) -> &[EdgeFixing] {
        &self.fixings
    }

    pub fn cuts(&self) -> Option<&Arc<CutChain>> {
        self.cuts.as_ref()
    }

    /// Number of inherited cuts.
    pub fn num_cuts(&self) -> usize {
        self.cuts.as_ref().map_or(0, |c| c.len())
    }

    /// Moves to `next`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds on an illegal transition.
    pub fn advance(&mut self, next: NodeState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal node transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!("node: id={} {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    /// Per-edge flag: `true` if the edge carries a fixing.
    pub fn fixed_mask(&self, num_edges: usize) -> Vec<bool> {
        let mut mask = vec![false; num_edges];
        for f in &self.fixings {
            mask[f.edge] = true;
        }
        mask
    }

    /// Checks that every city can still reach degree 2.
    ///
    /// Fails if a city has more than two forced-in edges, or fewer than two
    /// edges that are not forced out.
    pub fn degree_feasible(&self, edges: &EdgeIndex) -> bool {
        let n = edges.num_cities();
        let mut forced_in = vec![0usize; n];
        let mut forced_out = vec![0usize; n];
        for f in &self.fixings {
            let (i, j) = edges.endpoints(f.edge);
            let counter = match f.fixing {
                Fixing::In => &mut forced_in,
                Fixing::Out => &mut forced_out,
            };
            counter[i] += 1;
            counter[j] += 1;
        }
        (0..n).all(|c| forced_in[c] <= 2 && (n - 1).saturating_sub(forced_out[c]) >= 2)
    }

    /// Narrows variable bounds in `lp` according to the fixings.
    pub fn apply_fixings(&self, lp: &mut LinearProgram) {
        for f in &self.fixings {
            match f.fixing {
                Fixing::In => lp.set_bounds(f.edge, 1.0, 1.0),
                Fixing::Out => lp.set_bounds(f.edge, 0.0, 0.0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cut(members: &[usize], n: usize) -> SubtourCut {
        SubtourCut::new(members, n).expect("valid cut")
    }

    #[test]
    fn test_transitions() {
        use NodeState::*;
        assert!(Created.can_transition_to(Relaxed));
        assert!(Created.can_transition_to(Pruned));
        assert!(Relaxed.can_transition_to(Cutting));
        assert!(Cutting.can_transition_to(Relaxed));
        assert!(!Cutting.can_transition_to(Branched));
        assert!(!Created.can_transition_to(Integral));
        assert!(!Pruned.can_transition_to(Relaxed));
        assert!(!Branched.can_transition_to(Relaxed));
        assert!(!Integral.can_transition_to(Pruned));
    }

    #[test]
    fn test_cut_chain_sharing() {
        let root = CutChain::extend(None, vec![cut(&[1, 2], 6)]);
        let left = CutChain::extend(root.clone(), vec![cut(&[3, 4], 6), cut(&[4, 5], 6)]);
        let right = CutChain::extend(root.clone(), Vec::new());

        assert_eq!(left.as_ref().map(|c| c.len()), Some(3));
        assert_eq!(right.as_ref().map(|c| c.len()), Some(1));
        assert!(Arc::ptr_eq(
            root.as_ref().expect("root chain"),
            right.as_ref().expect("right chain")
        ));

        let newest: Vec<&[usize]> = left
            .as_ref()
            .expect("left chain")
            .iter()
            .map(|c| c.members())
            .collect();
        assert_eq!(newest, vec![&[3, 4][..], &[4, 5][..], &[1, 2][..]]);
    }

    #[test]
    fn test_child_inherits_fixings() {
        let root = SearchNode::root();
        let a = root.child(1, EdgeFixing { edge: 3, fixing: Fixing::In }, None);
        let b = a.child(2, EdgeFixing { edge: 5, fixing: Fixing::Out }, None);
        assert_eq!(b.depth, 2);
        assert_eq!(b.parent_id, Some(1));
        assert_eq!(b.fixings().len(), 2);
        let mask = b.fixed_mask(6);
        assert_eq!(mask, vec![false, false, false, true, false, true]);
    }

    #[test]
    fn test_degree_feasibility() {
        let edges = EdgeIndex::new(5);
        let root = SearchNode::root();
        assert!(root.degree_feasible(&edges));

        // Three forced-in edges at city 0.
        let mut node = root.child(1, EdgeFixing { edge: edges.index(0, 1), fixing: Fixing::In }, None);
        node = node.child(2, EdgeFixing { edge: edges.index(0, 2), fixing: Fixing::In }, None);
        assert!(node.degree_feasible(&edges));
        node = node.child(3, EdgeFixing { edge: edges.index(0, 3), fixing: Fixing::In }, None);
        assert!(!node.degree_feasible(&edges));

        // City 4 keeps only one available edge.
        let mut node = root.child(4, EdgeFixing { edge: edges.index(4, 0), fixing: Fixing::Out }, None);
        node = node.child(5, EdgeFixing { edge: edges.index(4, 1), fixing: Fixing::Out }, None);
        assert!(node.degree_feasible(&edges));
        node = node.child(6, EdgeFixing { edge: edges.index(4, 2), fixing: Fixing::Out }, None);
        assert!(!node.degree_feasible(&edges));
    }

    #[test]
    fn test_apply_fixings() {
        let edges = EdgeIndex::new(4);
        let mut lp = LinearProgram::new(vec![1.0; edges.len()]);
        let node = SearchNode::root()
            .child(1, EdgeFixing { edge: 0, fixing: Fixing::In }, None)
            .child(2, EdgeFixing { edge: 2, fixing: Fixing::Out }, None);
        node.apply_fixings(&mut lp);
        assert_eq!(lp.bounds(0), (1.0, 1.0));
        assert_eq!(lp.bounds(1), (0.0, 1.0));
        assert_eq!(lp.bounds(2), (0.0, 0.0));
    }
}
