//! Search stack plumbing shared by the emptiness algorithms.

use std::collections::HashMap;

use log::trace;

use crate::counterexample::{Counterexample, EdgeMap, LassoEdge};
use crate::error::ModelEvaluationError;
use crate::model::{AtomEvaluator, SemanticRelation};
use crate::product::{ProductExplorer, ProductState, Successor, Successors};

use super::{CheckerConfig, Statistics, TraversalStrategy};

pub(crate) type PState<M> = ProductState<<M as SemanticRelation>::State>;
pub(crate) type Edge<M> = LassoEdge<<M as SemanticRelation>::State, <M as SemanticRelation>::Action>;
pub(crate) type Lasso<M> = Counterexample<<M as SemanticRelation>::State, <M as SemanticRelation>::Action>;

/// Where a search node resumes its successor enumeration.
pub(crate) enum Cursor<'a, M: SemanticRelation + 'a, E: ?Sized> {
    Lazy(Successors<'a, M, E>),
    /// All successors, pulled on the first visit.
    Buffered(std::vec::IntoIter<Successor<M::State, M::Action>>),
}

impl<'a, M, E> Cursor<'a, M, E>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    pub(crate) fn open(
        explorer: &ProductExplorer<'a, M, E>,
        state: &PState<M>,
        traversal: TraversalStrategy,
    ) -> Result<Self, ModelEvaluationError> {
        let successors = explorer.successors(state);
        Ok(match traversal {
            TraversalStrategy::Lazy => Cursor::Lazy(successors),
            TraversalStrategy::Buffered => {
                let all: Vec<_> = successors.collect::<Result<_, _>>()?;
                Cursor::Buffered(all.into_iter())
            }
        })
    }

    pub(crate) fn next(&mut self) -> Option<Result<Successor<M::State, M::Action>, ModelEvaluationError>> {
        match self {
            Cursor::Lazy(successors) => successors.next(),
            Cursor::Buffered(successors) => successors.next().map(Ok),
        }
    }
}

/// A search node.
pub(crate) struct Frame<'a, M: SemanticRelation + 'a, E: ?Sized> {
    pub(crate) state: PState<M>,
    /// The edge this node was pushed through; `None` for an initial state.
    pub(crate) via: Option<Edge<M>>,
    pub(crate) cursor: Cursor<'a, M, E>,
    /// Some successor of this node (or of a node below it) was not followed
    /// because of the depth bound.
    pub(crate) truncated: bool,
}

/// The edges leading through `frames`, bottom to top.
pub(crate) fn path<M, E>(frames: &[Frame<'_, M, E>]) -> Vec<Edge<M>>
where
    M: SemanticRelation,
    E: ?Sized,
{
    frames.iter().filter_map(|f| f.via.clone()).collect()
}

/// State shared by every algorithm: the inputs, the limits and the counters
/// of one run.
pub(crate) struct Search<'a, M: SemanticRelation, E: ?Sized> {
    pub(crate) explorer: ProductExplorer<'a, M, E>,
    pub(crate) traversal: TraversalStrategy,
    pub(crate) depth_bound: Option<usize>,
    pub(crate) sets: usize,
    pub(crate) stats: Statistics,
    /// Exploration was cut short by the depth bound at least once.
    pub(crate) curtailed: bool,
    /// With a depth bound, the successors enumerated from every opened state.
    pub(crate) explored: Option<EdgeMap<M::State, M::Action>>,
}

impl<'a, M, E> Search<'a, M, E>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    pub(crate) fn new(explorer: ProductExplorer<'a, M, E>, config: &CheckerConfig) -> Self {
        Self {
            explorer,
            traversal: config.traversal,
            depth_bound: config.depth_bound,
            sets: explorer.automaton().acceptance_sets(),
            stats: Statistics::default(),
            curtailed: false,
            explored: config.depth_bound.map(|_| HashMap::new()),
        }
    }

    /// Returns true if a node may be pushed onto a stack holding `depth` nodes.
    pub(crate) fn admits_push(&self, depth: usize) -> bool {
        self.depth_bound.map_or(true, |bound| depth < bound)
    }

    /// Records a push that the depth bound did not admit.
    pub(crate) fn curtail(&mut self, state: &PState<M>) {
        trace!("depth bound reached, not entering {}", state);
        self.curtailed = true;
    }

    /// Opens a frame for a newly discovered state.
    pub(crate) fn frame(&mut self, state: PState<M>, via: Option<Edge<M>>) -> Result<Frame<'a, M, E>, ModelEvaluationError> {
        let cursor = Cursor::open(&self.explorer, &state, self.traversal)?;
        self.stats.states += 1;
        if let Some(explored) = &mut self.explored {
            explored.insert(state.clone(), Vec::new());
        }
        Ok(Frame {
            state,
            via,
            cursor,
            truncated: false,
        })
    }

    /// Counts a successor taken from the cursor of `from`.
    pub(crate) fn examined(&mut self, from: &PState<M>, successor: &Successor<M::State, M::Action>) {
        self.stats.transitions += 1;
        if let Some(edges) = self.explored.as_mut().and_then(|explored| explored.get_mut(from)) {
            edges.push(LassoEdge::new(from, successor.clone()));
        }
    }

    /// Updates the depth statistics after a push.
    pub(crate) fn pushed(&mut self, state: &PState<M>, depth: usize) {
        trace!("push {} at depth {}", state, depth);
        self.stats.max_depth = self.stats.max_depth.max(depth);
    }
}
