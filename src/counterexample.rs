//! Lasso-shaped counterexamples.
//!
//! A [`Counterexample`] is a finite prefix from an initial product state
//! followed by a non-empty cycle returning to the prefix's last state. Every
//! edge keeps the model [`Step`] that produced it, so the violating model run
//! is `prefix_steps()` followed by `cycle_steps()` repeated forever.
//!
//! Violations of a [finite automaton][crate::automaton::AutomatonKind::Finite]
//! are finite: the prefix alone, non-empty, with an empty cycle.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use log::debug;

use crate::automaton::{AutomatonKind, PropertyAutomaton};
use crate::error::ReplayError;
use crate::marks::Marks;
use crate::model::{AtomEvaluator, SemanticRelation, Step};
use crate::product::{ProductExplorer, ProductState, Successor};

/// One product edge of a lasso.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LassoEdge<S, A> {
    pub from: ProductState<S>,
    pub step: Step<S, A>,
    /// Automaton transition index, relative to `from.automaton`.
    pub transition: usize,
    pub to: ProductState<S>,
}

impl<S: Clone, A> LassoEdge<S, A> {
    pub fn new(from: &ProductState<S>, successor: Successor<S, A>) -> Self {
        Self {
            from: from.clone(),
            step: successor.step,
            transition: successor.transition,
            to: successor.target,
        }
    }
}

impl<S: fmt::Debug, A: fmt::Debug> fmt::Display for LassoEdge<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{:?}--> {}", self.from, self.step.action, self.to)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Counterexample<S, A> {
    pub prefix: Vec<LassoEdge<S, A>>,
    pub cycle: Vec<LassoEdge<S, A>>,
}

impl<S, A> Counterexample<S, A> {
    pub fn new(prefix: Vec<LassoEdge<S, A>>, cycle: Vec<LassoEdge<S, A>>) -> Self {
        Self { prefix, cycle }
    }

    /// The initial product state the lasso starts from.
    pub fn start(&self) -> Option<&ProductState<S>> {
        self.prefix.first().or(self.cycle.first()).map(|e| &e.from)
    }

    /// The state the cycle starts and ends in.
    pub fn loop_state(&self) -> Option<&ProductState<S>> {
        self.cycle.first().map(|e| &e.from)
    }

    pub fn prefix_steps(&self) -> impl Iterator<Item = &Step<S, A>> {
        self.prefix.iter().map(|e| &e.step)
    }

    pub fn cycle_steps(&self) -> impl Iterator<Item = &Step<S, A>> {
        self.cycle.iter().map(|e| &e.step)
    }

    /// Total number of edges, prefix and cycle.
    pub fn len(&self) -> usize {
        self.prefix.len() + self.cycle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for a finite violation: a prefix and no cycle.
    pub fn is_finite(&self) -> bool {
        self.cycle.is_empty() && !self.prefix.is_empty()
    }

    /// Union of the acceptance marks along the cycle.
    pub fn cycle_marks(&self, automaton: &PropertyAutomaton) -> Marks {
        let mut marks = Marks::empty();
        for e in &self.cycle {
            marks.union_with(automaton.edge_marks(e.from.automaton, e.transition));
        }
        marks
    }

    /// Checks the lasso against `explorer`: it starts in an initial product
    /// state, every edge is a product successor of the previous one, the cycle
    /// is periodic and visits every acceptance set. For a finite automaton the
    /// cycle must be empty and the last step must complete acceptance.
    pub fn replay<M, E>(&self, explorer: &ProductExplorer<'_, M, E>) -> Result<(), ReplayError>
    where
        M: SemanticRelation<State = S, Action = A>,
        E: AtomEvaluator<S, A> + ?Sized,
        S: Clone + Eq + Hash + fmt::Debug,
        A: Clone + PartialEq + fmt::Debug,
    {
        let automaton = explorer.automaton();
        let finite = automaton.kind() == AutomatonKind::Finite;
        let Some(start) = self.start() else {
            return Err(if finite {
                ReplayError::EmptyPrefix
            } else {
                ReplayError::EmptyCycle
            });
        };
        if finite && !self.cycle.is_empty() {
            return Err(ReplayError::UnexpectedCycle);
        }
        if !explorer.initial_states()?.contains(start) {
            return Err(ReplayError::NotInitial(start.to_string()));
        }

        let mut previous: Option<&ProductState<S>> = None;
        for (index, edge) in self.prefix.iter().chain(&self.cycle).enumerate() {
            if previous.is_some_and(|p| *p != edge.from) {
                return Err(ReplayError::Disconnected { index });
            }
            let mut found = false;
            for successor in explorer.successors(&edge.from) {
                let successor = successor?;
                if successor.transition == edge.transition && successor.step == edge.step && successor.target == edge.to
                {
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(ReplayError::NotASuccessor { index });
            }
            previous = Some(&edge.to);
        }

        if finite {
            return match self.prefix.last() {
                Some(last) if automaton.accepts_after(last.from.automaton, last.transition) => Ok(()),
                _ => Err(ReplayError::NotFinal),
            };
        }
        let (Some(first), Some(last)) = (self.cycle.first(), self.cycle.last()) else {
            return Err(ReplayError::EmptyCycle);
        };
        if last.to != first.from {
            return Err(ReplayError::NotPeriodic);
        }
        let mut missing = Marks::full(automaton.acceptance_sets());
        missing.difference_with(&self.cycle_marks(automaton));
        if !missing.is_empty() {
            return Err(ReplayError::NotAccepting {
                missing: missing.to_string(),
            });
        }
        Ok(())
    }
}

impl<S: fmt::Debug, A: fmt::Debug> fmt::Display for Counterexample<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "prefix ({} steps):", self.prefix.len())?;
        for e in &self.prefix {
            writeln!(f, "  {}", e)?;
        }
        if self.is_finite() {
            return Ok(());
        }
        writeln!(f, "cycle ({} steps):", self.cycle.len())?;
        for e in &self.cycle {
            writeln!(f, "  {}", e)?;
        }
        Ok(())
    }
}

/// Product edges followed by a search, by source state.
pub(crate) type EdgeMap<S, A> = HashMap<ProductState<S>, Vec<LassoEdge<S, A>>>;

/// Breadth-first search in `edges` from `from` for the shortest path ending
/// with an edge satisfying `goal`. Only edges into states accepted by
/// `inside` are followed.
fn find_path<'e, S, A, F, G>(
    edges: &'e EdgeMap<S, A>,
    from: &'e ProductState<S>,
    inside: &F,
    goal: G,
) -> Option<Vec<LassoEdge<S, A>>>
where
    S: Clone + Eq + Hash,
    A: Clone,
    F: Fn(&ProductState<S>) -> bool,
    G: Fn(&LassoEdge<S, A>) -> bool,
{
    let mut parent: HashMap<&'e ProductState<S>, &'e LassoEdge<S, A>> = HashMap::new();
    let mut visited: HashSet<&'e ProductState<S>> = HashSet::from([from]);
    let mut queue: VecDeque<&'e ProductState<S>> = VecDeque::from([from]);

    while let Some(state) = queue.pop_front() {
        for edge in edges.get(state).into_iter().flatten() {
            if !inside(&edge.to) {
                continue;
            }
            if goal(edge) {
                let mut path = vec![edge.clone()];
                let mut cursor = state;
                while let Some(&e) = parent.get(cursor) {
                    path.push(e.clone());
                    cursor = &e.from;
                }
                path.reverse();
                return Some(path);
            }
            if visited.insert(&edge.to) {
                queue.push_back(&edge.to);
                parent.insert(&edge.to, edge);
            }
        }
    }
    None
}

/// Builds a cycle through `root` inside one strongly connected component
/// (given by `inside`) whose edges visit all `sets` acceptance sets.
///
/// Only the already known `edges` are used, so the model is not consulted
/// again. Returns `None` if those edges do not connect `root` to itself
/// through every set.
pub(crate) fn cycle_in_component<S, A, F>(
    edges: &EdgeMap<S, A>,
    automaton: &PropertyAutomaton,
    root: &ProductState<S>,
    inside: F,
    sets: usize,
) -> Option<Vec<LassoEdge<S, A>>>
where
    S: Clone + Eq + Hash + fmt::Debug,
    A: Clone,
    F: Fn(&ProductState<S>) -> bool,
{
    let marks = |e: &LassoEdge<S, A>| automaton.edge_marks(e.from.automaton, e.transition);
    let mut cycle: Vec<LassoEdge<S, A>> = Vec::new();
    let mut collected = Marks::empty();
    let mut current = root.clone();

    while !collected.covers(sets) {
        let hits_missing = |edge: &LassoEdge<S, A>| {
            let m = marks(edge);
            (0..sets).any(|i| m.contains(i) && !collected.contains(i))
        };
        let path = find_path(edges, &current, &inside, hits_missing)?;
        for e in &path {
            collected.union_with(marks(e));
        }
        if let Some(last) = path.last() {
            current = last.to.clone();
        }
        cycle.extend(path);
    }

    if cycle.is_empty() || current != *root {
        cycle.extend(find_path(edges, &current, &inside, |edge| edge.to == *root)?);
    }

    debug!("built {}-step cycle through {} inside its component", cycle.len(), root);
    Some(cycle)
}
