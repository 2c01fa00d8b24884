//! Reachability for finite automata.
//!
//! A violation of a finite automaton is a path from an initial product state
//! whose last step completes acceptance. The product is walked breadth-first,
//! so the first witness found is a shortest one. Under a depth bound only the
//! states closer than the bound are expanded, and the verdict depends on
//! nothing else.
//!
//! Successors are pulled one at a time and the walk stops at the first
//! violating step.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace};

use crate::counterexample::{Counterexample, LassoEdge};
use crate::error::ModelEvaluationError;
use crate::model::{AtomEvaluator, SemanticRelation};

use super::stack::{Edge, Lasso, PState, Search};

pub(super) fn search<'a, M, E>(
    search: &mut Search<'a, M, E>,
    initial: &[PState<M>],
) -> Result<Option<Lasso<M>>, ModelEvaluationError>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    let automaton = search.explorer.automaton();
    let mut parent: HashMap<PState<M>, Option<Edge<M>>> = HashMap::new();
    let mut queue: VecDeque<(PState<M>, usize)> = VecDeque::new();
    for state in initial {
        if parent.contains_key(state) {
            continue;
        }
        if !search.admits_push(0) {
            search.curtail(state);
            continue;
        }
        parent.insert(state.clone(), None);
        queue.push_back((state.clone(), 0));
    }

    while let Some((state, distance)) = queue.pop_front() {
        search.stats.states += 1;
        search.pushed(&state, distance + 1);
        for successor in search.explorer.successors(&state) {
            let successor = successor?;
            search.stats.transitions += 1;
            if automaton.accepts_after(state.automaton, successor.transition) {
                let last = LassoEdge::new(&state, successor);
                debug!("{} completes a finite violation at depth {}", last, distance + 1);
                let mut prefix = vec![last];
                let mut cursor = &state;
                while let Some(Some(edge)) = parent.get(cursor) {
                    prefix.push(edge.clone());
                    cursor = &edge.from;
                }
                prefix.reverse();
                return Ok(Some(Counterexample::new(prefix, Vec::new())));
            }
            if parent.contains_key(&successor.target) {
                continue;
            }
            if search.admits_push(distance + 1) {
                trace!("reached {} at distance {}", successor.target, distance + 1);
                let edge = LassoEdge::new(&state, successor);
                queue.push_back((edge.to.clone(), distance + 1));
                parent.insert(edge.to.clone(), Some(edge));
            } else {
                search.curtail(&successor.target);
            }
        }
    }
    Ok(None)
}
