//! Completion of a bounded search.
//!
//! Under a depth bound, which states a depth-first search gets to depends on
//! the order successors come in: a state first met on a long path is cut off
//! even though a shorter path to it exists. When such a search ends without
//! finding an accepting cycle, this pass takes over from the edges it
//! recorded. It walks the product breadth-first from the initial states and
//! expands every state closer than the bound, asking the model only for the
//! states the depth-first search never opened. The strongly connected
//! components of that part of the product are then checked for an accepting
//! one.
//!
//! A bounded run thus reports SAT when the product restricted to the states
//! within the bound has an accepting cycle, whichever algorithm ran first. A
//! larger bound only adds states, so it never loses a counterexample.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};

use crate::counterexample::{cycle_in_component, Counterexample, LassoEdge};
use crate::error::ModelEvaluationError;
use crate::marks::Marks;
use crate::model::{AtomEvaluator, SemanticRelation};

use super::stack::{Edge, Lasso, PState, Search};

pub(super) fn search<'a, M, E>(
    search: &mut Search<'a, M, E>,
    initial: &[PState<M>],
    bound: usize,
) -> Result<Option<Lasso<M>>, ModelEvaluationError>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    let mut edges = search.explored.take().unwrap_or_default();

    // States within the bound, in breadth-first order, with the edge they
    // were first reached by.
    let mut order: Vec<PState<M>> = Vec::new();
    let mut parent: HashMap<PState<M>, Option<Edge<M>>> = HashMap::new();
    let mut queue: VecDeque<(PState<M>, usize)> = VecDeque::new();
    if bound > 0 {
        for state in initial {
            if !parent.contains_key(state) {
                parent.insert(state.clone(), None);
                queue.push_back((state.clone(), 0));
            }
        }
    }

    while let Some((state, distance)) = queue.pop_front() {
        if !edges.contains_key(&state) {
            trace!("expanding {} at distance {}", state, distance);
            let mut out = Vec::new();
            for successor in search.explorer.successors(&state) {
                out.push(LassoEdge::new(&state, successor?));
            }
            search.stats.states += 1;
            search.stats.transitions += out.len();
            edges.insert(state.clone(), out);
        }
        if distance + 1 < bound {
            for edge in edges.get(&state).into_iter().flatten() {
                if !parent.contains_key(&edge.to) {
                    parent.insert(edge.to.clone(), Some(edge.clone()));
                    queue.push_back((edge.to.clone(), distance + 1));
                }
            }
        }
        order.push(state);
    }

    let index: HashMap<&PState<M>, usize> = order.iter().enumerate().map(|(i, s)| (s, i)).collect();
    let successors: Vec<Vec<usize>> = order
        .iter()
        .map(|s| {
            edges
                .get(s)
                .into_iter()
                .flatten()
                .filter_map(|e| index.get(&e.to).copied())
                .collect()
        })
        .collect();

    let automaton = search.explorer.automaton();
    let sets = search.sets;
    let mut best: Option<(usize, HashSet<usize>)> = None;
    for component in components(&successors) {
        let members: HashSet<usize> = component.iter().copied().collect();
        let mut marks = Marks::empty();
        let mut cyclic = false;
        for &u in &component {
            for e in edges.get(&order[u]).into_iter().flatten() {
                if index.get(&e.to).is_some_and(|v| members.contains(v)) {
                    cyclic = true;
                    marks.union_with(automaton.edge_marks(e.from.automaton, e.transition));
                }
            }
        }
        if !cyclic || !marks.covers(sets) {
            continue;
        }
        // The component closest to an initial state, for a short prefix.
        let entry = component.iter().copied().min().unwrap_or_default();
        if best.as_ref().map_or(true, |(b, _)| entry < *b) {
            best = Some((entry, members));
        }
    }
    let Some((entry, members)) = best else {
        debug!("no accepting cycle among the {} states within depth {}", order.len(), bound);
        return Ok(None);
    };

    let root = &order[entry];
    let mut prefix = Vec::new();
    let mut cursor = root;
    while let Some(Some(edge)) = parent.get(cursor) {
        prefix.push(edge.clone());
        cursor = &edge.from;
    }
    prefix.reverse();

    let inside = |s: &PState<M>| index.get(s).is_some_and(|i| members.contains(i));
    let Some(cycle) = cycle_in_component(&edges, automaton, root, inside, sets) else {
        return Ok(None);
    };
    debug!("accepting component within depth {} entered at {}", bound, root);
    Ok(Some(Counterexample::new(prefix, cycle)))
}

/// Strongly connected components of the graph given by `successors`, by an
/// iterative Tarjan search.
fn components(successors: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = successors.len();
    let mut number: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut result = Vec::new();
    let mut counter = 0;

    for start in 0..n {
        if number[start].is_some() {
            continue;
        }
        number[start] = Some(counter);
        low[start] = counter;
        counter += 1;
        stack.push(start);
        on_stack[start] = true;
        // Node and the position of its next successor.
        let mut work: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(&(v, i)) = work.last() {
            if let Some(&w) = successors[v].get(i) {
                if let Some(top) = work.last_mut() {
                    top.1 += 1;
                }
                match number[w] {
                    None => {
                        number[w] = Some(counter);
                        low[w] = counter;
                        counter += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        work.push((w, 0));
                    }
                    Some(k) if on_stack[w] => low[v] = low[v].min(k),
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(&(u, _)) = work.last() {
                low[u] = low[u].min(low[v]);
            }
            if number[v] == Some(low[v]) {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                result.push(component);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn sorted(mut components: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
        for c in &mut components {
            c.sort_unstable();
        }
        components.sort();
        components
    }

    #[test]
    fn test_components() {
        // 0 -> 1 -> 2 -> 0, 2 -> 3, 3 -> 3, 4 -> 0
        let graph = vec![vec![1], vec![2], vec![0, 3], vec![3], vec![0]];
        assert_eq!(sorted(components(&graph)), vec![vec![0, 1, 2], vec![3], vec![4]]);
    }

    #[test]
    fn test_components_of_a_chain() {
        let graph = vec![vec![1], vec![2], vec![]];
        assert_eq!(sorted(components(&graph)), vec![vec![0], vec![1], vec![2]]);
        assert!(components(&[]).is_empty());
    }
}
