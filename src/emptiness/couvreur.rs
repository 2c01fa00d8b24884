//! SCC-based emptiness check.
//!
//! A single depth-first search over the product, tracking the strongly
//! connected components still open on a stack of roots. Every state gets a
//! `live` index when it is first pushed. An edge to a live state closes a
//! cycle: all roots above the target are merged into one component and their
//! acceptance marks are united. When a root's node is popped its whole
//! component is finished and its states become dead.
//!
//! Components containing a node truncated by the depth bound are not
//! finished: their states are forgotten instead, so that another path may
//! reach them again.
//!
//! The edges followed between live states are kept until their component is
//! finished. A counterexample is built from those edges only.

use std::collections::HashMap;

use log::{debug, trace};

use crate::counterexample::{cycle_in_component, Counterexample, EdgeMap, LassoEdge};
use crate::error::ModelEvaluationError;
use crate::marks::Marks;
use crate::model::{AtomEvaluator, SemanticRelation};

use super::stack::{path, Edge, Frame, Lasso, PState, Search};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Status {
    /// Still in an open component, with its index in the live stack.
    Live(usize),
    Dead,
}

#[derive(Debug)]
struct Root {
    /// Live index of the component's first state.
    index: usize,
    /// Position of that state's frame on the search stack.
    frame: usize,
    /// Marks of the edges inside the component.
    acc: Marks,
    /// Marks of the edge entering the component.
    entry: Marks,
    truncated: bool,
}

struct Couvreur<'s, 'a, M: SemanticRelation + 'a, E: ?Sized> {
    search: &'s mut Search<'a, M, E>,
    status: HashMap<PState<M>, Status>,
    live: Vec<PState<M>>,
    roots: Vec<Root>,
    dfs: Vec<Frame<'a, M, E>>,
    /// Edges followed from live states into live states.
    edges: EdgeMap<M::State, M::Action>,
}

pub(super) fn search<'a, M, E>(
    search: &mut Search<'a, M, E>,
    initial: &[PState<M>],
) -> Result<Option<Lasso<M>>, ModelEvaluationError>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    let mut couvreur = Couvreur {
        search,
        status: HashMap::new(),
        live: Vec::new(),
        roots: Vec::new(),
        dfs: Vec::new(),
        edges: HashMap::new(),
    };
    for state in initial {
        if let Some(lasso) = couvreur.run_from(state)? {
            return Ok(Some(lasso));
        }
    }
    Ok(None)
}

impl<'a, M, E> Couvreur<'_, 'a, M, E>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    fn run_from(&mut self, initial: &PState<M>) -> Result<Option<Lasso<M>>, ModelEvaluationError> {
        if self.status.contains_key(initial) {
            return Ok(None);
        }
        if !self.search.admits_push(0) {
            self.search.curtail(initial);
            return Ok(None);
        }
        self.push(initial.clone(), None, Marks::empty())?;

        loop {
            let depth = self.dfs.len();
            let Some(top) = self.dfs.last_mut() else {
                return Ok(None);
            };
            let Some(next) = top.cursor.next() else {
                if let Some(frame) = self.dfs.pop() {
                    self.retire(frame);
                }
                continue;
            };
            let successor = next?;
            self.search.examined(&top.state, &successor);
            let marks = self.search.explorer.edge_marks(&top.state, successor.transition);

            match self.status.get(&successor.target).copied() {
                Some(Status::Dead) => {}
                None => {
                    if self.search.admits_push(depth) {
                        let edge = LassoEdge::new(&top.state, successor);
                        self.push(edge.to.clone(), Some(edge), marks.clone())?;
                    } else {
                        top.truncated = true;
                        self.search.curtail(&successor.target);
                        if let Some(root) = self.roots.last_mut() {
                            root.truncated = true;
                        }
                    }
                }
                Some(Status::Live(target)) => {
                    let closing = LassoEdge::new(&top.state, successor);
                    self.edges.entry(closing.from.clone()).or_default().push(closing.clone());
                    if let Some((index, frame)) = self.merge(target, marks) {
                        match self.counterexample(index, frame, closing) {
                            Some(lasso) => return Ok(Some(lasso)),
                            None => debug!("no cycle through the accepting component rooted at {}", index),
                        }
                    }
                }
            }
        }
    }

    fn push(&mut self, state: PState<M>, via: Option<Edge<M>>, entry: Marks) -> Result<(), ModelEvaluationError> {
        if let Some(edge) = &via {
            self.edges.entry(edge.from.clone()).or_default().push(edge.clone());
        }
        let frame = self.search.frame(state.clone(), via)?;
        self.search.pushed(&state, self.dfs.len() + 1);
        let index = self.live.len();
        self.status.insert(state.clone(), Status::Live(index));
        self.live.push(state);
        self.roots.push(Root {
            index,
            frame: self.dfs.len(),
            acc: Marks::empty(),
            entry,
            truncated: false,
        });
        self.dfs.push(frame);
        Ok(())
    }

    /// Merges every component above live index `target` into the one
    /// containing it, adding the marks of the closing edge. Returns the live
    /// index and the stack position of the merged component's root if it now
    /// covers every acceptance set.
    fn merge(&mut self, target: usize, closing: &Marks) -> Option<(usize, usize)> {
        let mut acc = closing.clone();
        let mut truncated = false;
        while self.roots.last().is_some_and(|r| r.index > target) {
            if let Some(root) = self.roots.pop() {
                acc.union_with(&root.acc);
                acc.union_with(&root.entry);
                truncated |= root.truncated;
            }
        }
        let root = self.roots.last_mut()?;
        root.acc.union_with(&acc);
        root.truncated |= truncated;
        trace!("merged component rooted at {}: marks {}", root.index, root.acc);
        if root.acc.covers(self.search.sets) {
            debug!(
                "accepting component rooted at {} found at depth {}",
                self.live[root.index],
                self.dfs.len()
            );
            Some((root.index, root.frame))
        } else {
            None
        }
    }

    /// Pops a node whose successors are exhausted.
    fn retire(&mut self, frame: Frame<'a, M, E>) {
        trace!("pop {}", frame.state);
        let Some(Status::Live(index)) = self.status.get(&frame.state).copied() else {
            return;
        };
        if self.roots.last().map_or(true, |r| r.index != index) {
            return;
        }
        let Some(root) = self.roots.pop() else {
            return;
        };
        let component = self.live.split_off(root.index);
        for state in &component {
            self.edges.remove(state);
        }
        if root.truncated {
            trace!("forgetting truncated component of {} states", component.len());
            for state in component {
                self.status.remove(&state);
            }
            if let Some(parent) = self.roots.last_mut() {
                parent.truncated = true;
            }
        } else {
            for state in component {
                self.status.insert(state, Status::Dead);
            }
        }
    }

    /// Builds the lasso once the component rooted at live index `root`, on
    /// the search stack at `frame`, was found accepting while following
    /// `closing`.
    fn counterexample(&self, root: usize, frame: usize, closing: Edge<M>) -> Option<Lasso<M>> {
        let explorer = self.search.explorer;
        let sets = self.search.sets;

        // The cycle closed along the search stack, if it is accepting on its own.
        if let Some(j) = self.dfs.iter().position(|f| f.state == closing.to) {
            let mut marks = explorer.edge_marks(&closing.from, closing.transition).clone();
            for e in self.dfs[j + 1..].iter().filter_map(|f| f.via.as_ref()) {
                marks.union_with(explorer.edge_marks(&e.from, e.transition));
            }
            if marks.covers(sets) {
                let prefix = path(&self.dfs[..=j]);
                let mut cycle = path(&self.dfs[j + 1..]);
                cycle.push(closing);
                return Some(Counterexample::new(prefix, cycle));
            }
        }

        // Otherwise go round the component from its root.
        let root_state = &self.dfs[frame].state;
        let prefix = path(&self.dfs[..=frame]);
        let status = &self.status;
        let inside = |s: &PState<M>| matches!(status.get(s), Some(Status::Live(i)) if *i >= root);
        let cycle = cycle_in_component(&self.edges, explorer.automaton(), root_state, inside, sets)?;
        Some(Counterexample::new(prefix, cycle))
    }
}
