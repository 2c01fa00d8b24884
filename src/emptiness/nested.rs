//! Nested depth-first search.
//!
//! The blue search explores the product, keeping the states on its stack
//! cyan. An accepting edge into a cyan state closes an accepting cycle at
//! once. Otherwise, after the target of an accepting edge has been fully
//! explored, a red search starts from it looking for a path back to a cyan
//! state. Red searches only walk through blue states, and states they reach
//! are never searched again.
//!
//! A node truncated by the depth bound is forgotten when popped instead of
//! turning blue, and no red search starts from it.
//!
//! With one acceptance set an edge is accepting when it carries the set's
//! mark; with zero sets every edge is.

use std::collections::HashMap;

use log::{debug, trace};

use crate::counterexample::{Counterexample, LassoEdge};
use crate::error::ModelEvaluationError;
use crate::model::{AtomEvaluator, SemanticRelation};

use super::stack::{path, Cursor, Edge, Frame, Lasso, PState, Search};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Color {
    /// On the blue stack, at the given position.
    Cyan(usize),
    Blue,
    Red,
}

struct Nested<'s, 'a, M: SemanticRelation + 'a, E: ?Sized> {
    search: &'s mut Search<'a, M, E>,
    colors: HashMap<PState<M>, Color>,
    blue: Vec<Frame<'a, M, E>>,
}

pub(super) fn search<'a, M, E>(
    search: &mut Search<'a, M, E>,
    initial: &[PState<M>],
) -> Result<Option<Lasso<M>>, ModelEvaluationError>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    let mut nested = Nested {
        search,
        colors: HashMap::new(),
        blue: Vec::new(),
    };
    for state in initial {
        if let Some(lasso) = nested.run_from(state)? {
            return Ok(Some(lasso));
        }
    }
    Ok(None)
}

impl<'a, M, E> Nested<'_, 'a, M, E>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    fn is_accepting(&self, edge_from: &PState<M>, transition: usize) -> bool {
        self.search
            .explorer
            .edge_marks(edge_from, transition)
            .covers(self.search.sets)
    }

    fn run_from(&mut self, initial: &PState<M>) -> Result<Option<Lasso<M>>, ModelEvaluationError> {
        if self.colors.contains_key(initial) {
            return Ok(None);
        }
        if !self.search.admits_push(0) {
            self.search.curtail(initial);
            return Ok(None);
        }
        self.push_blue(initial.clone(), None)?;

        loop {
            let depth = self.blue.len();
            let Some(top) = self.blue.last_mut() else {
                return Ok(None);
            };
            let Some(next) = top.cursor.next() else {
                if let Some(frame) = self.blue.pop() {
                    if let Some(lasso) = self.retire(frame)? {
                        return Ok(Some(lasso));
                    }
                }
                continue;
            };
            let successor = next?;
            self.search.examined(&top.state, &successor);
            let accepting = self
                .search
                .explorer
                .edge_marks(&top.state, successor.transition)
                .covers(self.search.sets);

            match self.colors.get(&successor.target).copied() {
                Some(Color::Cyan(j)) => {
                    if accepting {
                        let closing = LassoEdge::new(&top.state, successor);
                        debug!("accepting edge {} closes a cycle on the blue stack", closing);
                        return Ok(Some(self.stack_cycle(j, closing)));
                    }
                }
                Some(Color::Blue) => {
                    if accepting {
                        let seed = LassoEdge::new(&top.state, successor);
                        if let Some(lasso) = self.red(seed)? {
                            return Ok(Some(lasso));
                        }
                    }
                }
                Some(Color::Red) => {}
                None => {
                    if self.search.admits_push(depth) {
                        let edge = LassoEdge::new(&top.state, successor);
                        self.push_blue(edge.to.clone(), Some(edge))?;
                    } else {
                        top.truncated = true;
                        self.search.curtail(&successor.target);
                    }
                }
            }
        }
    }

    fn push_blue(&mut self, state: PState<M>, via: Option<Edge<M>>) -> Result<(), ModelEvaluationError> {
        let frame = self.search.frame(state.clone(), via)?;
        self.search.pushed(&state, self.blue.len() + 1);
        self.colors.insert(state, Color::Cyan(self.blue.len()));
        self.blue.push(frame);
        Ok(())
    }

    /// Pops a blue node. If it was entered through an accepting edge, the red
    /// search from it runs now.
    fn retire(&mut self, frame: Frame<'a, M, E>) -> Result<Option<Lasso<M>>, ModelEvaluationError> {
        trace!("pop {}", frame.state);
        if frame.truncated {
            // Not fully explored: forget it, and its parent is incomplete too.
            self.colors.remove(&frame.state);
            if let Some(parent) = self.blue.last_mut() {
                parent.truncated = true;
            }
            return Ok(None);
        }
        self.colors.insert(frame.state, Color::Blue);
        match frame.via {
            Some(via) if self.is_accepting(&via.from, via.transition) => self.red(via),
            _ => Ok(None),
        }
    }

    /// Red search from the target of the accepting edge `seed`, whose source
    /// is on top of the blue stack.
    fn red(&mut self, seed: Edge<M>) -> Result<Option<Lasso<M>>, ModelEvaluationError> {
        if self.colors.get(&seed.to) == Some(&Color::Red) {
            return Ok(None);
        }
        trace!("red search from {}", seed.to);
        self.colors.insert(seed.to.clone(), Color::Red);
        let start = Frame {
            state: seed.to.clone(),
            via: None,
            cursor: Cursor::open(&self.search.explorer, &seed.to, self.search.traversal)?,
            truncated: false,
        };
        let mut red: Vec<Frame<'a, M, E>> = vec![start];

        loop {
            let depth = self.blue.len() + red.len();
            let Some(top) = red.last_mut() else {
                return Ok(None);
            };
            let Some(next) = top.cursor.next() else {
                red.pop();
                continue;
            };
            let successor = next?;
            self.search.stats.transitions += 1;

            match self.colors.get(&successor.target).copied() {
                Some(Color::Cyan(j)) => {
                    let closing = LassoEdge::new(&top.state, successor);
                    debug!("red search from {} reached the blue stack at {}", seed.to, closing.to);
                    return Ok(Some(self.red_cycle(j, seed, &red, closing)));
                }
                // `None`: not finished by the blue search.
                Some(Color::Red) | None => {}
                Some(Color::Blue) => {
                    if self.search.admits_push(depth) {
                        let edge = LassoEdge::new(&top.state, successor);
                        let cursor = Cursor::open(&self.search.explorer, &edge.to, self.search.traversal)?;
                        self.colors.insert(edge.to.clone(), Color::Red);
                        red.push(Frame {
                            state: edge.to.clone(),
                            via: Some(edge),
                            cursor,
                            truncated: false,
                        });
                    } else {
                        self.search.curtail(&successor.target);
                    }
                }
            }
        }
    }

    /// Lasso for an accepting edge closing a cycle on the blue stack at
    /// position `j`.
    fn stack_cycle(&self, j: usize, closing: Edge<M>) -> Lasso<M> {
        let prefix = path(&self.blue[..=j]);
        let mut cycle = path(&self.blue[j + 1..]);
        cycle.push(closing);
        Counterexample::new(prefix, cycle)
    }

    /// Lasso for a red search: blue stack from the cyan state at `j` up to the
    /// seed's source, the seed, the red path, then the edge back to the cyan
    /// state.
    fn red_cycle(&self, j: usize, seed: Edge<M>, red: &[Frame<'a, M, E>], closing: Edge<M>) -> Lasso<M> {
        let prefix = path(&self.blue[..=j]);
        let mut cycle = path(&self.blue[j + 1..]);
        cycle.push(seed);
        cycle.extend(path(red));
        cycle.push(closing);
        Counterexample::new(prefix, cycle)
    }
}
