//! The synchronous product of a model and a property automaton.
//!
//! A product edge `(s, q) -> (s', q')` exists for every model step
//! `s --a--> s'` and every transition `q -> q'` enabled by that step. Nothing
//! is materialized: [`ProductExplorer::successors`] pulls model steps one at a
//! time, only when the previous step's product edges have been consumed.

use std::fmt;

use crate::automaton::PropertyAutomaton;
use crate::error::{ModelError, ModelEvaluationError};
use crate::marks::Marks;
use crate::model::{AtomEvaluator, SemanticRelation, Step};
use crate::types::{AtomId, StateId};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ProductState<S> {
    pub model: S,
    pub automaton: StateId,
}

impl<S> ProductState<S> {
    pub fn new(model: S, automaton: StateId) -> Self {
        Self { model, automaton }
    }
}

impl<S: fmt::Debug> fmt::Display for ProductState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.model, self.automaton)
    }
}

/// One product edge, keeping the model step that produced it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Successor<S, A> {
    pub step: Step<S, A>,
    /// Index of the automaton transition taken, see [`PropertyAutomaton::transition`].
    pub transition: usize,
    pub target: ProductState<S>,
}

/// A read-only view over a model, an atom evaluator and a compiled property.
///
/// The explorer holds only shared references, so it is `Copy` and any number
/// of checks may run over the same inputs at once.
pub struct ProductExplorer<'a, M, E: ?Sized> {
    model: &'a M,
    evaluator: &'a E,
    automaton: &'a PropertyAutomaton,
}

impl<M, E: ?Sized> Clone for ProductExplorer<'_, M, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, E: ?Sized> Copy for ProductExplorer<'_, M, E> {}

impl<'a, M, E> ProductExplorer<'a, M, E>
where
    M: SemanticRelation,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    pub fn new(model: &'a M, evaluator: &'a E, automaton: &'a PropertyAutomaton) -> Self {
        Self {
            model,
            evaluator,
            automaton,
        }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn automaton(&self) -> &'a PropertyAutomaton {
        self.automaton
    }

    pub fn evaluator(&self) -> &'a E {
        self.evaluator
    }

    fn property_name(&self) -> String {
        self.automaton.name().unwrap_or("<anonymous>").to_string()
    }

    fn wrap_error(&self, state: String, source: ModelError) -> ModelEvaluationError {
        ModelEvaluationError {
            property: self.property_name(),
            state,
            source,
        }
    }

    /// Every pair of a model initial state and an automaton initial state,
    /// model states first.
    pub fn initial_states(&self) -> Result<Vec<ProductState<M::State>>, ModelEvaluationError> {
        let model_initial = self
            .model
            .initial()
            .map_err(|e| self.wrap_error("<initial>".to_string(), e))?;
        let mut states = Vec::with_capacity(model_initial.len() * self.automaton.initial_states().len());
        for s in &model_initial {
            for &q in self.automaton.initial_states() {
                states.push(ProductState::new(s.clone(), q));
            }
        }
        Ok(states)
    }

    /// Lazily enumerates the product successors of `state`, in model step
    /// order, then automaton transition order.
    pub fn successors(&self, state: &ProductState<M::State>) -> Successors<'a, M, E> {
        Successors {
            explorer: *self,
            source: state.clone(),
            steps: Some(self.model.next(&state.model)),
            current: None,
        }
    }

    /// Returns true if the automaton component of `state` is accepting
    /// (state-based acceptance).
    pub fn is_accepting(&self, state: &ProductState<M::State>) -> bool {
        self.automaton.is_accepting(state.automaton)
    }

    /// Acceptance marks of the product edge leaving `source` through
    /// automaton transition `transition`.
    pub fn edge_marks(&self, source: &ProductState<M::State>, transition: usize) -> &'a Marks {
        self.automaton.edge_marks(source.automaton, transition)
    }

    /// Enabled transitions of `state` for `step`. Each atom is evaluated at
    /// most once.
    pub fn enabled(&self, state: StateId, step: &Step<M::State, M::Action>) -> Vec<usize> {
        let mut memo: Vec<Option<bool>> = vec![None; self.automaton.atoms().len()];
        self.automaton.enabled(state, |atom: AtomId| {
            *memo[atom.index()]
                .get_or_insert_with(|| self.evaluator.evaluate(self.automaton.atom_name(atom), step))
        })
    }
}

/// Lazy iterator over the product successors of one state.
///
/// After yielding an error the iterator is exhausted.
pub struct Successors<'a, M: SemanticRelation + 'a, E: ?Sized> {
    explorer: ProductExplorer<'a, M, E>,
    source: ProductState<M::State>,
    steps: Option<M::Steps<'a>>,
    /// The step being expanded, with its enabled transitions not yet yielded.
    current: Option<(Step<M::State, M::Action>, std::vec::IntoIter<usize>)>,
}

impl<'a, M, E> Iterator for Successors<'a, M, E>
where
    M: SemanticRelation + 'a,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    type Item = Result<Successor<M::State, M::Action>, ModelEvaluationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((step, enabled)) = &mut self.current {
                if let Some(transition) = enabled.next() {
                    let target = self.explorer.automaton.transition(self.source.automaton, transition).target;
                    return Some(Ok(Successor {
                        step: step.clone(),
                        transition,
                        target: ProductState::new(step.target.clone(), target),
                    }));
                }
                self.current = None;
            }

            // Only now is the model asked for one more step.
            match self.steps.as_mut()?.next() {
                None => {
                    self.steps = None;
                    return None;
                }
                Some(Err(e)) => {
                    self.steps = None;
                    return Some(Err(self.explorer.wrap_error(self.source.to_string(), e)));
                }
                Some(Ok(step)) => {
                    let enabled = self.explorer.enabled(self.source.automaton, &step);
                    self.current = Some((step, enabled.into_iter()));
                }
            }
        }
    }
}
