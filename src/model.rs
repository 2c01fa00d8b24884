//! The model side of the product: steps, semantic relations and atom
//! evaluators.
//!
//! The checker never looks inside a model state. It only needs equality and
//! hashing on states, and a lazy enumeration of the steps leaving a state.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ModelError;

/// One model transition: `source --action--> target`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Step<S, A> {
    pub source: S,
    pub action: A,
    pub target: S,
}

impl<S, A> Step<S, A> {
    pub fn new(source: S, action: A, target: S) -> Self {
        Self { source, action, target }
    }
}

/// A lazily explored transition system.
///
/// `next` must return the steps of a state in a deterministic order: the
/// order fixes which counterexample is reported first. The returned iterator
/// is only advanced as far as the checker needs, so it may be expensive or
/// even infinite.
pub trait SemanticRelation {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Debug;
    type Steps<'a>: Iterator<Item = Result<Step<Self::State, Self::Action>, ModelError>>
    where
        Self: 'a;

    /// Initial states of the model.
    fn initial(&self) -> Result<Vec<Self::State>, ModelError>;

    /// Steps leaving `state`.
    fn next(&self, state: &Self::State) -> Self::Steps<'_>;
}

/// Evaluates atomic propositions against model steps.
pub trait AtomEvaluator<S, A> {
    /// Returns true if `atom` is known to this evaluator. Properties mentioning
    /// unknown atoms are rejected at compile time.
    fn resolves(&self, _atom: &str) -> bool {
        true
    }

    /// Truth value of `atom` on `step`. Must be total.
    fn evaluate(&self, atom: &str, step: &Step<S, A>) -> bool;
}

impl<S, A, F> AtomEvaluator<S, A> for F
where
    F: Fn(&str, &Step<S, A>) -> bool,
{
    fn evaluate(&self, atom: &str, step: &Step<S, A>) -> bool {
        self(atom, step)
    }
}

type Predicate<S, A> = Box<dyn Fn(&Step<S, A>) -> bool + Send + Sync>;

/// An [`AtomEvaluator`] backed by a table of named predicates.
///
/// Only registered atoms resolve.
///
/// ```
/// use buchi_rs::model::{AtomEvaluator, AtomTable, Step};
///
/// let atoms = AtomTable::new()
///     .with("tick", |step: &Step<u32, char>| step.action == 't')
///     .with("wrap", |step: &Step<u32, char>| step.target < step.source);
/// assert!(atoms.resolves("tick"));
/// assert!(!atoms.resolves("tock"));
/// assert!(atoms.evaluate("wrap", &Step::new(3, 't', 0)));
/// ```
pub struct AtomTable<S, A> {
    predicates: HashMap<String, Predicate<S, A>>,
}

impl<S, A> Default for AtomTable<S, A> {
    fn default() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }
}

impl<S, A> AtomTable<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, replacing any previous predicate with that name.
    pub fn with<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Step<S, A>) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Box::new(predicate));
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<S, A> AtomEvaluator<S, A> for AtomTable<S, A> {
    fn resolves(&self, atom: &str) -> bool {
        self.predicates.contains_key(atom)
    }

    fn evaluate(&self, atom: &str, step: &Step<S, A>) -> bool {
        self.predicates.get(atom).is_some_and(|p| p(step))
    }
}

/// An explicit, finite labeled graph usable as a [`SemanticRelation`].
///
/// Edges of a state are enumerated in insertion order.
///
/// ```
/// use buchi_rs::model::{Graph, SemanticRelation};
///
/// let model = Graph::new(["s0"])
///     .edge("s0", 'a', "s1")
///     .edge("s1", 'b', "s0");
/// let steps: Vec<_> = model.next(&"s1").collect::<Result<_, _>>().unwrap();
/// assert_eq!(steps.len(), 1);
/// assert_eq!(steps[0].target, "s0");
/// ```
#[derive(Debug, Clone)]
pub struct Graph<S, A> {
    initial: Vec<S>,
    edges: HashMap<S, Vec<(A, S)>>,
}

impl<S, A> Graph<S, A>
where
    S: Clone + Eq + Hash,
{
    pub fn new(initial: impl IntoIterator<Item = S>) -> Self {
        Self {
            initial: initial.into_iter().collect(),
            edges: HashMap::new(),
        }
    }

    pub fn edge(mut self, source: S, action: A, target: S) -> Self {
        self.add_edge(source, action, target);
        self
    }

    pub fn add_edge(&mut self, source: S, action: A, target: S) {
        self.edges.entry(source).or_default().push((action, target));
    }

    /// Number of edges in the graph.
    pub fn num_edges(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// Lazy step iterator of a [`Graph`] state.
pub struct GraphSteps<'a, S, A> {
    source: Option<&'a S>,
    edges: std::slice::Iter<'a, (A, S)>,
}

impl<S: Clone, A: Clone> Iterator for GraphSteps<'_, S, A> {
    type Item = Result<Step<S, A>, ModelError>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source?;
        let (action, target) = self.edges.next()?;
        Some(Ok(Step::new(source.clone(), action.clone(), target.clone())))
    }
}

impl<S, A> SemanticRelation for Graph<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Debug,
{
    type State = S;
    type Action = A;
    type Steps<'a>
        = GraphSteps<'a, S, A>
    where
        Self: 'a;

    fn initial(&self) -> Result<Vec<S>, ModelError> {
        Ok(self.initial.clone())
    }

    fn next(&self, state: &S) -> Self::Steps<'_> {
        match self.edges.get_key_value(state) {
            Some((source, edges)) => GraphSteps {
                source: Some(source),
                edges: edges.iter(),
            },
            None => GraphSteps {
                source: None,
                edges: <&[(A, S)]>::default().iter(),
            },
        }
    }
}
