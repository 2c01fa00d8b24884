//! Compiled property automata.
//!
//! A [`PropertyAutomaton`] is an explicit generalized Büchi automaton over
//! model steps: its accepting runs are the property violations. It is built
//! once per property, immutable afterwards, and may be shared (read-only) by
//! any number of concurrent checks.
//!
//! # Acceptance
//!
//! The automaton has `k` acceptance sets. With [`AcceptanceKind::State`] each
//! state carries the sets it belongs to; with [`AcceptanceKind::Transition`]
//! each transition does. An infinite run is accepted iff every set is visited
//! infinitely often. `k = 1` is plain Büchi acceptance and `k = 0` accepts
//! every infinite run.
//!
//! # Finite automata
//!
//! An automaton of kind [`AutomatonKind::Finite`] reads finite prefixes
//! instead: a run violates the property as soon as it takes a step into an
//! accepting state (state-based acceptance belonging to every set) or along a
//! transition carrying every set. It is the shape of safety properties such
//! as invariants, see [`AutomatonDecl::invariant`].
//!
//! # Priorities
//!
//! Every transition has an integer priority, lower values first. For a given
//! step, the enabled transitions of a state are those of the first priority
//! level having at least one true guard.

use std::collections::HashMap;

use log::debug;

use crate::error::PropertyCompilationError;
use crate::guard::Guard;
use crate::marks::Marks;
use crate::model::AtomEvaluator;
use crate::syntax::{AcceptanceDecl, AutomatonDecl, Expr, Property};
use crate::translate::{self, Translator};
use crate::types::{AtomId, StateId};

/// How accepting runs are read.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AutomatonKind {
    /// Infinite runs visiting every acceptance set infinitely often.
    #[default]
    Buchi,
    /// Finite runs ending in acceptance.
    Finite,
}

/// Where acceptance marks live.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AcceptanceKind {
    State,
    Transition,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub guard: Guard,
    pub target: StateId,
    pub priority: i32,
    /// Acceptance sets of the transition; always empty with state-based acceptance.
    pub marks: Marks,
}

#[derive(Debug, Clone)]
pub struct PropertyAutomaton {
    name: Option<String>,
    state_names: Vec<String>,
    initial: Vec<StateId>,
    /// Outgoing transitions per state, stably sorted by priority.
    transitions: Vec<Vec<Transition>>,
    /// Acceptance sets per state; all empty with transition-based acceptance.
    state_marks: Vec<Marks>,
    semantics: AutomatonKind,
    kind: AcceptanceKind,
    sets: usize,
    atoms: Vec<String>,
}

impl PropertyAutomaton {
    /// Compiles a property.
    ///
    /// Formula properties are handed to `translator`; explicit automata are
    /// compiled directly and never touch it. Every atom must be resolvable by
    /// `evaluator`.
    pub fn compile<S, A, E>(
        property: &Property,
        evaluator: &E,
        translator: Option<&dyn Translator>,
    ) -> Result<Self, PropertyCompilationError>
    where
        E: AtomEvaluator<S, A> + ?Sized,
    {
        match property {
            Property::Automaton(decl) => Self::from_decl(decl, evaluator),
            Property::Formula(expr) => {
                let translator = translator.ok_or(PropertyCompilationError::MissingTranslator)?;
                let expr = expr.resolve()?;
                // Atoms are checked before spawning the translator.
                for atom in expr.atoms() {
                    if !evaluator.resolves(atom) {
                        return Err(PropertyCompilationError::UnresolvedAtom(atom.to_string()));
                    }
                }
                let decl = translate::formula_to_decl(&expr, translator)?;
                Self::from_decl(&decl, evaluator)
            }
        }
    }

    /// Compiles an explicit automaton declaration.
    pub fn from_decl<S, A, E>(decl: &AutomatonDecl, evaluator: &E) -> Result<Self, PropertyCompilationError>
    where
        E: AtomEvaluator<S, A> + ?Sized,
    {
        let mut index: HashMap<&str, StateId> = HashMap::new();
        for (i, name) in decl.states.iter().enumerate() {
            if index.insert(name.as_str(), StateId::new(i as u32)).is_some() {
                return Err(PropertyCompilationError::DuplicateState(name.clone()));
            }
        }
        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| PropertyCompilationError::UnknownState(name.to_string()))
        };

        let guards: Vec<Expr> = decl
            .transitions
            .iter()
            .map(|t| t.guard.resolve())
            .collect::<Result<_, _>>()?;
        let mut used: Vec<&str> = Vec::new();
        for atom in guards.iter().flat_map(Expr::atoms) {
            if !used.contains(&atom) {
                used.push(atom);
            }
        }

        let mut atoms: Vec<String> = Vec::new();
        let mut atom_ids: HashMap<&str, AtomId> = HashMap::new();
        for (i, atom) in used.into_iter().enumerate() {
            if !evaluator.resolves(atom) {
                return Err(PropertyCompilationError::UnresolvedAtom(atom.to_string()));
            }
            atom_ids.insert(atom, AtomId::new(i as u32));
            atoms.push(atom.to_string());
        }
        let atom_id = |name: &str| {
            atom_ids
                .get(name)
                .copied()
                .ok_or_else(|| PropertyCompilationError::UnresolvedAtom(name.to_string()))
        };

        let mut initial = Vec::new();
        for name in &decl.initial {
            let id = lookup(name)?;
            if !initial.contains(&id) {
                initial.push(id);
            }
        }
        if initial.is_empty() {
            return Err(PropertyCompilationError::NoInitialState);
        }

        let num_states = decl.states.len();
        let mut state_marks = vec![Marks::empty(); num_states];
        let (kind, sets) = match &decl.acceptance {
            AcceptanceDecl::States(sets) => {
                for (set, names) in sets.iter().enumerate() {
                    for name in names {
                        state_marks[lookup(name)?.index()].insert(set);
                    }
                }
                (AcceptanceKind::State, sets.len())
            }
            AcceptanceDecl::Transitions { sets } => (AcceptanceKind::Transition, *sets),
        };

        let mut transitions: Vec<Vec<Transition>> = vec![Vec::new(); num_states];
        for (t, guard) in decl.transitions.iter().zip(&guards) {
            let source = lookup(&t.source)?;
            let target = lookup(&t.target)?;
            let mut marks = Marks::empty();
            if kind == AcceptanceKind::Transition {
                for &mark in &t.marks {
                    if mark >= sets {
                        return Err(PropertyCompilationError::MarkOutOfRange { mark, sets });
                    }
                    marks.insert(mark);
                }
            }
            let guard = Guard::compile(guard, atom_id)?;
            transitions[source.index()].push(Transition {
                guard,
                target,
                priority: t.priority,
                marks,
            });
        }
        for outgoing in &mut transitions {
            // Stable: declaration order is kept within a priority level.
            outgoing.sort_by_key(|t| t.priority);
        }

        debug!(
            "compiled {:?} automaton: {} states, {} transitions, {} atoms, {:?} acceptance with {} sets",
            decl.kind,
            num_states,
            decl.transitions.len(),
            atoms.len(),
            kind,
            sets
        );

        Ok(Self {
            name: None,
            state_names: decl.states.clone(),
            initial,
            transitions,
            state_marks,
            semantics: decl.kind,
            kind,
            sets,
            atoms,
        })
    }

    /// Attaches a name, used in error context and logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> AutomatonKind {
        self.semantics
    }

    pub fn accepting_kind(&self) -> AcceptanceKind {
        self.kind
    }

    /// Number of acceptance sets.
    pub fn acceptance_sets(&self) -> usize {
        self.sets
    }

    pub fn initial_states(&self) -> &[StateId] {
        &self.initial
    }

    pub fn num_states(&self) -> usize {
        self.state_names.len()
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.state_names.len()).map(|i| StateId::new(i as u32))
    }

    pub fn state_name(&self, state: StateId) -> &str {
        &self.state_names[state.index()]
    }

    /// Looks a state up by its declared name.
    pub fn state_by_name(&self, name: &str) -> Option<StateId> {
        self.state_names
            .iter()
            .position(|n| n == name)
            .map(|i| StateId::new(i as u32))
    }

    /// Outgoing transitions of `state`, in priority order.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.transitions[state.index()]
    }

    pub fn transition(&self, state: StateId, index: usize) -> &Transition {
        &self.transitions[state.index()][index]
    }

    /// Atom names, indexed by [`AtomId`].
    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }

    pub fn atom_name(&self, atom: AtomId) -> &str {
        &self.atoms[atom.index()]
    }

    /// Acceptance sets of `state` (empty with transition-based acceptance).
    pub fn state_marks(&self, state: StateId) -> &Marks {
        &self.state_marks[state.index()]
    }

    /// Returns true if `state` belongs to at least one acceptance set.
    ///
    /// Always false with transition-based acceptance.
    pub fn is_accepting(&self, state: StateId) -> bool {
        !self.state_marks[state.index()].is_empty()
    }

    /// Marks collected by taking transition `index` out of `state`.
    ///
    /// With state-based acceptance these are the marks of the source state,
    /// so the marks along a cycle are exactly the marks of the states on it.
    pub fn edge_marks(&self, state: StateId, index: usize) -> &Marks {
        match self.kind {
            AcceptanceKind::State => &self.state_marks[state.index()],
            AcceptanceKind::Transition => &self.transitions[state.index()][index].marks,
        }
    }

    /// Returns true if taking transition `index` out of `state` completes a
    /// finite violation: the transition carries every set, or with state-based
    /// acceptance its target belongs to every set.
    pub fn accepts_after(&self, state: StateId, index: usize) -> bool {
        let transition = &self.transitions[state.index()][index];
        match self.kind {
            AcceptanceKind::State => self.state_marks[transition.target.index()].covers(self.sets),
            AcceptanceKind::Transition => transition.marks.covers(self.sets),
        }
    }

    /// Indices of the transitions of `state` enabled under the atom valuation
    /// `atom`: the first priority level with at least one true guard.
    pub fn enabled<F>(&self, state: StateId, mut atom: F) -> Vec<usize>
    where
        F: FnMut(AtomId) -> bool,
    {
        let mut enabled = Vec::new();
        let mut level: Option<i32> = None;
        for (i, t) in self.transitions[state.index()].iter().enumerate() {
            if let Some(p) = level {
                if t.priority != p {
                    break;
                }
            }
            if t.guard.eval(&mut atom) {
                enabled.push(i);
                level = Some(t.priority);
            }
        }
        enabled
    }
}
