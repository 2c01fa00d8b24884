//! Type-safe identifiers for automaton states and atomic propositions.
//!
//! Both are dense 0-based indices into the tables owned by a
//! [`PropertyAutomaton`][crate::automaton::PropertyAutomaton]. The newtypes keep
//! the two index spaces from being mixed up.
use std::fmt;

/// An automaton state identifier (0-indexed).
///
/// State identifiers are assigned at compile time in declaration order and are
/// never reused or renumbered afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateId(u32);

impl StateId {
    /// Creates a new state identifier with the given index.
    pub fn new(index: u32) -> Self {
        StateId(index)
    }

    /// Returns the raw index as a `usize`, suitable for table lookups.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<StateId> for usize {
    fn from(state: StateId) -> Self {
        state.index()
    }
}

/// An atomic proposition identifier (0-indexed).
///
/// Each distinct atom name mentioned by a property gets one identifier, so an
/// atom is evaluated at most once per model step regardless of how many guards
/// mention it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AtomId(u32);

impl AtomId {
    /// Creates a new atom identifier with the given index.
    pub fn new(index: u32) -> Self {
        AtomId(index)
    }

    /// Returns the raw index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}
