//! Automata and lassos to DOT (Graphviz).
//!
//! # DOT Format
//!
//! - **Property automata**: states are circles labeled with their names,
//!   accepting states (state-based acceptance) are double circles, and an
//!   invisible source node points at every initial state. Edges are labeled
//!   with their guard, their priority when it is not 0, and their acceptance
//!   marks when the automaton is transition-based.
//! - **Counterexamples**: one node per distinct product state, prefix edges
//!   in the default style, cycle edges in the configured cycle style.
//!
//! # Examples
//!
//! ```
//! use buchi_rs::automaton::PropertyAutomaton;
//! use buchi_rs::model::{AtomTable, Step};
//! use buchi_rs::syntax::{AutomatonDecl, Expr};
//!
//! let decl = AutomatonDecl::new()
//!     .state("init")
//!     .state("done")
//!     .initial("init")
//!     .accepting(["done"])
//!     .transition("init", Expr::atom("p"), "done")
//!     .transition("done", Expr::True, "done");
//! let atoms = AtomTable::new().with("p", |s: &Step<u8, char>| s.action == 'p');
//! let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
//!
//! let dot = automaton.to_dot().unwrap();
//! // Render with: dot -Tpng automaton.dot -o automaton.png
//! assert!(dot.contains("doublecircle"));
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::hash::Hash;

use crate::automaton::{AcceptanceKind, PropertyAutomaton};
use crate::counterexample::Counterexample;
use crate::product::ProductState;

/// Configuration options for DOT output generation.
///
/// ```
/// use buchi_rs::dot::DotConfig;
///
/// let config = DotConfig {
///     rankdir: "TB",
///     ..DotConfig::default()
/// };
/// assert_eq!(config.state_shape, "circle");
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Layout direction (default: "LR")
    pub rankdir: &'static str,
    /// Shape for ordinary states (default: "circle")
    pub state_shape: &'static str,
    /// Shape for accepting states (default: "doublecircle")
    pub accepting_shape: &'static str,
    /// Style for the edges of a lasso's cycle (default: "bold")
    pub cycle_edge_style: &'static str,
    /// Whether to print the priority of transitions with a non-zero one (default: true)
    pub show_priorities: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            rankdir: "LR",
            state_shape: "circle",
            accepting_shape: "doublecircle",
            cycle_edge_style: "bold",
            show_priorities: true,
        }
    }
}

/// Escapes a label for a double-quoted DOT string.
fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl PropertyAutomaton {
    pub fn to_dot(&self) -> Result<String, fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "rankdir={};", config.rankdir)?;
        writeln!(dot, "node [shape={}];", config.state_shape)?;

        for state in self.states() {
            let shape = if self.is_accepting(state) {
                config.accepting_shape
            } else {
                config.state_shape
            };
            let name = escape(self.state_name(state));
            let marks = self.state_marks(state);
            if self.accepting_kind() == AcceptanceKind::State && self.acceptance_sets() > 1 && !marks.is_empty() {
                writeln!(dot, "{} [shape={}, label=\"{}\\n{}\"];", state, shape, name, marks)?;
            } else {
                writeln!(dot, "{} [shape={}, label=\"{}\"];", state, shape, name)?;
            }
        }

        for (i, &state) in self.initial_states().iter().enumerate() {
            writeln!(dot, "init{} [shape=point, style=invis];", i)?;
            writeln!(dot, "init{} -> {};", i, state)?;
        }

        for state in self.states() {
            for t in self.transitions(state) {
                let mut label = t.guard.render(|a| self.atom_name(a));
                if config.show_priorities && t.priority != 0 {
                    write!(label, " [{}]", t.priority)?;
                }
                if self.accepting_kind() == AcceptanceKind::Transition && !t.marks.is_empty() {
                    write!(label, " {}", t.marks)?;
                }
                writeln!(dot, "{} -> {} [label=\"{}\"];", state, t.target, escape(&label))?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

impl<S, A> Counterexample<S, A>
where
    S: fmt::Debug + Clone + Eq + Hash,
    A: fmt::Debug,
{
    pub fn to_dot(&self) -> Result<String, fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "rankdir={};", config.rankdir)?;
        writeln!(dot, "node [shape=box];")?;

        let mut ids: HashMap<&ProductState<S>, usize> = HashMap::new();
        let edges = self.prefix.iter().chain(&self.cycle);
        for state in edges.clone().flat_map(|e| [&e.from, &e.to]) {
            if !ids.contains_key(state) {
                let id = ids.len();
                ids.insert(state, id);
                writeln!(dot, "n{} [label=\"{}\"];", id, escape(&state.to_string()))?;
            }
        }

        for (i, edge) in edges.enumerate() {
            let style = if i < self.prefix.len() {
                "solid"
            } else {
                config.cycle_edge_style
            };
            let label = escape(&format!("{:?}", edge.step.action));
            writeln!(
                dot,
                "n{} -> n{} [label=\"{}\", style={}];",
                ids[&edge.from], ids[&edge.to], label, style
            )?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
