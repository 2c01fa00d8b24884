//! # buchi-rs: on-the-fly LTL model checking in Rust
//!
//! **`buchi-rs`** checks whether a transition system satisfies a linear temporal property.
//! It follows the automata-theoretic approach: the property's *violation* is turned into a
//! Büchi automaton, the automaton is synchronized with the model, and the product is searched
//! for an accepting cycle reachable from an initial state.
//!
//! ## How it works
//!
//! The product is never built up front. States are discovered while the search runs, and the
//! model is asked for one step at a time, so models with a huge (or infinite) state space can be
//! checked as long as the interesting part is reachable. When an accepting cycle exists, it is
//! reported as a *lasso*: a finite prefix from an initial state and a cycle that can be repeated
//! forever.
//!
//! ## Key Features
//!
//! - **Generalized Büchi acceptance**: any number of acceptance sets, on states or on transitions.
//! - **Two emptiness algorithms**: the SCC-based [`Couvreur`][crate::emptiness::Algorithm::Couvreur] search (the default) and the classic [`NestedDfs`][crate::emptiness::Algorithm::NestedDfs].
//! - **Three verdicts**: [`Sat`][crate::emptiness::Verdict::Sat] with a counterexample, [`Unsat`][crate::emptiness::Verdict::Unsat], or [`Inconclusive`][crate::emptiness::Verdict::Inconclusive] when a depth bound cut the search short.
//! - **Monotone depth bounds**: a bounded run reports a counterexample exactly when one lies within the bound.
//! - **Finite automata**: safety properties such as [invariants][crate::syntax::AutomatonDecl::invariant] are checked by reachability, with a finite counterexample.
//! - **Prioritized transitions**: a property may prefer some transitions over others.
//! - **Pluggable translation**: LTL formulas are translated to automata by an external tool such as LTL3BA.
//!
//! ## Basic Usage
//!
//! ```rust
//! use buchi_rs::model::{Graph, Step};
//! use buchi_rs::model_checker::ModelChecker;
//! use buchi_rs::syntax::{AutomatonDecl, Expr, Property};
//!
//! // 1. A model: a light that may get stuck on.
//! let model = Graph::new(["off"])
//!     .edge("off", "switch", "on")
//!     .edge("on", "switch", "off")
//!     .edge("on", "stay", "on");
//!
//! // 2. Atoms are evaluated on model steps.
//! let atoms = |atom: &str, step: &Step<&'static str, &'static str>| step.target == atom;
//!
//! // 3. The violation: eventually the light stays on forever.
//! let property = Property::automaton(
//!     AutomatonDecl::new()
//!         .state("wait")
//!         .state("stuck")
//!         .initial("wait")
//!         .accepting(["stuck"])
//!         .transition("wait", Expr::True, "wait")
//!         .transition("wait", Expr::atom("on"), "stuck")
//!         .transition("stuck", Expr::atom("on"), "stuck"),
//! );
//!
//! // 4. Check.
//! let checker = ModelChecker::new(model, atoms, &property, None).unwrap();
//! let verdict = checker.check().unwrap();
//! let lasso = verdict.counterexample().unwrap();
//! assert!(lasso.cycle_steps().all(|step| step.target == "on"));
//! ```
//!
//! ## Core Components
//!
//! - **[`model`]**: The [`SemanticRelation`][crate::model::SemanticRelation] and [`AtomEvaluator`][crate::model::AtomEvaluator] traits a model implements.
//! - **[`automaton`]**: The compiled [`PropertyAutomaton`][crate::automaton::PropertyAutomaton].
//! - **[`product`]**: Lazy exploration of the synchronous product.
//! - **[`emptiness`]**: The emptiness checker and its verdicts.
//! - **[`counterexample`]**: Lassos, and their replay against the product.
//! - **[`dimacs`]**: Reading CNF formulas as propositional properties.
//! - **[`dot`]**: Visualizing automata and lassos using Graphviz.

pub mod automaton;
pub mod counterexample;
pub mod dimacs;
pub mod dot;
pub mod emptiness;
pub mod error;
pub mod guard;
pub mod marks;
pub mod model;
pub mod model_checker;
pub mod product;
pub mod syntax;
pub mod translate;
pub mod types;
