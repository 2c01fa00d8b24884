//! Emptiness checking of the product.
//!
//! The checker looks for a reachable cycle of the product whose acceptance
//! marks cover every acceptance set of the property automaton. Such a cycle
//! is a run of the model violating the property.
//!
//! # Verdicts
//!
//! - [`Verdict::Sat`]: an accepting cycle was found; the counterexample is a
//!   lasso through it.
//! - [`Verdict::Unsat`]: the whole reachable product was explored and has no
//!   accepting cycle.
//! - [`Verdict::Inconclusive`]: no accepting cycle was found, but the depth
//!   bound kept some states from being explored.
//!
//! # Algorithms
//!
//! - [`Algorithm::Couvreur`] (default): one iterative depth-first search
//!   maintaining the stack of roots of the strongly connected components
//!   still being explored. When an edge closes a cycle, the components on it
//!   are merged and their marks united; the search stops as soon as one
//!   component carries every acceptance set. Works for any number of
//!   acceptance sets, on states or on transitions.
//! - [`Algorithm::NestedDfs`]: the blue/red nested depth-first search. Each
//!   state is visited at most twice, but only one acceptance set is
//!   supported.
//!
//! Both run on explicit stacks: the search depth is bounded by memory, not by
//! the call stack.
//!
//! # Finite automata
//!
//! For an automaton of kind [`AutomatonKind::Finite`] there is no cycle to
//! look for: the checker searches breadth-first for a reachable step that
//! completes acceptance, whichever algorithm is configured. The
//! counterexample of a [`Verdict::Sat`] is then a prefix with an empty cycle
//! ([`Counterexample::is_finite`]).
//!
//! # Depth bound
//!
//! With `depth_bound = Some(n)`, an edge to a state never visited before is
//! not followed when the search stack already holds `n` nodes. Edges to
//! visited states are still examined, so cycles closing inside the bound are
//! found. A run that skipped at least one such edge never reports
//! [`Verdict::Unsat`].
//!
//! Before such a run gives up, the states at distance less than `n` from an
//! initial state are completed breadth-first and searched for an accepting
//! cycle. The verdict of a bounded run is [`Verdict::Sat`] exactly when the
//! product restricted to those states has an accepting cycle, so a larger
//! bound never turns a counterexample into [`Verdict::Inconclusive`].
//!
//! ```
//! use buchi_rs::automaton::PropertyAutomaton;
//! use buchi_rs::emptiness::{CheckerConfig, EmptinessChecker};
//! use buchi_rs::model::{AtomTable, Graph, Step};
//! use buchi_rs::product::ProductExplorer;
//! use buchi_rs::syntax::{AutomatonDecl, Expr};
//!
//! let model = Graph::new([0u8]).edge(0, 'a', 1).edge(1, 'b', 1);
//! let atoms = AtomTable::new().with("b", |s: &Step<u8, char>| s.action == 'b');
//!
//! // Violation: infinitely many `b` steps.
//! let decl = AutomatonDecl::new()
//!     .state("wait")
//!     .state("seen")
//!     .initial("wait")
//!     .accepting(["seen"])
//!     .transition("wait", Expr::True, "wait")
//!     .transition("wait", Expr::atom("b"), "seen")
//!     .transition("seen", Expr::True, "wait");
//! let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
//! let explorer = ProductExplorer::new(&model, &atoms, &automaton);
//!
//! let verdict = EmptinessChecker::new(CheckerConfig::default()).check(&explorer).unwrap();
//! let lasso = verdict.counterexample().unwrap();
//! lasso.replay(&explorer).unwrap();
//! assert!(lasso.cycle_steps().all(|s| s.action == 'b'));
//! ```

use std::fmt;
use std::str::FromStr;

use log::{debug, info};

use crate::automaton::AutomatonKind;
use crate::counterexample::Counterexample;
use crate::error::CheckError;
use crate::model::{AtomEvaluator, SemanticRelation};
use crate::product::{ProductExplorer, ProductState};

mod couvreur;
mod horizon;
mod nested;
mod reach;
mod stack;

use self::stack::Search;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Algorithm {
    #[default]
    Couvreur,
    NestedDfs,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Couvreur => "couvreur",
            Algorithm::NestedDfs => "nested-dfs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "couvreur" => Ok(Algorithm::Couvreur),
            "nested-dfs" | "ndfs" => Ok(Algorithm::NestedDfs),
            _ => Err(format!("unknown algorithm `{}` (expected `couvreur` or `nested-dfs`)", s)),
        }
    }
}

/// How a search node resumes enumerating its successors.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TraversalStrategy {
    /// Keep the lazy successor iterator and resume it. The model is never
    /// asked for more steps than the search consumes.
    #[default]
    Lazy,
    /// Pull every successor on the first visit and resume from a position in
    /// that list. Needs a finitely branching model.
    Buffered,
}

impl fmt::Display for TraversalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalStrategy::Lazy => f.write_str("lazy"),
            TraversalStrategy::Buffered => f.write_str("buffered"),
        }
    }
}

impl FromStr for TraversalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lazy" => Ok(TraversalStrategy::Lazy),
            "buffered" => Ok(TraversalStrategy::Buffered),
            _ => Err(format!("unknown traversal `{}` (expected `lazy` or `buffered`)", s)),
        }
    }
}

/// Configuration of an [`EmptinessChecker`].
///
/// Defaults: [`Algorithm::Couvreur`], [`TraversalStrategy::Lazy`], no depth
/// bound.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct CheckerConfig {
    pub algorithm: Algorithm,
    pub traversal: TraversalStrategy,
    /// Maximum number of nodes on the search stack, `None` for unbounded.
    pub depth_bound: Option<usize>,
}

impl CheckerConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_traversal(mut self, traversal: TraversalStrategy) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_depth_bound(mut self, depth_bound: usize) -> Self {
        self.depth_bound = Some(depth_bound);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.depth_bound = None;
        self
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Verdict<S, A> {
    /// The property is violated; the lasso is a witness.
    Sat(Counterexample<S, A>),
    /// The property holds on every run.
    Unsat,
    /// The depth bound was reached before the question was settled.
    Inconclusive,
}

impl<S, A> Verdict<S, A> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Verdict::Unsat)
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Verdict::Inconclusive)
    }

    pub fn counterexample(&self) -> Option<&Counterexample<S, A>> {
        match self {
            Verdict::Sat(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_counterexample(self) -> Option<Counterexample<S, A>> {
        match self {
            Verdict::Sat(c) => Some(c),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Verdict::Sat(_) => "SAT",
            Verdict::Unsat => "UNSAT",
            Verdict::Inconclusive => "INCONCLUSIVE",
        }
    }
}

/// Counters of one run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Statistics {
    /// Search nodes opened (states forgotten after a truncation count again),
    /// including states expanded while completing a bounded run.
    pub states: usize,
    /// Product edges examined.
    pub transitions: usize,
    /// Largest search stack size reached.
    pub max_depth: usize,
}

#[derive(Debug, Clone)]
pub struct Outcome<S, A> {
    pub verdict: Verdict<S, A>,
    pub statistics: Statistics,
}

/// Runs emptiness checks with a fixed configuration.
///
/// Every call owns its visited-state table; nothing is kept between runs, so
/// one checker may be used for any number of checks, from any number of
/// threads.
#[derive(Debug, Clone, Default)]
pub struct EmptinessChecker {
    config: CheckerConfig,
}

impl EmptinessChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Checks the product from all its initial states.
    pub fn check<M, E>(&self, explorer: &ProductExplorer<'_, M, E>) -> Result<Verdict<M::State, M::Action>, CheckError>
    where
        M: SemanticRelation,
        E: AtomEvaluator<M::State, M::Action> + ?Sized,
    {
        Ok(self.run(explorer)?.verdict)
    }

    /// Checks the product from the given initial states, tried in order.
    pub fn check_from<M, E>(
        &self,
        explorer: &ProductExplorer<'_, M, E>,
        initial: &[ProductState<M::State>],
    ) -> Result<Verdict<M::State, M::Action>, CheckError>
    where
        M: SemanticRelation,
        E: AtomEvaluator<M::State, M::Action> + ?Sized,
    {
        Ok(self.run_from(explorer, initial)?.verdict)
    }

    /// Like [`check`][Self::check], also returning the run statistics.
    pub fn run<M, E>(&self, explorer: &ProductExplorer<'_, M, E>) -> Result<Outcome<M::State, M::Action>, CheckError>
    where
        M: SemanticRelation,
        E: AtomEvaluator<M::State, M::Action> + ?Sized,
    {
        let initial = explorer.initial_states()?;
        self.run_from(explorer, &initial)
    }

    pub fn run_from<M, E>(
        &self,
        explorer: &ProductExplorer<'_, M, E>,
        initial: &[ProductState<M::State>],
    ) -> Result<Outcome<M::State, M::Action>, CheckError>
    where
        M: SemanticRelation,
        E: AtomEvaluator<M::State, M::Action> + ?Sized,
    {
        let sets = explorer.automaton().acceptance_sets();
        debug!(
            "checking {} ({:?}) with {} ({} traversal, depth bound {:?}): {} initial states, {} acceptance sets",
            explorer.automaton().name().unwrap_or("<anonymous>"),
            explorer.automaton().kind(),
            self.config.algorithm,
            self.config.traversal,
            self.config.depth_bound,
            initial.len(),
            sets
        );

        let mut search = Search::new(*explorer, &self.config);
        let found = match (explorer.automaton().kind(), self.config.algorithm) {
            (AutomatonKind::Finite, _) => reach::search(&mut search, initial)?,
            (AutomatonKind::Buchi, Algorithm::Couvreur) => couvreur::search(&mut search, initial)?,
            (AutomatonKind::Buchi, Algorithm::NestedDfs) => {
                if sets > 1 {
                    return Err(CheckError::UnsupportedAcceptance {
                        algorithm: "nested DFS",
                        sets,
                    });
                }
                nested::search(&mut search, initial)?
            }
        };

        let found = match (found, self.config.depth_bound) {
            (None, Some(bound)) if search.curtailed && explorer.automaton().kind() == AutomatonKind::Buchi => {
                debug!("depth bound {} reached, completing the states within it", bound);
                horizon::search(&mut search, initial, bound)?
            }
            (found, _) => found,
        };

        let verdict = match found {
            Some(lasso) => Verdict::Sat(lasso),
            None if search.curtailed => Verdict::Inconclusive,
            None => Verdict::Unsat,
        };
        info!(
            "{}: {} states, {} transitions, max depth {}",
            verdict.name(),
            search.stats.states,
            search.stats.transitions,
            search.stats.max_depth
        );
        Ok(Outcome {
            verdict,
            statistics: search.stats,
        })
    }
}

/// Checks `explorer` from `initial` with the given algorithm and depth bound,
/// using lazy traversal.
pub fn check<M, E>(
    explorer: &ProductExplorer<'_, M, E>,
    initial: &[ProductState<M::State>],
    algorithm: Algorithm,
    depth_bound: Option<usize>,
) -> Result<Verdict<M::State, M::Action>, CheckError>
where
    M: SemanticRelation,
    E: AtomEvaluator<M::State, M::Action> + ?Sized,
{
    let config = CheckerConfig {
        algorithm,
        depth_bound,
        ..CheckerConfig::default()
    };
    EmptinessChecker::new(config).check_from(explorer, initial)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::automaton::PropertyAutomaton;
    use crate::model::{AtomTable, Graph, Step};
    use crate::syntax::{AcceptanceDecl, AutomatonDecl, Expr};

    type G = Graph<u8, char>;

    fn configs() -> Vec<CheckerConfig> {
        let mut configs = Vec::new();
        for algorithm in [Algorithm::Couvreur, Algorithm::NestedDfs] {
            for traversal in [TraversalStrategy::Lazy, TraversalStrategy::Buffered] {
                configs.push(CheckerConfig::default().with_algorithm(algorithm).with_traversal(traversal));
            }
        }
        configs
    }

    fn actions() -> AtomTable<u8, char> {
        let mut atoms = AtomTable::new();
        for c in ['a', 'b', 'c'] {
            atoms = atoms.with(c.to_string(), move |s: &Step<u8, char>| s.action == c);
        }
        atoms
    }

    /// Violation: infinitely many steps labeled `c` (transition-based).
    fn infinitely_often(c: &str) -> AutomatonDecl {
        AutomatonDecl::new()
            .state("q")
            .initial("q")
            .acceptance(AcceptanceDecl::Transitions { sets: 1 })
            .marked_transition("q", Expr::atom(c), "q", [0])
            .transition("q", Expr::not(Expr::atom(c)), "q")
    }

    fn check_all(model: &G, decl: &AutomatonDecl) -> Vec<Verdict<u8, char>> {
        let atoms = actions();
        let aut = PropertyAutomaton::from_decl(decl, &atoms).unwrap();
        let explorer = ProductExplorer::new(model, &atoms, &aut);
        configs()
            .into_iter()
            .map(|config| EmptinessChecker::new(config).check(&explorer).unwrap())
            .collect()
    }

    #[test]
    fn test_self_loop_is_found() {
        let model: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'b', 0).edge(1, 'c', 1);
        for verdict in check_all(&model, &infinitely_often("c")) {
            let lasso = verdict.counterexample().unwrap();
            assert_eq!(lasso.prefix_steps().map(|s| s.action).collect::<Vec<_>>(), vec!['a']);
            assert_eq!(lasso.cycle_steps().cloned().collect::<Vec<_>>(), vec![Step::new(1, 'c', 1)]);
        }
    }

    #[test]
    fn test_no_accepting_cycle() {
        // `c` only on the way into the loop.
        let model: G = Graph::new([0]).edge(0, 'c', 1).edge(1, 'a', 2).edge(2, 'b', 1);
        for verdict in check_all(&model, &infinitely_often("c")) {
            assert!(verdict.is_unsat());
        }
    }

    #[test]
    fn test_finite_runs_are_not_violations() {
        let model: G = Graph::new([0]).edge(0, 'c', 1).edge(1, 'c', 2);
        for verdict in check_all(&model, &infinitely_often("c")) {
            assert!(verdict.is_unsat());
        }
    }

    #[test]
    fn test_cycle_through_finished_states() {
        // The accepting cycle 0 -> 2 -> 1 -> 0 is closed only after 1 has
        // been fully explored from 0 -> 1.
        let model: G = Graph::new([0])
            .edge(0, 'a', 1)
            .edge(0, 'c', 2)
            .edge(2, 'a', 1)
            .edge(1, 'b', 0);
        for verdict in check_all(&model, &infinitely_often("c")) {
            let lasso = verdict.counterexample().unwrap();
            assert!(lasso.cycle_steps().any(|s| s.action == 'c'));
        }
    }

    #[test]
    fn test_zero_depth_bound_is_inconclusive() {
        let model: G = Graph::new([0]).edge(0, 'c', 0);
        let atoms = actions();
        let aut = PropertyAutomaton::from_decl(&infinitely_often("c"), &atoms).unwrap();
        let explorer = ProductExplorer::new(&model, &atoms, &aut);
        let initial = explorer.initial_states().unwrap();
        for algorithm in [Algorithm::Couvreur, Algorithm::NestedDfs] {
            let verdict = check(&explorer, &initial, algorithm, Some(0)).unwrap();
            assert!(verdict.is_inconclusive());
            let verdict = check(&explorer, &initial, algorithm, Some(1)).unwrap();
            assert!(verdict.is_sat());
        }
    }

    #[test]
    fn test_depth_bound_curtails_long_paths() {
        // 0 -> 1 -> 2 -> 3 -c-> 3
        let model: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'a', 2).edge(2, 'a', 3).edge(3, 'c', 3);
        let atoms = actions();
        let aut = PropertyAutomaton::from_decl(&infinitely_often("c"), &atoms).unwrap();
        let explorer = ProductExplorer::new(&model, &atoms, &aut);
        for config in configs() {
            let shallow = EmptinessChecker::new(config.with_depth_bound(3)).run(&explorer).unwrap();
            assert!(shallow.verdict.is_inconclusive());
            assert_eq!(shallow.statistics.max_depth, 3);
            let deep = EmptinessChecker::new(config.with_depth_bound(4)).check(&explorer).unwrap();
            assert!(deep.is_sat());
        }
    }

    #[test]
    fn test_bound_counts_the_shortest_path() {
        // The loop 2 -c-> 4 -c-> 2 fits in 3 nodes through 0 -b-> 2, but the
        // search first reaches 2 through 0 -> 1 -> 2, where 4 is too deep.
        let model: G = Graph::new([0])
            .edge(0, 'a', 1)
            .edge(0, 'b', 2)
            .edge(1, 'a', 2)
            .edge(2, 'a', 0)
            .edge(2, 'c', 4)
            .edge(4, 'c', 2);
        let atoms = actions();
        let aut = PropertyAutomaton::from_decl(&infinitely_often("c"), &atoms).unwrap();
        let explorer = ProductExplorer::new(&model, &atoms, &aut);
        for config in configs() {
            let verdict = EmptinessChecker::new(config.with_depth_bound(3)).check(&explorer).unwrap();
            let lasso = verdict
                .counterexample()
                .unwrap_or_else(|| panic!("{:?}: got {}", config, verdict.name()));
            lasso.replay(&explorer).unwrap();
            assert!(lasso.cycle_steps().any(|s| s.source == 4));

            let shallow = EmptinessChecker::new(config.with_depth_bound(2)).check(&explorer).unwrap();
            assert!(shallow.is_inconclusive(), "{:?}", config);
        }
    }

    #[test]
    fn test_unsat_under_generous_bound() {
        let model: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'b', 0);
        let atoms = actions();
        let aut = PropertyAutomaton::from_decl(&infinitely_often("c"), &atoms).unwrap();
        let explorer = ProductExplorer::new(&model, &atoms, &aut);
        let outcome = EmptinessChecker::new(CheckerConfig::default().with_depth_bound(10))
            .run(&explorer)
            .unwrap();
        assert!(outcome.verdict.is_unsat());
        assert_eq!(outcome.statistics.states, 2);
        assert_eq!(outcome.statistics.transitions, 2);
        assert_eq!(outcome.statistics.max_depth, 2);
    }

    #[test]
    fn test_generalized_acceptance() {
        // Both `a` and `b` infinitely often.
        let decl = AutomatonDecl::new()
            .state("q")
            .initial("q")
            .acceptance(AcceptanceDecl::Transitions { sets: 2 })
            .marked_transition("q", Expr::atom("a"), "q", [0])
            .marked_transition("q", Expr::atom("b"), "q", [1])
            .transition("q", Expr::atom("c"), "q");
        let atoms = actions();
        let aut = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();

        // 0 -a-> 0 and 0 -c-> 1 -b-> 1: no cycle has both.
        let split: G = Graph::new([0]).edge(0, 'a', 0).edge(0, 'c', 1).edge(1, 'b', 1);
        let explorer = ProductExplorer::new(&split, &atoms, &aut);
        let checker = EmptinessChecker::default();
        assert!(checker.check(&explorer).unwrap().is_unsat());

        // 0 -a-> 1 -c-> 2 -b-> 0
        let joint: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'c', 2).edge(2, 'b', 0);
        let explorer = ProductExplorer::new(&joint, &atoms, &aut);
        let verdict = checker.check(&explorer).unwrap();
        let lasso = verdict.counterexample().unwrap();
        lasso.replay(&explorer).unwrap();
        assert_eq!(lasso.cycle.len(), 3);

        let nested = EmptinessChecker::new(CheckerConfig::default().with_algorithm(Algorithm::NestedDfs));
        let err = nested.check(&explorer).unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedAcceptance { sets: 2, .. }));
    }

    #[test]
    fn test_zero_acceptance_sets_accept_any_cycle() {
        let decl = AutomatonDecl::new()
            .state("q")
            .initial("q")
            .acceptance(AcceptanceDecl::States(vec![]))
            .transition("q", Expr::True, "q");
        let model: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'b', 2).edge(2, 'c', 1);
        for verdict in check_all(&model, &decl) {
            let lasso = verdict.counterexample().unwrap();
            assert_eq!(lasso.prefix.len(), 1);
            assert_eq!(lasso.cycle.len(), 2);
        }
    }

    #[test]
    fn test_config_parsing() {
        assert_eq!("nested-dfs".parse::<Algorithm>(), Ok(Algorithm::NestedDfs));
        assert_eq!("couvreur".parse::<Algorithm>(), Ok(Algorithm::Couvreur));
        assert!("tarjan".parse::<Algorithm>().is_err());
        assert_eq!("buffered".parse::<TraversalStrategy>(), Ok(TraversalStrategy::Buffered));
        let config = CheckerConfig::default().with_depth_bound(5).unbounded();
        assert_eq!(config, CheckerConfig::default());
    }

    #[test]
    fn test_finite_violation_is_a_shortest_prefix() {
        // Invariant `!c`: 0 -a-> 1 -a-> 2 -c-> 3 and the shortcut 0 -b-> 2.
        let model: G = Graph::new([0])
            .edge(0, 'a', 1)
            .edge(0, 'b', 2)
            .edge(1, 'a', 2)
            .edge(2, 'c', 3)
            .edge(3, 'a', 3);
        let decl = AutomatonDecl::invariant(Expr::not(Expr::atom("c")));
        for verdict in check_all(&model, &decl) {
            let lasso = verdict.counterexample().unwrap();
            assert!(lasso.is_finite());
            assert_eq!(lasso.prefix_steps().map(|s| s.action).collect::<String>(), "bc");
        }

        // A finite automaton needs no cycle: the same model without the loop.
        let acyclic: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'c', 2);
        for verdict in check_all(&acyclic, &decl) {
            assert!(verdict.counterexample().is_some_and(|c| c.prefix.len() == 2));
        }

        let safe: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'b', 0);
        for verdict in check_all(&safe, &decl) {
            assert!(verdict.is_unsat());
        }
    }

    #[test]
    fn test_finite_depth_bound() {
        let model: G = Graph::new([0]).edge(0, 'a', 1).edge(1, 'a', 2).edge(2, 'c', 2);
        let atoms = actions();
        let aut = PropertyAutomaton::from_decl(&AutomatonDecl::invariant(Expr::not(Expr::atom("c"))), &atoms).unwrap();
        let explorer = ProductExplorer::new(&model, &atoms, &aut);
        for config in configs() {
            let verdicts: Vec<_> = (0..5)
                .map(|bound| EmptinessChecker::new(config.with_depth_bound(bound)).check(&explorer).unwrap())
                .collect();
            // The violating step leaves the state at distance 2.
            let names: Vec<_> = verdicts.iter().map(Verdict::name).collect();
            assert_eq!(names, ["INCONCLUSIVE", "INCONCLUSIVE", "INCONCLUSIVE", "SAT", "SAT"], "{:?}", config);
            verdicts[3].counterexample().unwrap().replay(&explorer).unwrap();
        }
    }
}
