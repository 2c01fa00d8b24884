use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use test_log::test;

use buchi_rs::automaton::PropertyAutomaton;
use buchi_rs::dimacs;
use buchi_rs::emptiness::{self, Algorithm, CheckerConfig, EmptinessChecker, TraversalStrategy, Verdict};
use buchi_rs::error::{CheckError, DimacsError, ModelError};
use buchi_rs::marks::Marks;
use buchi_rs::model::{AtomTable, Graph, SemanticRelation, Step};
use buchi_rs::product::{ProductExplorer, ProductState};
use buchi_rs::syntax::{AcceptanceDecl, AutomatonDecl, Expr, TransitionDecl};
use buchi_rs::types::StateId;

const ALGORITHMS: [Algorithm; 2] = [Algorithm::Couvreur, Algorithm::NestedDfs];
const TRAVERSALS: [TraversalStrategy; 2] = [TraversalStrategy::Lazy, TraversalStrategy::Buffered];

fn configs() -> impl Iterator<Item = CheckerConfig> {
    ALGORITHMS.into_iter().flat_map(|algorithm| {
        TRAVERSALS.into_iter().map(move |traversal| {
            CheckerConfig::default()
                .with_algorithm(algorithm)
                .with_traversal(traversal)
        })
    })
}

fn on_action<S: 'static>(c: char) -> impl Fn(&Step<S, char>) -> bool + Send + Sync + 'static {
    move |step: &Step<S, char>| step.action == c
}

/// `s0 -a-> s1`, `s1 -b-> s0`, `s1 -c-> s1`.
fn two_states() -> Graph<&'static str, char> {
    Graph::new(["s0"])
        .edge("s0", 'a', "s1")
        .edge("s1", 'b', "s0")
        .edge("s1", 'c', "s1")
}

fn labels<S: 'static>() -> AtomTable<S, char> {
    AtomTable::new().with("a", on_action('a')).with("c", on_action('c'))
}

/// Violation: infinitely many `c` steps.
fn infinitely_many_c() -> AutomatonDecl {
    AutomatonDecl::new()
        .state("q0")
        .initial("q0")
        .acceptance(AcceptanceDecl::Transitions { sets: 1 })
        .marked_transition("q0", Expr::atom("c"), "q0", [0])
        .transition("q0", Expr::not(Expr::atom("c")), "q0")
}

/// Violation: an `a` step immediately followed by another `a` step.
fn two_consecutive_a() -> AutomatonDecl {
    AutomatonDecl::new()
        .state("wait")
        .state("one")
        .state("two")
        .initial("wait")
        .accepting(["two"])
        .transition("wait", Expr::True, "wait")
        .transition("wait", Expr::atom("a"), "one")
        .transition("one", Expr::atom("a"), "two")
        .transition("two", Expr::True, "two")
}

#[test]
fn test_infinitely_many_c_is_the_self_loop() {
    let model = two_states();
    let atoms = labels();
    let automaton = PropertyAutomaton::from_decl(&infinitely_many_c(), &atoms).unwrap();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);

    for config in configs() {
        let verdict = EmptinessChecker::new(config).check(&explorer).unwrap();
        let lasso = verdict.counterexample().unwrap_or_else(|| panic!("{:?}: expected SAT", config));
        lasso.replay(&explorer).unwrap();

        let prefix: Vec<_> = lasso.prefix_steps().cloned().collect();
        let cycle: Vec<_> = lasso.cycle_steps().cloned().collect();
        assert_eq!(prefix, vec![Step::new("s0", 'a', "s1")], "{:?}", config);
        assert_eq!(cycle, vec![Step::new("s1", 'c', "s1")], "{:?}", config);
    }
}

#[test]
fn test_two_consecutive_a_is_unsat() {
    let model = two_states();
    let atoms = labels();
    let automaton = PropertyAutomaton::from_decl(&two_consecutive_a(), &atoms).unwrap();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);

    for config in configs() {
        let outcome = EmptinessChecker::new(config).run(&explorer).unwrap();
        assert!(outcome.verdict.is_unsat(), "{:?}: got {}", config, outcome.verdict.name());
        assert!(outcome.statistics.states > 0);
    }
}

#[test]
fn test_check_entry_point() {
    let model = two_states();
    let atoms = labels();
    let automaton = PropertyAutomaton::from_decl(&infinitely_many_c(), &atoms).unwrap();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);
    let initial = explorer.initial_states().unwrap();

    for algorithm in ALGORITHMS {
        assert!(emptiness::check(&explorer, &initial, algorithm, None).unwrap().is_sat());
        // A single node cannot close the `a` edge into the loop.
        assert!(emptiness::check(&explorer, &initial, algorithm, Some(1))
            .unwrap()
            .is_inconclusive());
        assert!(emptiness::check(&explorer, &initial, algorithm, Some(2)).unwrap().is_sat());
        assert!(emptiness::check(&explorer, &[], algorithm, None).unwrap().is_unsat());
    }
}

#[test]
fn test_repeated_checks_are_identical() {
    let model = two_states();
    let atoms = labels();
    let automaton = PropertyAutomaton::from_decl(&infinitely_many_c(), &atoms).unwrap();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);

    for config in configs() {
        let checker = EmptinessChecker::new(config);
        let first = checker.run(&explorer).unwrap();
        let second = checker.run(&explorer).unwrap();
        assert_eq!(first.verdict.counterexample(), second.verdict.counterexample());
        assert_eq!(first.statistics, second.statistics);
    }
}

#[test]
fn test_concurrent_checks_share_inputs() {
    let model = two_states();
    let atoms = labels();
    let automaton = PropertyAutomaton::from_decl(&infinitely_many_c(), &atoms).unwrap();

    let expected = {
        let explorer = ProductExplorer::new(&model, &atoms, &automaton);
        EmptinessChecker::default().check(&explorer).unwrap().into_counterexample()
    };
    assert!(expected.is_some());

    let (model, atoms, automaton) = (&model, &atoms, &automaton);
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let explorer = ProductExplorer::new(model, atoms, automaton);
                    EmptinessChecker::default().check(&explorer).unwrap().into_counterexample()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn test_cnf_guard() {
    let cnf = dimacs::parse("c x1 or not x2\np cnf 2 1\n1 -2 0\n").unwrap();
    let guard = cnf.to_expr();

    let model: Graph<u8, (bool, bool)> = Graph::new([0])
        .edge(0, (true, false), 1)
        .edge(1, (false, true), 0)
        .edge(1, (true, true), 1);
    let atoms = AtomTable::new()
        .with("x1", |s: &Step<u8, (bool, bool)>| s.action.0)
        .with("x2", |s: &Step<u8, (bool, bool)>| s.action.1);
    // Violation: eventually the clause holds on every step.
    let decl = AutomatonDecl::new()
        .state("wait")
        .state("hold")
        .initial("wait")
        .accepting(["hold"])
        .transition("wait", Expr::True, "wait")
        .transition("wait", guard.clone(), "hold")
        .transition("hold", guard, "hold");
    let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);

    for config in configs() {
        let verdict = EmptinessChecker::new(config).check(&explorer).unwrap();
        let lasso = verdict.counterexample().unwrap();
        lasso.replay(&explorer).unwrap();
        assert!(lasso.cycle_steps().all(|s| s.action.0 || !s.action.1));
    }
}

#[test]
fn test_unterminated_dimacs_clause() {
    let err = dimacs::parse("p cnf 2 1\n1 2").unwrap_err();
    assert!(matches!(err, DimacsError::UnterminatedClause { .. }), "{:?}", err);
    assert_eq!(err.to_string(), "line 2: clause not terminated by 0");
}

/// `n -t-> n + 1` forever.
struct Ticker;

impl SemanticRelation for Ticker {
    type State = u64;
    type Action = char;
    type Steps<'a> = std::iter::Once<Result<Step<u64, char>, ModelError>>;

    fn initial(&self) -> Result<Vec<u64>, ModelError> {
        Ok(vec![0])
    }

    fn next(&self, state: &u64) -> Self::Steps<'_> {
        std::iter::once(Ok(Step::new(*state, 't', state + 1)))
    }
}

/// Like [`Ticker`], but the model fails to expand state 3.
struct Flaky;

impl SemanticRelation for Flaky {
    type State = u64;
    type Action = char;
    type Steps<'a> = std::iter::Once<Result<Step<u64, char>, ModelError>>;

    fn initial(&self) -> Result<Vec<u64>, ModelError> {
        Ok(vec![0])
    }

    fn next(&self, state: &u64) -> Self::Steps<'_> {
        if *state == 3 {
            std::iter::once(Err(ModelError::new("state 3 is corrupt")))
        } else {
            std::iter::once(Ok(Step::new(*state, 't', state + 1)))
        }
    }
}

fn ticks() -> (AtomTable<u64, char>, PropertyAutomaton) {
    let atoms = AtomTable::new().with("c", on_action('t'));
    let automaton = PropertyAutomaton::from_decl(&infinitely_many_c(), &atoms).unwrap();
    (atoms, automaton)
}

#[test]
fn test_infinite_model_with_bound_is_inconclusive() {
    let (atoms, automaton) = ticks();
    let explorer = ProductExplorer::new(&Ticker, &atoms, &automaton);

    for config in configs() {
        let outcome = EmptinessChecker::new(config.with_depth_bound(50)).run(&explorer).unwrap();
        assert!(outcome.verdict.is_inconclusive(), "{:?}", config);
        assert_eq!(outcome.statistics.max_depth, 50);
    }
}

#[test]
fn test_invariant_breaks_on_an_infinite_model() {
    let atoms = AtomTable::new().with("late", |s: &Step<u64, char>| s.source >= 5);
    let decl = AutomatonDecl::invariant(Expr::not(Expr::atom("late")));
    let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
    let explorer = ProductExplorer::new(&Ticker, &atoms, &automaton);

    for config in configs() {
        let outcome = EmptinessChecker::new(config).run(&explorer).unwrap();
        let lasso = outcome.verdict.counterexample().unwrap();
        assert!(lasso.is_finite());
        assert_eq!(lasso.prefix.len(), 6);
        assert_eq!(lasso.prefix_steps().last(), Some(&Step::new(5, 't', 6)));
        assert_eq!(automaton.state_name(lasso.prefix[5].to.automaton), "x");
        lasso.replay(&explorer).unwrap();
        assert_eq!(outcome.statistics.states, 6);

        let shallow = EmptinessChecker::new(config.with_depth_bound(5)).check(&explorer).unwrap();
        assert!(shallow.is_inconclusive());
    }
}

#[test]
fn test_model_error_aborts_check() {
    let (atoms, automaton) = ticks();
    let automaton = automaton.named("ticks forever");
    let explorer = ProductExplorer::new(&Flaky, &atoms, &automaton);

    for config in configs() {
        match EmptinessChecker::new(config).check(&explorer) {
            Err(CheckError::ModelEvaluation(err)) => {
                assert_eq!(err.property, "ticks forever");
                assert_eq!(err.state, "(3, q0)");
                assert_eq!(err.source.message(), "state 3 is corrupt");
            }
            other => panic!("{:?}: expected a model evaluation error, got {:?}", config, other.map(|v| v.name())),
        }
    }
}

#[test]
fn test_nested_dfs_rejects_generalized_acceptance() {
    let model = two_states();
    let atoms = labels();
    let decl = AutomatonDecl::new()
        .state("q0")
        .initial("q0")
        .acceptance(AcceptanceDecl::Transitions { sets: 2 })
        .marked_transition("q0", Expr::atom("a"), "q0", [0])
        .marked_transition("q0", Expr::atom("c"), "q0", [1])
        .transition("q0", Expr::True, "q0");
    let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);

    let nested = EmptinessChecker::new(CheckerConfig::default().with_algorithm(Algorithm::NestedDfs));
    assert!(matches!(
        nested.check(&explorer),
        Err(CheckError::UnsupportedAcceptance { sets: 2, .. })
    ));
    // `s0 -a-> s1 -c-> s1 -b-> s0` collects both sets.
    let verdict = EmptinessChecker::default().check(&explorer).unwrap();
    let lasso = verdict.counterexample().unwrap();
    lasso.replay(&explorer).unwrap();
    assert!(lasso.cycle_marks(&automaton).covers(2));
}

/// `0 -a-> 1`, `1 -b-> 2` followed by endless `1 -e-> n` to fresh states,
/// `2 -c-> 1` and `2 -d-> 0`.
#[derive(Default)]
struct Fan {
    fresh: AtomicUsize,
}

impl SemanticRelation for Fan {
    type State = u64;
    type Action = char;
    type Steps<'a> = Box<dyn Iterator<Item = Result<Step<u64, char>, ModelError>> + 'a>;

    fn initial(&self) -> Result<Vec<u64>, ModelError> {
        Ok(vec![0])
    }

    fn next(&self, state: &u64) -> Self::Steps<'_> {
        match *state {
            0 => Box::new(std::iter::once(Ok(Step::new(0, 'a', 1)))),
            1 => Box::new(std::iter::once(Ok(Step::new(1, 'b', 2))).chain((100..).map(move |n| {
                self.fresh.fetch_add(1, Ordering::SeqCst);
                Ok(Step::new(1, 'e', n))
            }))),
            2 => Box::new([Ok(Step::new(2, 'c', 1)), Ok(Step::new(2, 'd', 0))].into_iter()),
            _ => Box::new(std::iter::empty()),
        }
    }
}

#[test]
fn test_counterexample_does_not_expand_the_model_further() {
    let atoms = AtomTable::new().with("a", on_action('a')).with("c", on_action('c'));
    // Both `a` and `c` infinitely often: only `0 -a-> 1 -b-> 2 -c-> 1 -b-> 2 -d-> 0`
    // style cycles qualify, and the stack cycle through 0 alone misses set 1.
    let decl = AutomatonDecl::new()
        .state("q0")
        .initial("q0")
        .acceptance(AcceptanceDecl::Transitions { sets: 2 })
        .marked_transition("q0", Expr::atom("a"), "q0", [0])
        .marked_transition("q0", Expr::atom("c"), "q0", [1])
        .transition("q0", Expr::and(Expr::not(Expr::atom("a")), Expr::not(Expr::atom("c"))), "q0");
    let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
    let model = Fan::default();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);

    let verdict = EmptinessChecker::default().check(&explorer).unwrap();
    assert_eq!(model.fresh.load(Ordering::SeqCst), 0);

    let lasso = verdict.counterexample().unwrap();
    assert!(lasso.prefix.is_empty());
    let actions: String = lasso.cycle_steps().map(|s| s.action).collect();
    assert_eq!(actions, "abcbd");
    assert!(lasso.cycle_marks(&automaton).covers(2));
    lasso.replay(&explorer).unwrap();
}

#[test]
fn test_every_initial_pair_is_tried() {
    // Only `1 -c-> 1` read from `hunt` is a violation.
    let model: Graph<u8, char> = Graph::new([0, 1]).edge(0, 'a', 0).edge(1, 'c', 1);
    let atoms = labels();
    let decl = AutomatonDecl::new()
        .state("idle")
        .state("hunt")
        .initial("idle")
        .initial("hunt")
        .acceptance(AcceptanceDecl::Transitions { sets: 1 })
        .transition("idle", Expr::True, "idle")
        .marked_transition("hunt", Expr::atom("c"), "hunt", [0])
        .transition("hunt", Expr::not(Expr::atom("c")), "hunt");
    let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);

    let initial = explorer.initial_states().unwrap();
    let hunting = ProductState::new(1, StateId::new(1));
    assert_eq!(initial.len(), 4);
    assert_eq!(initial.last(), Some(&hunting));

    for config in configs() {
        let checker = EmptinessChecker::new(config);
        let verdict = checker.check(&explorer).unwrap();
        let lasso = verdict.counterexample().unwrap_or_else(|| panic!("{:?}: expected SAT", config));
        assert_eq!(lasso.start(), Some(&hunting), "{:?}", config);
        assert!(lasso.prefix.is_empty());
        assert_eq!(lasso.cycle_steps().cloned().collect::<Vec<_>>(), vec![Step::new(1, 'c', 1)]);
        lasso.replay(&explorer).unwrap();

        let others: Vec<_> = initial.iter().filter(|&s| *s != hunting).cloned().collect();
        assert!(checker.check_from(&explorer, &others).unwrap().is_unsat(), "{:?}", config);
    }

    // Without model state 1 nothing is left to find.
    let model: Graph<u8, char> = Graph::new([0]).edge(0, 'a', 0).edge(1, 'c', 1);
    let explorer = ProductExplorer::new(&model, &atoms, &automaton);
    for config in configs() {
        assert!(EmptinessChecker::new(config).check(&explorer).unwrap().is_unsat());
    }
}

// Random products against an explicit ground truth.

const ACTIONS: [char; 3] = ['a', 'b', 'c'];

fn random_model(rng: &mut ChaCha8Rng) -> Graph<u8, char> {
    let n = rng.gen_range(1..=6u8);
    let initial: Vec<u8> = (0..n).filter(|&s| s == 0 || rng.gen_bool(0.2)).collect();
    let mut model = Graph::new(initial);
    for s in 0..n {
        for _ in 0..rng.gen_range(0..=3) {
            let action = ACTIONS[rng.gen_range(0..ACTIONS.len())];
            model.add_edge(s, action, rng.gen_range(0..n));
        }
    }
    model
}

fn random_guard(rng: &mut ChaCha8Rng) -> Expr {
    match rng.gen_range(0..5) {
        0 => Expr::True,
        1 => Expr::atom("a"),
        2 => Expr::not(Expr::atom("a")),
        3 => Expr::atom("b"),
        _ => Expr::or(Expr::atom("b"), Expr::atom("c")),
    }
}

fn random_automaton(rng: &mut ChaCha8Rng, sets: usize) -> AutomatonDecl {
    let n = rng.gen_range(1..=3usize);
    let name = |i: usize| format!("q{}", i);
    let transition_based = rng.gen_bool(0.5);

    let mut decl = AutomatonDecl::new().initial(name(0));
    for i in 0..n {
        decl = decl.state(name(i));
        if i > 0 && rng.gen_bool(0.3) {
            decl = decl.initial(name(i));
        }
    }
    decl = if transition_based {
        decl.acceptance(AcceptanceDecl::Transitions { sets })
    } else {
        let accepting: Vec<Vec<String>> = (0..sets)
            .map(|_| (0..n).filter(|_| rng.gen_bool(0.4)).map(name).collect())
            .collect();
        decl.acceptance(AcceptanceDecl::States(accepting))
    };
    for i in 0..n {
        for _ in 0..rng.gen_range(1..=3) {
            let marks = if transition_based {
                (0..sets).filter(|_| rng.gen_bool(0.4)).collect()
            } else {
                Vec::new()
            };
            decl = decl.transition_with(TransitionDecl {
                source: name(i),
                priority: rng.gen_range(0..=1),
                guard: random_guard(rng),
                target: name(rng.gen_range(0..n)),
                marks,
            });
        }
    }
    decl
}

fn random_atoms() -> AtomTable<u8, char> {
    AtomTable::new()
        .with("a", on_action('a'))
        .with("b", on_action('b'))
        .with("c", on_action('c'))
}

/// Builds the product explicitly, breadth-first from the initial states and
/// keeping only the states at distance less than `bound`, then looks for a
/// strongly connected component whose inner edges cover every acceptance
/// set.
fn has_accepting_cycle(
    explorer: &ProductExplorer<'_, Graph<u8, char>, AtomTable<u8, char>>,
    bound: Option<usize>,
) -> (bool, usize) {
    let sets = explorer.automaton().acceptance_sets();
    let within = |distance: usize| bound.map_or(true, |b| distance < b);
    let mut index = HashMap::new();
    let mut states = Vec::new();
    let mut queue = VecDeque::new();
    if within(0) {
        for s in explorer.initial_states().unwrap() {
            if !index.contains_key(&s) {
                index.insert(s.clone(), states.len());
                states.push(s.clone());
                queue.push_back((s, 0));
            }
        }
    }
    let mut edges: Vec<Vec<(usize, Marks)>> = Vec::new();
    while let Some((s, distance)) = queue.pop_front() {
        let mut out = Vec::new();
        for succ in explorer.successors(&s) {
            let succ = succ.unwrap();
            let marks = explorer.edge_marks(&s, succ.transition).clone();
            if !index.contains_key(&succ.target) {
                if !within(distance + 1) {
                    continue;
                }
                index.insert(succ.target.clone(), states.len());
                states.push(succ.target.clone());
                queue.push_back((succ.target.clone(), distance + 1));
            }
            out.push((index[&succ.target], marks));
        }
        edges.push(out);
    }

    let n = states.len();
    let reach: Vec<HashSet<usize>> = (0..n)
        .map(|u| {
            let mut seen = HashSet::from([u]);
            let mut stack = vec![u];
            while let Some(x) = stack.pop() {
                for (y, _) in &edges[x] {
                    if seen.insert(*y) {
                        stack.push(*y);
                    }
                }
            }
            seen
        })
        .collect();

    let mut component_marks: HashMap<usize, Marks> = HashMap::new();
    let mut cyclic = HashSet::new();
    for x in 0..n {
        let rep = (0..n)
            .find(|&r| reach[x].contains(&r) && reach[r].contains(&x))
            .unwrap_or(x);
        for (y, marks) in &edges[x] {
            if reach[*y].contains(&x) {
                cyclic.insert(rep);
                component_marks.entry(rep).or_insert_with(Marks::empty).union_with(marks);
            }
        }
    }
    let accepting = cyclic.iter().any(|rep| component_marks[rep].covers(sets));
    (accepting, n)
}

#[test]
fn test_random_products_against_ground_truth() {
    for seed in 0..300 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let model = random_model(&mut rng);
        let atoms = random_atoms();
        let sets = rng.gen_range(0..=2);
        let decl = random_automaton(&mut rng, sets);
        let automaton = PropertyAutomaton::from_decl(&decl, &atoms).unwrap();
        let explorer = ProductExplorer::new(&model, &atoms, &automaton);
        let (expected, num_states) = has_accepting_cycle(&explorer, None);
        let within_bound: Vec<bool> = (0..=num_states)
            .map(|bound| has_accepting_cycle(&explorer, Some(bound)).0)
            .collect();

        for config in configs() {
            if config.algorithm == Algorithm::NestedDfs && sets > 1 {
                continue;
            }
            let verdict = EmptinessChecker::new(config).check(&explorer).unwrap();
            assert_eq!(verdict.is_sat(), expected, "seed {}, {:?}", seed, config);
            assert!(!verdict.is_inconclusive(), "seed {}, {:?}", seed, config);
            if let Verdict::Sat(lasso) = &verdict {
                lasso
                    .replay(&explorer)
                    .unwrap_or_else(|e| panic!("seed {}, {:?}: {}", seed, config, e));
            }

            // A bound of at least the number of product states never truncates.
            let bounded = EmptinessChecker::new(config.with_depth_bound(num_states.max(1)))
                .check(&explorer)
                .unwrap();
            assert_eq!(bounded.counterexample(), verdict.counterexample(), "seed {}", seed);
            assert_eq!(bounded.name(), verdict.name(), "seed {}", seed);

            // Smaller bounds find a counterexample exactly when one lies among
            // the states they can reach, so raising the bound never loses one.
            let mut was_sat = false;
            for (bound, &reachable) in within_bound.iter().enumerate() {
                let bounded = EmptinessChecker::new(config.with_depth_bound(bound))
                    .check(&explorer)
                    .unwrap();
                assert_eq!(bounded.is_sat(), reachable, "seed {}, bound {}, {:?}", seed, bound, config);
                assert!(!(was_sat && !bounded.is_sat()), "seed {}, bound {}, {:?}", seed, bound, config);
                if bounded.is_unsat() {
                    assert!(!expected, "seed {}, bound {}, {:?}", seed, bound, config);
                }
                if let Some(lasso) = bounded.counterexample() {
                    lasso.replay(&explorer).unwrap();
                }
                was_sat = bounded.is_sat();
            }
        }
    }
}
