//! Token ring.
//!
//! `n` processes pass a token around a ring. The holder may enter its
//! critical section, leave it, or pass the token on to its neighbour.
//!
//! ```bash
//! cargo run --example ring -- 5 --property starvation --algorithm nested-dfs
//! ```

use clap::{Parser, ValueEnum};
use log::info;

use buchi_rs::emptiness::{Algorithm, CheckerConfig, TraversalStrategy, Verdict};
use buchi_rs::error::ModelError;
use buchi_rs::model::{AtomTable, SemanticRelation, Step};
use buchi_rs::model_checker::ModelChecker;
use buchi_rs::syntax::{AutomatonDecl, Expr, Property};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct Ring {
    holder: u32,
    critical: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum Action {
    Enter,
    Leave,
    Pass,
}

struct TokenRing {
    size: u32,
}

impl SemanticRelation for TokenRing {
    type State = Ring;
    type Action = Action;
    type Steps<'a> = std::vec::IntoIter<Result<Step<Ring, Action>, ModelError>>;

    fn initial(&self) -> Result<Vec<Ring>, ModelError> {
        if self.size == 0 {
            return Err(ModelError::new("the ring needs at least one process"));
        }
        Ok(vec![Ring {
            holder: 0,
            critical: false,
        }])
    }

    fn next(&self, state: &Ring) -> Self::Steps<'_> {
        let s = *state;
        let steps = if s.critical {
            vec![Step::new(s, Action::Leave, Ring { critical: false, ..s })]
        } else {
            vec![
                Step::new(s, Action::Enter, Ring { critical: true, ..s }),
                Step::new(
                    s,
                    Action::Pass,
                    Ring {
                        holder: (s.holder + 1) % self.size,
                        critical: false,
                    },
                ),
            ]
        };
        steps.into_iter().map(Ok).collect::<Vec<_>>().into_iter()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Check {
    /// Process 0 enters its critical section infinitely often (violated).
    Starvation,
    /// The token keeps moving (violated: a process may keep entering).
    Progress,
    /// A process only leaves a critical section it has entered (holds).
    Safety,
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of processes.
    #[arg(value_name = "INT", default_value = "4")]
    size: u32,

    /// Property to check.
    #[arg(long, value_enum, default_value = "starvation")]
    property: Check,

    /// Emptiness algorithm: `couvreur` or `nested-dfs`.
    #[arg(long, default_value = "couvreur")]
    algorithm: Algorithm,

    /// Successor traversal: `lazy` or `buffered`.
    #[arg(long, default_value = "lazy")]
    traversal: TraversalStrategy,

    /// Maximum search depth.
    #[arg(long, value_name = "INT")]
    depth_bound: Option<usize>,
}

/// Violation automaton "eventually `atom` never holds again".
fn finitely_often(atom: &str) -> Property {
    Property::automaton(
        AutomatonDecl::new()
            .state("any")
            .state("never")
            .initial("any")
            .accepting(["never"])
            .transition("any", Expr::True, "any")
            .transition("any", Expr::True, "never")
            .transition("never", Expr::not(Expr::atom(atom)), "never"),
    )
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let atoms = AtomTable::new()
        .with("enter0", |s: &Step<Ring, Action>| s.action == Action::Enter && s.source.holder == 0)
        .with("pass", |s: &Step<Ring, Action>| s.action == Action::Pass)
        .with("bad_leave", |s: &Step<Ring, Action>| s.action == Action::Leave && !s.source.critical);

    let property = match args.property {
        Check::Starvation => finitely_often("enter0"),
        Check::Progress => finitely_often("pass"),
        // Violation: eventually a bad leave.
        Check::Safety => Property::automaton(
            AutomatonDecl::new()
                .state("ok")
                .state("bad")
                .initial("ok")
                .accepting(["bad"])
                .transition("ok", Expr::True, "ok")
                .transition("ok", Expr::atom("bad_leave"), "bad")
                .transition("bad", Expr::True, "bad"),
        ),
    };

    let mut config = CheckerConfig::default()
        .with_algorithm(args.algorithm)
        .with_traversal(args.traversal);
    if let Some(bound) = args.depth_bound {
        config = config.with_depth_bound(bound);
    }

    let checker = ModelChecker::new(TokenRing { size: args.size }, atoms, &property, None)?
        .named(format!("{:?}", args.property))
        .with_config(config);
    let outcome = checker.run()?;

    match &outcome.verdict {
        Verdict::Sat(lasso) => {
            println!("property violated:");
            print!("{}", lasso);
            lasso.replay(&checker.explorer())?;
            info!("counterexample replayed successfully");
        }
        Verdict::Unsat => println!("property holds"),
        Verdict::Inconclusive => println!("inconclusive: the depth bound cut the search short"),
    }
    println!("statistics = {:?}", outcome.statistics);

    let time_total = time_total.elapsed();
    println!("\nAll done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
