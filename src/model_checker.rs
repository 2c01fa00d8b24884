//! One-call model checking: a model, an atom evaluator and a property.

use log::debug;

use crate::automaton::PropertyAutomaton;
use crate::emptiness::{CheckerConfig, EmptinessChecker, Outcome, Verdict};
use crate::error::{CheckError, PropertyCompilationError};
use crate::model::{AtomEvaluator, SemanticRelation};
use crate::product::ProductExplorer;
use crate::syntax::Property;
use crate::translate::Translator;

/// Owns everything a check needs.
///
/// ```
/// use buchi_rs::model::{Graph, Step};
/// use buchi_rs::model_checker::ModelChecker;
/// use buchi_rs::syntax::{AutomatonDecl, Expr, Property};
///
/// let model = Graph::new(["idle"]).edge("idle", "go", "busy").edge("busy", "done", "idle");
/// let atoms = |atom: &str, step: &Step<&'static str, &'static str>| step.action == atom;
///
/// // Violation: eventually `done` never happens again.
/// let property = Property::automaton(
///     AutomatonDecl::new()
///         .state("any")
///         .state("quiet")
///         .initial("any")
///         .accepting(["quiet"])
///         .transition("any", Expr::True, "any")
///         .transition("any", Expr::True, "quiet")
///         .transition("quiet", Expr::not(Expr::atom("done")), "quiet"),
/// );
/// let checker = ModelChecker::new(model, atoms, &property, None).unwrap();
/// assert!(checker.check().unwrap().is_unsat());
/// ```
pub struct ModelChecker<M, E> {
    model: M,
    evaluator: E,
    automaton: PropertyAutomaton,
    config: CheckerConfig,
}

impl<M, E> ModelChecker<M, E>
where
    M: SemanticRelation,
    E: AtomEvaluator<M::State, M::Action>,
{
    /// Compiles `property` against `evaluator`. The translator is only needed
    /// for formula properties.
    pub fn new(
        model: M,
        evaluator: E,
        property: &Property,
        translator: Option<&dyn Translator>,
    ) -> Result<Self, PropertyCompilationError> {
        let automaton = PropertyAutomaton::compile(property, &evaluator, translator)?;
        Ok(Self::from_automaton(model, evaluator, automaton))
    }

    pub fn from_automaton(model: M, evaluator: E, automaton: PropertyAutomaton) -> Self {
        Self {
            model,
            evaluator,
            automaton,
            config: CheckerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.config = config;
        self
    }

    /// Names the property in logs and errors.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.automaton = self.automaton.named(name);
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn automaton(&self) -> &PropertyAutomaton {
        &self.automaton
    }

    pub fn explorer(&self) -> ProductExplorer<'_, M, E> {
        ProductExplorer::new(&self.model, &self.evaluator, &self.automaton)
    }

    pub fn check(&self) -> Result<Verdict<M::State, M::Action>, CheckError> {
        Ok(self.run()?.verdict)
    }

    pub fn run(&self) -> Result<Outcome<M::State, M::Action>, CheckError> {
        debug!(
            "model checking {} ({} automaton states)",
            self.automaton.name().unwrap_or("<anonymous>"),
            self.automaton.num_states()
        );
        EmptinessChecker::new(self.config).run(&self.explorer())
    }
}
