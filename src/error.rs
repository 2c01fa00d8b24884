//! Error taxonomy.
//!
//! Every error raised by an external collaborator (the model, the translator)
//! is wrapped with context and handed back to the caller. Nothing here is
//! retried internally: emptiness checking is deterministic.

use std::io;

/// Failure raised by a [`SemanticRelation`][crate::model::SemanticRelation]
/// implementation while enumerating initial states or steps.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ModelError {
    message: String,
}

impl ModelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure of the external LTL-to-Büchi translator.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("failed to run translator `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The translator exited unsuccessfully. `diagnostic` is its raw stderr.
    #[error("translator failed (exit status {status:?}): {diagnostic}")]
    Failed {
        status: Option<i32>,
        diagnostic: String,
    },
    #[error("translator produced non UTF-8 output")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The property could not be compiled into a [`PropertyAutomaton`][crate::automaton::PropertyAutomaton].
#[derive(Debug, thiserror::Error)]
pub enum PropertyCompilationError {
    #[error("atom `{0}` cannot be resolved by the atom evaluator")]
    UnresolvedAtom(String),
    #[error("automaton has no initial state")]
    NoInitialState,
    #[error("transition or declaration references unknown state `{0}`")]
    UnknownState(String),
    #[error("state `{0}` is declared twice")]
    DuplicateState(String),
    #[error("acceptance mark {mark} is out of range (automaton declares {sets} sets)")]
    MarkOutOfRange { mark: usize, sets: usize },
    #[error("guard must be propositional, found temporal operator `{0}`")]
    TemporalGuard(&'static str),
    #[error("formula properties need a translator")]
    MissingTranslator,
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error("malformed automaton description at line {line}: {reason}")]
    MalformedDescription { line: usize, reason: String },
    #[error("invalid guard `{text}`: {reason}")]
    InvalidGuard { text: String, reason: String },
    #[error("`{0}` is not bound by an enclosing let")]
    UnboundReference(String),
}

/// A model enumeration failure, with the product state being expanded.
#[derive(Debug, Clone, thiserror::Error)]
#[error("model evaluation failed for property `{property}` in state {state}: {source}")]
pub struct ModelEvaluationError {
    /// Name of the property being checked (`<anonymous>` if unnamed).
    pub property: String,
    /// Debug rendering of the product state whose successors were requested,
    /// or `<initial>` when the initial states could not be enumerated.
    pub state: String,
    #[source]
    pub source: ModelError,
}

/// Errors aborting an emptiness check.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    ModelEvaluation(#[from] ModelEvaluationError),
    #[error("{algorithm} supports at most one acceptance set, automaton has {sets}")]
    UnsupportedAcceptance { algorithm: &'static str, sets: usize },
}

/// A counterexample does not describe a run of the product.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("lasso starts in {0}, which is not an initial product state")]
    NotInitial(String),
    #[error("lasso cycle is empty")]
    EmptyCycle,
    #[error("finite counterexample has no steps")]
    EmptyPrefix,
    #[error("finite automata have no cycle in their counterexamples")]
    UnexpectedCycle,
    #[error("finite counterexample does not end in acceptance")]
    NotFinal,
    #[error("edge {index} does not start where the previous edge ended")]
    Disconnected { index: usize },
    #[error("edge {index} is not a product successor of its source")]
    NotASuccessor { index: usize },
    #[error("cycle does not return to its first state")]
    NotPeriodic,
    #[error("cycle misses acceptance sets {missing}")]
    NotAccepting { missing: String },
    #[error(transparent)]
    ModelEvaluation(#[from] ModelEvaluationError),
}

/// DIMACS CNF reading errors. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum DimacsError {
    #[error("line {line}: missing `p cnf` header")]
    MissingHeader { line: usize },
    #[error("line {line}: invalid header `{text}`")]
    InvalidHeader { line: usize, text: String },
    #[error("line {line}: duplicate header")]
    DuplicateHeader { line: usize },
    #[error("line {line}: invalid literal `{token}`")]
    InvalidLiteral { line: usize, token: String },
    #[error("line {line}: clause not terminated by 0")]
    UnterminatedClause { line: usize },
    #[error("line {line}: variable {variable} is not declared (header declares {declared})")]
    UndeclaredVariable { line: usize, variable: u32, declared: u32 },
    #[error("header declares {declared} clauses, found {found}")]
    ClauseCountMismatch { declared: usize, found: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}
