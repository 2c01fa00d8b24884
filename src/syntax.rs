//! Property syntax trees.
//!
//! Parsing the property language is somebody else's job: this module only
//! holds the already-parsed tree. A [`Property`] is either a linear temporal
//! logic formula ([`Expr`]) or an explicitly declared automaton
//! ([`AutomatonDecl`]).
//!
//! Expressions may name sub-expressions with [`Expr::Let`] and use them
//! through [`Expr::Ref`]. Bindings are expanded by [`Expr::resolve`] before
//! anything is compiled.

use std::collections::HashMap;
use std::fmt;

use crate::automaton::AutomatonKind;
use crate::error::PropertyCompilationError;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    True,
    False,
    /// Atomic proposition, resolved by name through an
    /// [`AtomEvaluator`][crate::model::AtomEvaluator].
    Atom(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
    Ite(Box<Expr>, Box<Expr>, Box<Expr>),
    Next(Box<Expr>),
    Eventually(Box<Expr>),
    Globally(Box<Expr>),
    /// Strong until: `lhs U rhs`.
    Until(Box<Expr>, Box<Expr>),
    /// Weak until: `lhs W rhs`.
    WeakUntil(Box<Expr>, Box<Expr>),
    /// Weak release: `lhs R rhs`.
    Release(Box<Expr>, Box<Expr>),
    /// Strong release: `lhs M rhs`.
    StrongRelease(Box<Expr>, Box<Expr>),
    /// `let x = e1, y = e2 in body`. Each binding sees the ones before it and
    /// the enclosing scopes, but never itself.
    Let(Vec<(String, Expr)>, Box<Expr>),
    /// Use of a name bound by an enclosing [`Expr::Let`].
    Ref(String),
}

impl Expr {
    pub fn atom(name: impl Into<String>) -> Self {
        Expr::Atom(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(value: Self) -> Self {
        match value {
            Expr::Not(inner) => *inner,
            _ => Expr::Not(Box::new(value)),
        }
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn xor(lhs: Self, rhs: Self) -> Self {
        Expr::Xor(Box::new(lhs), Box::new(rhs))
    }

    pub fn implies(lhs: Self, rhs: Self) -> Self {
        Expr::Implies(Box::new(lhs), Box::new(rhs))
    }

    pub fn iff(lhs: Self, rhs: Self) -> Self {
        Expr::Iff(Box::new(lhs), Box::new(rhs))
    }

    pub fn ite(cond: Self, then: Self, else_: Self) -> Self {
        Expr::Ite(Box::new(cond), Box::new(then), Box::new(else_))
    }

    pub fn next(value: Self) -> Self {
        Expr::Next(Box::new(value))
    }

    pub fn eventually(value: Self) -> Self {
        Expr::Eventually(Box::new(value))
    }

    pub fn globally(value: Self) -> Self {
        Expr::Globally(Box::new(value))
    }

    pub fn until(lhs: Self, rhs: Self) -> Self {
        Expr::Until(Box::new(lhs), Box::new(rhs))
    }

    pub fn weak_until(lhs: Self, rhs: Self) -> Self {
        Expr::WeakUntil(Box::new(lhs), Box::new(rhs))
    }

    pub fn release(lhs: Self, rhs: Self) -> Self {
        Expr::Release(Box::new(lhs), Box::new(rhs))
    }

    pub fn strong_release(lhs: Self, rhs: Self) -> Self {
        Expr::StrongRelease(Box::new(lhs), Box::new(rhs))
    }

    pub fn let_in<I, S>(bindings: I, body: Self) -> Self
    where
        I: IntoIterator<Item = (S, Expr)>,
        S: Into<String>,
    {
        let bindings = bindings.into_iter().map(|(name, e)| (name.into(), e)).collect();
        Expr::Let(bindings, Box::new(body))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref(name.into())
    }

    /// Conjunction of all expressions, `true` for an empty iterator.
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs.into_iter().reduce(Expr::and).unwrap_or(Expr::True)
    }

    /// Disjunction of all expressions, `false` for an empty iterator.
    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs.into_iter().reduce(Expr::or).unwrap_or(Expr::False)
    }

    /// Direct sub-expressions, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::True | Expr::False | Expr::Atom(_) | Expr::Ref(_) => vec![],
            Expr::Not(a) | Expr::Next(a) | Expr::Eventually(a) | Expr::Globally(a) => vec![a],
            Expr::And(a, b)
            | Expr::Or(a, b)
            | Expr::Xor(a, b)
            | Expr::Implies(a, b)
            | Expr::Iff(a, b)
            | Expr::Until(a, b)
            | Expr::WeakUntil(a, b)
            | Expr::Release(a, b)
            | Expr::StrongRelease(a, b) => vec![a, b],
            Expr::Ite(a, b, c) => vec![a, b, c],
            Expr::Let(bindings, body) => bindings.iter().map(|(_, e)| e).chain([body.as_ref()]).collect(),
        }
    }

    /// Expands every [`Expr::Let`], replacing each [`Expr::Ref`] by the
    /// expression bound to it. The result holds neither.
    pub fn resolve(&self) -> Result<Expr, PropertyCompilationError> {
        self.resolve_in(&mut Vec::new())
    }

    /// `scope` holds the visible bindings, innermost last.
    fn resolve_in(&self, scope: &mut Vec<(String, Expr)>) -> Result<Expr, PropertyCompilationError> {
        fn unary(a: &Expr, scope: &mut Vec<(String, Expr)>) -> Result<Box<Expr>, PropertyCompilationError> {
            a.resolve_in(scope).map(Box::new)
        }

        Ok(match self {
            Expr::True => Expr::True,
            Expr::False => Expr::False,
            Expr::Atom(name) => Expr::Atom(name.clone()),
            Expr::Ref(name) => match scope.iter().rev().find(|(bound, _)| bound == name) {
                Some((_, e)) => e.clone(),
                None => return Err(PropertyCompilationError::UnboundReference(name.clone())),
            },
            Expr::Let(bindings, body) => {
                let outer = scope.len();
                for (name, e) in bindings {
                    let value = e.resolve_in(scope)?;
                    scope.push((name.clone(), value));
                }
                let body = body.resolve_in(scope);
                scope.truncate(outer);
                body?
            }
            Expr::Not(a) => Expr::Not(unary(a, scope)?),
            Expr::Next(a) => Expr::Next(unary(a, scope)?),
            Expr::Eventually(a) => Expr::Eventually(unary(a, scope)?),
            Expr::Globally(a) => Expr::Globally(unary(a, scope)?),
            Expr::And(a, b) => Expr::And(unary(a, scope)?, unary(b, scope)?),
            Expr::Or(a, b) => Expr::Or(unary(a, scope)?, unary(b, scope)?),
            Expr::Xor(a, b) => Expr::Xor(unary(a, scope)?, unary(b, scope)?),
            Expr::Implies(a, b) => Expr::Implies(unary(a, scope)?, unary(b, scope)?),
            Expr::Iff(a, b) => Expr::Iff(unary(a, scope)?, unary(b, scope)?),
            Expr::Until(a, b) => Expr::Until(unary(a, scope)?, unary(b, scope)?),
            Expr::WeakUntil(a, b) => Expr::WeakUntil(unary(a, scope)?, unary(b, scope)?),
            Expr::Release(a, b) => Expr::Release(unary(a, scope)?, unary(b, scope)?),
            Expr::StrongRelease(a, b) => Expr::StrongRelease(unary(a, scope)?, unary(b, scope)?),
            Expr::Ite(a, b, c) => Expr::Ite(unary(a, scope)?, unary(b, scope)?, unary(c, scope)?),
        })
    }

    /// Name of the outermost temporal operator, if this node is one.
    pub fn temporal_operator(&self) -> Option<&'static str> {
        match self {
            Expr::Next(_) => Some("X"),
            Expr::Eventually(_) => Some("F"),
            Expr::Globally(_) => Some("G"),
            Expr::Until(..) => Some("U"),
            Expr::WeakUntil(..) => Some("W"),
            Expr::Release(..) => Some("R"),
            Expr::StrongRelease(..) => Some("M"),
            _ => None,
        }
    }

    /// Returns true if the expression contains no temporal operator.
    pub fn is_propositional(&self) -> bool {
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if expr.temporal_operator().is_some() {
                return false;
            }
            stack.extend(expr.children());
        }
        true
    }

    /// Distinct atom names in order of first (left-to-right) occurrence.
    ///
    /// Atoms of unused bindings are included; [`resolve`][Self::resolve]
    /// first for the exact set.
    pub fn atoms(&self) -> Vec<&str> {
        let mut result: Vec<&str> = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if let Expr::Atom(name) = expr {
                if !result.contains(&name.as_str()) {
                    result.push(name);
                }
            }
            // Reversed so the leftmost child is visited first.
            stack.extend(expr.children().into_iter().rev());
        }
        result
    }

    /// Renders the formula in the LTL3BA input syntax.
    ///
    /// Operators LTL3BA lacks (xor, if-then-else, weak until, strong release)
    /// are expanded into equivalent formulas, and so are bindings. Atoms are
    /// renamed `atom0`, `atom1`, ... through `naming`, which keeps the mapping
    /// back to the original names.
    pub fn to_ltl3ba(&self, naming: &mut AtomNaming) -> Result<String, PropertyCompilationError> {
        Ok(match self {
            Expr::True => "true".to_string(),
            Expr::False => "false".to_string(),
            Expr::Atom(name) => naming.name_of(name),
            Expr::Ref(name) => return Err(PropertyCompilationError::UnboundReference(name.clone())),
            Expr::Let(..) => self.resolve()?.to_ltl3ba(naming)?,
            Expr::Not(a) => format!("(!{})", a.to_ltl3ba(naming)?),
            Expr::And(a, b) => format!("({} && {})", a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?),
            Expr::Or(a, b) => format!("({} || {})", a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?),
            Expr::Xor(a, b) => {
                let (a, b) = (a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?);
                format!("((!{a} && {b}) || ({a} && !{b}))")
            }
            Expr::Implies(a, b) => format!("({} -> {})", a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?),
            Expr::Iff(a, b) => format!("({} <-> {})", a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?),
            Expr::Ite(c, t, e) => {
                let c = c.to_ltl3ba(naming)?;
                let t = t.to_ltl3ba(naming)?;
                let e = e.to_ltl3ba(naming)?;
                format!("(({c} && {t}) || (!{c} && {e}))")
            }
            Expr::Next(a) => format!("(X {})", a.to_ltl3ba(naming)?),
            Expr::Eventually(a) => format!("(<> {})", a.to_ltl3ba(naming)?),
            Expr::Globally(a) => format!("([] {})", a.to_ltl3ba(naming)?),
            Expr::Until(a, b) => format!("({} U {})", a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?),
            Expr::WeakUntil(a, b) => {
                let (a, b) = (a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?);
                format!("(([] {a}) || ({a} U {b}))")
            }
            Expr::Release(a, b) => format!("({} R {})", a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?),
            Expr::StrongRelease(a, b) => {
                let (a, b) = (a.to_ltl3ba(naming)?, b.to_ltl3ba(naming)?);
                format!("(({b}) U ({a} && {b}))")
            }
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::True => write!(f, "true"),
            Expr::False => write!(f, "false"),
            Expr::Atom(name) => write!(f, "|{}|", name),
            Expr::Not(a) => write!(f, "!{}", a),
            Expr::And(a, b) => write!(f, "({} & {})", a, b),
            Expr::Or(a, b) => write!(f, "({} | {})", a, b),
            Expr::Xor(a, b) => write!(f, "({} ^ {})", a, b),
            Expr::Implies(a, b) => write!(f, "({} -> {})", a, b),
            Expr::Iff(a, b) => write!(f, "({} <-> {})", a, b),
            Expr::Ite(c, t, e) => write!(f, "({} ? {} : {})", c, t, e),
            Expr::Next(a) => write!(f, "X {}", a),
            Expr::Eventually(a) => write!(f, "F {}", a),
            Expr::Globally(a) => write!(f, "G {}", a),
            Expr::Until(a, b) => write!(f, "({} U {})", a, b),
            Expr::WeakUntil(a, b) => write!(f, "({} W {})", a, b),
            Expr::Release(a, b) => write!(f, "({} R {})", a, b),
            Expr::StrongRelease(a, b) => write!(f, "({} M {})", a, b),
            Expr::Ref(name) => write!(f, "{}", name),
            Expr::Let(bindings, body) => {
                f.write_str("(let ")?;
                for (i, (name, e)) in bindings.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} = {}", name, e)?;
                }
                write!(f, " in {})", body)
            }
        }
    }
}

/// Bidirectional mapping between property atom names and the `atomN`
/// identifiers handed to the translator.
#[derive(Debug, Clone, Default)]
pub struct AtomNaming {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl AtomNaming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the translator name for `atom`, allocating one if needed.
    pub fn name_of(&mut self, atom: &str) -> String {
        let next = self.names.len();
        let idx = *self.index.entry(atom.to_string()).or_insert_with(|| next);
        if idx == next {
            self.names.push(atom.to_string());
        }
        format!("atom{}", idx)
    }

    /// Maps a translator name (`atomN`) back to the original atom name.
    pub fn original(&self, translated: &str) -> Option<&str> {
        let idx: usize = translated.strip_prefix("atom")?.parse().ok()?;
        self.names.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// How acceptance is declared in an explicit automaton.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AcceptanceDecl {
    /// State-based acceptance. Each inner vector is one acceptance set, given
    /// by state names. A single set is plain Büchi acceptance.
    States(Vec<Vec<String>>),
    /// Transition-based acceptance with `sets` acceptance sets; each
    /// [`TransitionDecl`] lists the sets it belongs to in `marks`.
    Transitions { sets: usize },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionDecl {
    pub source: String,
    /// Lower values take precedence. See [`PropertyAutomaton::enabled`][crate::automaton::PropertyAutomaton::enabled].
    pub priority: i32,
    pub guard: Expr,
    pub target: String,
    /// Acceptance sets of this transition (transition-based acceptance only).
    pub marks: Vec<usize>,
}

/// An explicitly declared property automaton.
///
/// Accepting runs are the violations the model checker looks for.
///
/// ```
/// use buchi_rs::syntax::{AutomatonDecl, Expr};
///
/// // Violation: eventually `bad` holds forever.
/// let decl = AutomatonDecl::new()
///     .state("wait")
///     .state("stuck")
///     .initial("wait")
///     .accepting(["stuck"])
///     .transition("wait", Expr::True, "wait")
///     .transition("wait", Expr::atom("bad"), "stuck")
///     .transition("stuck", Expr::atom("bad"), "stuck");
/// assert_eq!(decl.transitions.len(), 3);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AutomatonDecl {
    pub kind: AutomatonKind,
    pub states: Vec<String>,
    pub initial: Vec<String>,
    pub acceptance: AcceptanceDecl,
    pub transitions: Vec<TransitionDecl>,
}

impl Default for AutomatonDecl {
    fn default() -> Self {
        Self {
            kind: AutomatonKind::Buchi,
            states: Vec::new(),
            initial: Vec::new(),
            acceptance: AcceptanceDecl::States(vec![Vec::new()]),
            transitions: Vec::new(),
        }
    }
}

impl AutomatonDecl {
    /// Creates an empty declaration with plain (one set) state-based acceptance.
    pub fn new() -> Self {
        Self::default()
    }

    /// The finite automaton whose violations are the steps breaking the
    /// propositional `invariant`: it stays in `s` while the invariant holds
    /// and moves to the accepting `x` on the first step where it does not.
    pub fn invariant(invariant: Expr) -> Self {
        Self::new()
            .finite()
            .state("s")
            .state("x")
            .initial("s")
            .accepting(["x"])
            .transition_with(TransitionDecl {
                source: "s".into(),
                priority: 1,
                guard: Expr::not(invariant.clone()),
                target: "x".into(),
                marks: Vec::new(),
            })
            .transition_with(TransitionDecl {
                source: "s".into(),
                priority: 1,
                guard: invariant,
                target: "s".into(),
                marks: Vec::new(),
            })
    }

    /// Reads the declaration as a finite automaton: a run is a violation as
    /// soon as it reaches acceptance. See [`AutomatonKind::Finite`].
    pub fn finite(mut self) -> Self {
        self.kind = AutomatonKind::Finite;
        self
    }

    pub fn state(mut self, name: impl Into<String>) -> Self {
        self.states.push(name.into());
        self
    }

    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial.push(name.into());
        self
    }

    /// Adds states to the first state-based acceptance set.
    ///
    /// Switches the declaration to state-based acceptance if needed.
    pub fn accepting<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into);
        match &mut self.acceptance {
            AcceptanceDecl::States(sets) if !sets.is_empty() => sets[0].extend(names),
            _ => self.acceptance = AcceptanceDecl::States(vec![names.collect()]),
        }
        self
    }

    /// Replaces the acceptance declaration.
    pub fn acceptance(mut self, acceptance: AcceptanceDecl) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn transition(self, source: impl Into<String>, guard: Expr, target: impl Into<String>) -> Self {
        self.transition_with(TransitionDecl {
            source: source.into(),
            priority: 0,
            guard,
            target: target.into(),
            marks: Vec::new(),
        })
    }

    /// Adds a transition belonging to the given acceptance sets.
    pub fn marked_transition(
        self,
        source: impl Into<String>,
        guard: Expr,
        target: impl Into<String>,
        marks: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.transition_with(TransitionDecl {
            source: source.into(),
            priority: 0,
            guard,
            target: target.into(),
            marks: marks.into_iter().collect(),
        })
    }

    pub fn transition_with(mut self, transition: TransitionDecl) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Distinct atom names used by all guards, in order of first occurrence.
    pub fn atoms(&self) -> Vec<&str> {
        let mut result: Vec<&str> = Vec::new();
        for t in &self.transitions {
            for atom in t.guard.atoms() {
                if !result.contains(&atom) {
                    result.push(atom);
                }
            }
        }
        result
    }
}

/// A property to check.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Property {
    /// A formula whose models are the *violations*. Compiled through a
    /// [`Translator`][crate::translate::Translator].
    Formula(Expr),
    Automaton(AutomatonDecl),
}

impl Property {
    /// A property whose accepting runs are exactly the runs satisfying `expr`.
    pub fn violation(expr: Expr) -> Self {
        Property::Formula(expr)
    }

    /// A property that every run must satisfy: its violations are the runs
    /// satisfying `!expr`.
    pub fn requirement(expr: Expr) -> Self {
        Property::Formula(Expr::not(expr))
    }

    pub fn automaton(decl: AutomatonDecl) -> Self {
        Property::Automaton(decl)
    }

    pub fn atoms(&self) -> Vec<&str> {
        match self {
            Property::Formula(expr) => expr.atoms(),
            Property::Automaton(decl) => decl.atoms(),
        }
    }
}
