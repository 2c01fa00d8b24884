//! Compiled transition guards.
//!
//! A guard is a propositional [`Expr`] flattened into an arena in
//! breadth-first order: the root sits at index 0 and every node's children sit
//! at larger indices. Evaluation is a single reverse sweep over the arena, so it
//! neither recurses nor fails: a compiled guard is a total function of the atom
//! valuation.

use std::collections::VecDeque;
use std::fmt;

use crate::error::PropertyCompilationError;
use crate::syntax::Expr;
use crate::types::AtomId;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Idx(usize);

/// One arena node. Children are arena indices.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Node<I = Idx> {
    Const(bool),
    Atom(AtomId),
    Not(I),
    And(I, I),
    Or(I, I),
    Xor(I, I),
    Implies(I, I),
    Iff(I, I),
    Ite(I, I, I),
}

impl<A> Node<A> {
    #[inline(always)]
    pub fn fmap<B, F>(self, mut f: F) -> Node<B>
    where
        F: FnMut(A) -> B,
    {
        match self {
            Node::Const(c) => Node::Const(c),
            Node::Atom(a) => Node::Atom(a),
            Node::Not(a) => Node::Not(f(a)),
            Node::And(a, b) => Node::And(f(a), f(b)),
            Node::Or(a, b) => Node::Or(f(a), f(b)),
            Node::Xor(a, b) => Node::Xor(f(a), f(b)),
            Node::Implies(a, b) => Node::Implies(f(a), f(b)),
            Node::Iff(a, b) => Node::Iff(f(a), f(b)),
            Node::Ite(a, b, c) => Node::Ite(f(a), f(b), f(c)),
        }
    }

    #[inline(always)]
    pub fn fmap_ref<B, F>(&self, mut f: F) -> Node<B>
    where
        F: FnMut(&A) -> B,
    {
        match self {
            Node::Const(c) => Node::Const(*c),
            Node::Atom(a) => Node::Atom(*a),
            Node::Not(a) => Node::Not(f(a)),
            Node::And(a, b) => Node::And(f(a), f(b)),
            Node::Or(a, b) => Node::Or(f(a), f(b)),
            Node::Xor(a, b) => Node::Xor(f(a), f(b)),
            Node::Implies(a, b) => Node::Implies(f(a), f(b)),
            Node::Iff(a, b) => Node::Iff(f(a), f(b)),
            Node::Ite(a, b, c) => Node::Ite(f(a), f(b), f(c)),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Guard {
    /// Topologically sorted nodes, by construction.
    nodes: Vec<Node>,
}

impl Guard {
    /// The guard that is always true.
    pub fn always() -> Self {
        Self {
            nodes: vec![Node::Const(true)],
        }
    }

    /// Compiles a propositional expression. `resolve` maps each atom name to
    /// its identifier. Bindings are expanded first; temporal operators are
    /// rejected.
    pub fn compile<F>(expr: &Expr, mut resolve: F) -> Result<Self, PropertyCompilationError>
    where
        F: FnMut(&str) -> Result<AtomId, PropertyCompilationError>,
    {
        let expr = expr.resolve()?;
        let mut frontier: VecDeque<&Expr> = VecDeque::from([&expr]);
        let mut nodes: Vec<Node> = vec![];

        while let Some(seed) = frontier.pop_front() {
            let node: Node<&Expr> = match seed {
                Expr::True => Node::Const(true),
                Expr::False => Node::Const(false),
                Expr::Atom(name) => Node::Atom(resolve(name)?),
                Expr::Ref(name) => return Err(PropertyCompilationError::UnboundReference(name.clone())),
                Expr::Not(a) => Node::Not(a.as_ref()),
                Expr::And(a, b) => Node::And(a.as_ref(), b.as_ref()),
                Expr::Or(a, b) => Node::Or(a.as_ref(), b.as_ref()),
                Expr::Xor(a, b) => Node::Xor(a.as_ref(), b.as_ref()),
                Expr::Implies(a, b) => Node::Implies(a.as_ref(), b.as_ref()),
                Expr::Iff(a, b) => Node::Iff(a.as_ref(), b.as_ref()),
                Expr::Ite(a, b, c) => Node::Ite(a.as_ref(), b.as_ref(), c.as_ref()),
                temporal => {
                    let op = temporal.temporal_operator().unwrap_or("?");
                    return Err(PropertyCompilationError::TemporalGuard(op));
                }
            };
            let node = node.fmap(|e| {
                frontier.push_back(e);
                Idx(nodes.len() + frontier.len())
            });
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    /// Number of arena nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the guard is the constant `true`.
    pub fn is_always(&self) -> bool {
        matches!(self.nodes.as_slice(), [Node::Const(true)])
    }

    /// Atoms mentioned by the guard, without duplicates, in arena order.
    pub fn atoms(&self) -> Vec<AtomId> {
        let mut atoms = Vec::new();
        for node in &self.nodes {
            if let Node::Atom(a) = node {
                if !atoms.contains(a) {
                    atoms.push(*a);
                }
            }
        }
        atoms
    }

    /// Folds the arena bottom-up. Returns `None` only for an empty arena,
    /// which `compile` never builds.
    fn collapse<R, F>(&self, mut collapse: F) -> Option<R>
    where
        R: Clone,
        F: FnMut(Node<R>) -> R,
    {
        let n = self.nodes.len();
        // Result of node `i` is at `n - 1 - i`: children are always folded first.
        let mut folded: Vec<R> = Vec::with_capacity(n);
        for node in self.nodes.iter().rev() {
            let node = node.fmap_ref(|idx| folded[n - 1 - idx.0].clone());
            folded.push(collapse(node));
        }
        folded.pop()
    }

    /// Evaluates the guard. `atom` is queried for the truth value of each atom
    /// occurrence; callers memoize it per step.
    pub fn eval<F>(&self, mut atom: F) -> bool
    where
        F: FnMut(AtomId) -> bool,
    {
        self.collapse(|node: Node<bool>| match node {
            Node::Const(c) => c,
            Node::Atom(a) => atom(a),
            Node::Not(a) => !a,
            Node::And(a, b) => a && b,
            Node::Or(a, b) => a || b,
            Node::Xor(a, b) => a != b,
            Node::Implies(a, b) => !a || b,
            Node::Iff(a, b) => a == b,
            Node::Ite(c, t, e) => {
                if c {
                    t
                } else {
                    e
                }
            }
        })
        .unwrap_or(false)
    }

    /// Renders the guard with atom names supplied by `name`.
    pub fn render<'a, F>(&self, name: F) -> String
    where
        F: Fn(AtomId) -> &'a str,
    {
        self.collapse(|node: Node<String>| match node {
            Node::Const(true) => "true".to_string(),
            Node::Const(false) => "false".to_string(),
            Node::Atom(a) => name(a).to_string(),
            Node::Not(a) => format!("!{}", a),
            Node::And(a, b) => format!("({} & {})", a, b),
            Node::Or(a, b) => format!("({} | {})", a, b),
            Node::Xor(a, b) => format!("({} ^ {})", a, b),
            Node::Implies(a, b) => format!("({} -> {})", a, b),
            Node::Iff(a, b) => format!("({} <-> {})", a, b),
            Node::Ite(c, t, e) => format!("({} ? {} : {})", c, t, e),
        })
        .unwrap_or_default()
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atoms: Vec<String> = (0..=self.atoms().iter().map(|a| a.index()).max().unwrap_or(0))
            .map(|i| AtomId::new(i as u32).to_string())
            .collect();
        write!(f, "{}", self.render(|a| atoms[a.index()].as_str()))
    }
}
