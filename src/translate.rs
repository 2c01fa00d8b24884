//! LTL-to-Büchi translation.
//!
//! The translator is an external collaborator: a [`Translator`] takes a
//! formula in the LTL3BA input syntax and returns the textual automaton
//! description printed by `ltl3ba -T3`. The caller constructs the handle and
//! passes it to [`PropertyAutomaton::compile`][crate::automaton::PropertyAutomaton::compile];
//! nothing here is process-wide.

use std::process::Command;

use log::debug;

use crate::error::{PropertyCompilationError, TranslationError};
use crate::syntax::{AcceptanceDecl, AtomNaming, AutomatonDecl, Expr, TransitionDecl};

/// Translates an LTL formula into an automaton description.
pub trait Translator {
    fn translate(&self, formula: &str) -> Result<String, TranslationError>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Result<String, TranslationError>,
{
    fn translate(&self, formula: &str) -> Result<String, TranslationError> {
        self(formula)
    }
}

/// Handle to an `ltl3ba` executable.
#[derive(Debug, Clone)]
pub struct Ltl3ba {
    pub program: String,
    /// Extra arguments, passed before `-T3 -f <formula>`.
    pub args: Vec<String>,
}

impl Default for Ltl3ba {
    fn default() -> Self {
        Self {
            program: "ltl3ba".to_string(),
            args: Vec::new(),
        }
    }
}

impl Ltl3ba {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Translator for Ltl3ba {
    fn translate(&self, formula: &str) -> Result<String, TranslationError> {
        debug!("running {} -T3 -f {:?}", self.program, formula);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("-T3")
            .arg("-f")
            .arg(formula)
            .output()
            .map_err(|source| TranslationError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(TranslationError::Failed {
                status: output.status.code(),
                diagnostic: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Renders `expr` for the translator, runs it and reads the result back.
pub fn formula_to_decl(expr: &Expr, translator: &dyn Translator) -> Result<AutomatonDecl, PropertyCompilationError> {
    let mut naming = AtomNaming::new();
    let formula = expr.to_ltl3ba(&mut naming)?;
    let text = translator.translate(&formula)?;
    read_automaton(&text, &naming)
}

/// Reads an LTL3BA `-T3` automaton description.
///
/// The first line (the `acc = ...` header) is skipped. Every other non-empty
/// line is a comma separated `source,target,guard,...` record with quoted
/// fields. States whose name contains `init` are initial; states whose name
/// contains `accept` form the (single) acceptance set. Guard atoms `atomN` are
/// mapped back to property atom names through `naming`.
pub fn read_automaton(text: &str, naming: &AtomNaming) -> Result<AutomatonDecl, PropertyCompilationError> {
    let mut decl = AutomatonDecl::new();
    let mut accepting: Vec<String> = Vec::new();

    for (i, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<String> = line.split(',').map(|f| f.replace('"', "").trim().to_string()).collect();
        if fields.len() < 3 {
            return Err(PropertyCompilationError::MalformedDescription {
                line: i + 1,
                reason: format!("expected `source,target,guard`, found {} field(s)", fields.len()),
            });
        }
        let (source, target) = (&fields[0], &fields[1]);
        for state in [source, target] {
            if !decl.states.contains(state) {
                decl.states.push(state.clone());
                if state.contains("init") {
                    decl.initial.push(state.clone());
                }
                if state.contains("accept") {
                    accepting.push(state.clone());
                }
            }
        }
        let guard = parse_guard(&fields[2], naming)?;
        decl = decl.transition_with(TransitionDecl {
            source: source.clone(),
            priority: 0,
            guard,
            target: target.clone(),
            marks: Vec::new(),
        });
    }

    decl.acceptance = AcceptanceDecl::States(vec![accepting]);
    debug!(
        "read translated automaton: {} states, {} initial, {} transitions",
        decl.states.len(),
        decl.initial.len(),
        decl.transitions.len()
    );
    Ok(decl)
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Token {
    Ident(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '&' | '|' => {
                chars.next();
                // Doubled operators are accepted as well.
                if chars.peek() == Some(&c) {
                    chars.next();
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character `{}`", other)),
        }
    }
    Ok(tokens)
}

/// Recursive descent over `or := and ('||' and)*`, `and := unary ('&&' unary)*`,
/// `unary := '!' unary | '(' or ')' | ident`.
struct GuardParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    naming: &'a AtomNaming,
}

impl GuardParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn or(&mut self) -> Result<Expr, String> {
        let mut lhs = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.bump();
            lhs = Expr::or(lhs, self.and()?);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, String> {
        let mut lhs = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.bump();
            lhs = Expr::and(lhs, self.unary()?);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, String> {
        match self.bump() {
            Some(Token::Not) => Ok(Expr::not(self.unary()?)),
            Some(Token::LParen) => {
                let inner = self.or()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("missing `)`".to_string()),
                }
            }
            Some(Token::Ident(ident)) => match ident.as_str() {
                "true" | "1" => Ok(Expr::True),
                "false" | "0" => Ok(Expr::False),
                name => self
                    .naming
                    .original(name)
                    .map(Expr::atom)
                    .ok_or_else(|| format!("unknown atom `{}`", name)),
            },
            Some(token) => Err(format!("unexpected token {:?}", token)),
            None => Err("unexpected end of guard".to_string()),
        }
    }
}

/// Parses a guard printed by LTL3BA.
pub fn parse_guard(text: &str, naming: &AtomNaming) -> Result<Expr, PropertyCompilationError> {
    let invalid = |reason: String| PropertyCompilationError::InvalidGuard {
        text: text.to_string(),
        reason,
    };
    let tokens = tokenize(text).map_err(invalid)?;
    let mut parser = GuardParser {
        tokens,
        pos: 0,
        naming,
    };
    let expr = parser.or().map_err(invalid)?;
    if parser.pos < parser.tokens.len() {
        return Err(invalid(format!("trailing input after token {}", parser.pos)));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn naming(atoms: &[&str]) -> AtomNaming {
        let mut naming = AtomNaming::new();
        for atom in atoms {
            naming.name_of(atom);
        }
        naming
    }

    #[test]
    fn test_parse_guard() {
        let n = naming(&["p", "q"]);
        assert_eq!(parse_guard("true", &n).unwrap(), Expr::True);
        assert_eq!(parse_guard("(1)", &n).unwrap(), Expr::True);
        assert_eq!(parse_guard("0", &n).unwrap(), Expr::False);
        assert_eq!(
            parse_guard("!atom0 && atom1 || atom0", &n).unwrap(),
            Expr::or(Expr::and(Expr::not(Expr::atom("p")), Expr::atom("q")), Expr::atom("p"))
        );
        assert_eq!(
            parse_guard("atom0 & (atom1 | !atom1)", &n).unwrap(),
            Expr::and(
                Expr::atom("p"),
                Expr::or(Expr::atom("q"), Expr::not(Expr::atom("q")))
            )
        );
    }

    #[test]
    fn test_parse_guard_errors() {
        let n = naming(&["p"]);
        for text in ["atom7", "(atom0", "atom0 &&", "atom0 atom0", "atom0 + atom0", ""] {
            let err = parse_guard(text, &n).unwrap_err();
            assert!(
                matches!(&err, PropertyCompilationError::InvalidGuard { text: t, .. } if t == text),
                "{:?} gave {:?}",
                text,
                err
            );
        }
    }

    // Output of `ltl3ba -T3 -f '(<> ([] atom0))'`.
    const EVENTUALLY_ALWAYS: &str = r#"acc = "accept_S2"
"T0_init","T0_init","true",
"T0_init","accept_S2","atom0",
"accept_S2","accept_S2","atom0",
"#;

    #[test]
    fn test_read_automaton() {
        let decl = read_automaton(EVENTUALLY_ALWAYS, &naming(&["stable"])).unwrap();
        assert_eq!(decl.states, vec!["T0_init".to_string(), "accept_S2".to_string()]);
        assert_eq!(decl.initial, vec!["T0_init".to_string()]);
        assert_eq!(
            decl.acceptance,
            AcceptanceDecl::States(vec![vec!["accept_S2".to_string()]])
        );
        assert_eq!(decl.transitions.len(), 3);
        assert_eq!(decl.transitions[1].guard, Expr::atom("stable"));
        assert_eq!(decl.transitions[2].source, "accept_S2");
    }

    #[test]
    fn test_read_automaton_malformed() {
        let err = read_automaton("acc = \"\"\n\"a\",\"b\"\n", &AtomNaming::new()).unwrap_err();
        assert!(matches!(err, PropertyCompilationError::MalformedDescription { line: 2, .. }));
    }

    #[test]
    fn test_formula_to_decl_with_fake_translator() {
        let fake = |formula: &str| -> Result<String, TranslationError> {
            assert_eq!(formula, "(<> ([] atom0))");
            Ok(EVENTUALLY_ALWAYS.to_string())
        };
        let expr = Expr::eventually(Expr::globally(Expr::atom("stable")));
        let decl = formula_to_decl(&expr, &fake).unwrap();
        assert_eq!(decl.atoms(), vec!["stable"]);
    }

    #[test]
    fn test_translator_failure_is_surfaced() {
        let failing = |_: &str| -> Result<String, TranslationError> {
            Err(TranslationError::Failed {
                status: Some(1),
                diagnostic: "syntax error".to_string(),
            })
        };
        let err = formula_to_decl(&Expr::atom("a"), &failing).unwrap_err();
        match err {
            PropertyCompilationError::Translation(TranslationError::Failed { diagnostic, .. }) => {
                assert_eq!(diagnostic, "syntax error")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_program() {
        let ltl3ba = Ltl3ba::new("/nonexistent/ltl3ba-binary");
        let err = ltl3ba.translate("true").unwrap_err();
        assert!(matches!(err, TranslationError::Spawn { .. }));
    }
}
