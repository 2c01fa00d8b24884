//! DIMACS CNF input.
//!
//! A CNF formula read here becomes a propositional [`Expr`] over the atoms
//! `x1`, `x2`, ..., ready to be used as a transition guard or as the body of
//! a property.
//!
//! Format:
//! - Lines starting with `c` are comments; empty lines are ignored.
//! - The problem line `p cnf <num_vars> <num_clauses>` precedes every clause.
//! - A clause is a sequence of non-zero integers terminated by `0`. It may
//!   span several lines, and a line may hold several clauses.
//! - A line starting with `%` ends the input.

use std::fmt;
use std::io::{BufRead, BufReader, Read};

use log::debug;

use crate::error::DimacsError;
use crate::syntax::Expr;

/// A non-zero DIMACS literal: variable `|n|`, negated when `n < 0`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Returns `None` for 0, which is the clause terminator and not a literal.
    pub fn new(value: i32) -> Option<Self> {
        (value != 0).then_some(Lit(value))
    }

    pub fn var(self) -> u32 {
        self.0.unsigned_abs()
    }

    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// The atom standing for the literal's variable.
    pub fn atom_name(self) -> String {
        format!("x{}", self.var())
    }

    pub fn to_expr(self) -> Expr {
        let atom = Expr::atom(self.atom_name());
        if self.is_negated() {
            Expr::not(atom)
        } else {
            atom
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Cnf {
    pub num_vars: u32,
    pub clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Conjunction of the clauses, each a disjunction of its literals.
    ///
    /// The empty formula is `true` and an empty clause is `false`.
    pub fn to_expr(&self) -> Expr {
        Expr::all(
            self.clauses
                .iter()
                .map(|clause| Expr::any(clause.iter().map(|lit| lit.to_expr()))),
        )
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{} ", lit)?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

pub fn parse(text: &str) -> Result<Cnf, DimacsError> {
    read(text.as_bytes())
}

pub fn read<R: Read>(reader: R) -> Result<Cnf, DimacsError> {
    let reader = BufReader::new(reader);
    let mut header: Option<(u32, usize)> = None;
    let mut clauses = Vec::new();
    // Literals of the clause being read, and the line it started on.
    let mut pending: Vec<Lit> = Vec::new();
    let mut pending_since = 0;
    let mut last_line = 0;

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        last_line = line_no;
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('%') {
            break;
        }

        if line.starts_with('p') {
            if header.is_some() {
                return Err(DimacsError::DuplicateHeader { line: line_no });
            }
            header = Some(parse_header(line, line_no)?);
            continue;
        }

        let Some((num_vars, _)) = header else {
            return Err(DimacsError::MissingHeader { line: line_no });
        };
        for token in line.split_whitespace() {
            let value: i32 = token.parse().map_err(|_| DimacsError::InvalidLiteral {
                line: line_no,
                token: token.to_string(),
            })?;
            let Some(lit) = Lit::new(value) else {
                clauses.push(std::mem::take(&mut pending));
                continue;
            };
            if lit.var() > num_vars {
                return Err(DimacsError::UndeclaredVariable {
                    line: line_no,
                    variable: lit.var(),
                    declared: num_vars,
                });
            }
            if pending.is_empty() {
                pending_since = line_no;
            }
            pending.push(lit);
        }
    }

    let Some((num_vars, num_clauses)) = header else {
        return Err(DimacsError::MissingHeader {
            line: last_line.max(1),
        });
    };
    if !pending.is_empty() {
        return Err(DimacsError::UnterminatedClause { line: pending_since });
    }
    if clauses.len() != num_clauses {
        return Err(DimacsError::ClauseCountMismatch {
            declared: num_clauses,
            found: clauses.len(),
        });
    }
    debug!("read CNF with {} variables and {} clauses", num_vars, clauses.len());
    Ok(Cnf { num_vars, clauses })
}

fn parse_header(line: &str, line_no: usize) -> Result<(u32, usize), DimacsError> {
    let invalid = || DimacsError::InvalidHeader {
        line: line_no,
        text: line.to_string(),
    };
    // Tokens after the clause count are ignored.
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 || parts[0] != "p" || parts[1] != "cnf" {
        return Err(invalid());
    }
    let num_vars = parts[2].parse::<u32>().map_err(|_| invalid())?;
    let num_clauses = parts[3].parse::<usize>().map_err(|_| invalid())?;
    Ok((num_vars, num_clauses))
}
