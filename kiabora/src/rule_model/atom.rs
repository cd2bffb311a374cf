//! This module defines [Atom] and [Predicate].

use std::fmt::Display;

use super::term::{Term, Variable};

/// Predicate symbol, identified by its name together with its arity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Predicate {
    name: String,
    arity: usize,
}

impl Predicate {
    /// Create a new [Predicate].
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    /// Return the name of the predicate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the arity of the predicate.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Atom
///
/// Application of a [Predicate] to a list of [Term]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    predicate: Predicate,
    terms: Vec<Term>,
}

impl Atom {
    /// Create a new [Atom].
    pub fn new(predicate: impl Into<String>, terms: Vec<Term>) -> Self {
        Self {
            predicate: Predicate::new(predicate, terms.len()),
            terms,
        }
    }

    /// Return the predicate of this atom.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Return the arguments of this atom.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Return the number of arguments of this atom.
    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    /// Return an iterator over the variables of this atom,
    /// with repetitions.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.iter().filter_map(Term::as_variable)
    }

    /// Return whether the given variable occurs in this atom.
    pub fn contains_variable(&self, variable: &Variable) -> bool {
        self.variables().any(|var| var == variable)
    }

    /// Return the argument positions at which the given variable occurs.
    pub fn positions_of<'a>(&'a self, variable: &'a Variable) -> impl Iterator<Item = usize> + 'a {
        self.terms
            .iter()
            .enumerate()
            .filter(move |(_, term)| term.as_variable() == Some(variable))
            .map(|(index, _)| index)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.predicate)?;

        if self.terms.is_empty() {
            return Ok(());
        }

        f.write_str("(")?;

        for (term_index, term) in self.terms.iter().enumerate() {
            write!(f, "{}", term)?;

            if term_index < self.terms.len() - 1 {
                f.write_str(", ")?;
            }
        }

        f.write_str(")")
    }
}
