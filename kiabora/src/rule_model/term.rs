//! This module defines [Term] and [Variable].

use std::fmt::Display;

/// Variable occurring in a rule
///
/// Whether a variable is universally or existentially quantified is a
/// property of the rule it occurs in, not of the variable itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    /// Create a new [Variable].
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the name of the variable.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Argument of an [Atom][super::Atom]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A variable
    Variable(Variable),
    /// A constant, kept in its textual form (identifier, number, quoted string or IRI)
    Constant(String),
}

impl Term {
    /// Create a variable term.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new(name))
    }

    /// Create a constant term.
    pub fn constant(name: impl Into<String>) -> Self {
        Self::Constant(name.into())
    }

    /// Return the variable if this term is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(variable) => Some(variable),
            Term::Constant(_) => None,
        }
    }

    /// Return whether this term is a constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Variable(variable) => variable.fmt(f),
            Term::Constant(constant) => f.write_str(constant),
        }
    }
}
