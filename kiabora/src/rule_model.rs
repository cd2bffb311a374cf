//! This module defines the logical representation of existential rules.

pub mod atom;
pub mod error;
pub mod rule;
pub mod rule_set;
pub mod term;

pub use atom::{Atom, Predicate};
pub use rule::Rule;
pub use rule_set::{RuleIndex, RuleSet};
pub use term::{Term, Variable};
