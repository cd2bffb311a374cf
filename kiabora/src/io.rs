//! Adapters between the DLGP rule file format and the rule model.
//!
//! Writing rules back to DLGP is provided by the [Display][std::fmt::Display]
//! implementations of the [rule model][crate::rule_model].

pub mod parser;

pub use parser::{parse_rules, parse_statements, Statement};
