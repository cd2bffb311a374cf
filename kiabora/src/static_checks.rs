//! Syntactic sufficient conditions for the decidability of reasoning over rules.
//!
//! [RuleProperties] gives the checks that only look at a single rule,
//! [RulesProperties] the checks over a set of rules,
//! built on the [positions] and [acyclicity graphs][acyclicity_graphs] of the set.

pub mod acyclicity_graphs;
pub mod positions;
pub mod rule_properties;
pub mod rules_properties;

pub use rule_properties::RuleProperties;
pub use rules_properties::RulesProperties;
