//! Static analysis of existential rule sets
//!
//! Builds the graph of rule dependencies of a rule set, decomposes it into
//! strongly connected components and evaluates a hierarchy of sufficient
//! conditions on rules, components and the whole set in order to certify
//! that forward chaining (FES), backward chaining (FUS) or bounded-treewidth
//! reasoning (BTS) terminates.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

pub mod analyser;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod io;
pub mod property;
pub mod rule_model;
pub mod static_checks;

pub use analyser::{Analyser, AnalyserConfig};
