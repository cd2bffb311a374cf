//! Error-handling module for the crate

use thiserror::Error;

use crate::{
    analyser::AnalysisError, io::parser::LocatedParseError, rule_model::error::RuleSetError,
};

/// Error-Collection for all the possible Errors occurring in this crate
#[allow(variant_size_differences)]
#[derive(Error, Debug)]
pub enum Error {
    /// Errors while building rules or rule sets
    #[error(transparent)]
    RuleSetError(#[from] RuleSetError),
    /// Parse errors
    #[error(transparent)]
    ParseError(#[from] LocatedParseError),
    /// Errors while setting up an analysis
    #[error(transparent)]
    AnalysisError(#[from] AnalysisError),
}
