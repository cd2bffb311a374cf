//! Errors raised while building rules and rule sets.

use thiserror::Error;

/// Structural errors in rules handed to the analyser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    /// Two rules carry the same label
    #[error(r#"label "{label}" is used by rule {first} and rule {second}"#)]
    DuplicateLabel {
        /// The offending label
        label: String,
        /// Index of the first rule carrying the label
        first: usize,
        /// Index of the second rule carrying the label
        second: usize,
    },
    /// The rule is not a well formed existential rule
    #[error(r#"malformed rule "{label}": {reason}"#)]
    MalformedRule {
        /// Label of the rule, if it has one
        label: String,
        /// What is wrong with the rule
        reason: String,
    },
}

impl RuleSetError {
    pub(crate) fn malformed(label: Option<&str>, reason: impl Into<String>) -> Self {
        Self::MalformedRule {
            label: label.unwrap_or("<unlabelled>").to_string(),
            reason: reason.into(),
        }
    }
}
