use nom::{error::ErrorKind, IResult};
use nom_locate::LocatedSpan;
use thiserror::Error;

/// A [`LocatedSpan`] over the input.
pub(super) type Span<'a> = LocatedSpan<&'a str>;

/// An intermediate parsing result
pub(super) type IntermediateResult<'a, T> = IResult<Span<'a>, T, LocatedParseError>;

/// The result of a parse
pub type ParseResult<T> = Result<T, LocatedParseError>;

/// A [`ParseError`] at a certain location
#[derive(Debug, Error)]
#[error("Parse error on line {}, column {}: {}\nat {}{}", .line, .column, .source, .fragment, format_parse_error_context(.context))]
pub struct LocatedParseError {
    #[source]
    pub(super) source: ParseError,
    pub(super) line: u32,
    pub(super) column: usize,
    pub(super) fragment: String,
    pub(super) context: Vec<LocatedParseError>,
}

impl LocatedParseError {
    /// Append another [`LocatedParseError`] as context to this error.
    pub fn append(&mut self, other: LocatedParseError) {
        self.context.push(other)
    }

    /// Return the line on which the error occurred.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Return the column at which the error occurred.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Return the underlying [`ParseError`].
    pub fn kind(&self) -> &ParseError {
        &self.source
    }
}

fn format_parse_error_context(context: &[LocatedParseError]) -> String {
    let mut fragments = Vec::new();

    for error in context {
        let error_string = format!("{error}");
        for line in error_string.split('\n') {
            fragments.push(format!("{}{line}", " ".repeat(2)));
        }
    }

    if fragments.is_empty() {
        String::new()
    } else {
        format!("\nContext:\n{}", fragments.join("\n"))
    }
}

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A syntax error. Note that we cannot take [&'a str] here, as
    /// bounds on [std::error::Error] require ['static] lifetime.
    #[error("Syntax error: {0}")]
    SyntaxError(String),
    /// More input needed.
    #[error("Expected further input: {0}")]
    MissingInput(String),
    /// Use of an undeclared prefix.
    #[error(r#"Undeclared prefix "{0}""#)]
    UndeclaredPrefix(String),
    /// Unknown directive.
    #[error(r#"Unknown directive "@{0}""#)]
    UnknownDirective(String),
    /// The parsed rule is not well formed.
    #[error("{0}")]
    InvalidRule(String),
    /// Expected a token.
    #[error(r#"Expected "{0}""#)]
    ExpectedToken(String),
    /// Expected a statement.
    #[error("Expected a statement (i.e., a fact, a rule, a constraint or a query)")]
    ExpectedStatement,
    /// Expected a directive.
    #[error("Expected a directive")]
    ExpectedDirective,
    /// Expected a label.
    #[error("Expected a label")]
    ExpectedLabel,
    /// Expected a rule or a fact.
    #[error("Expected a rule or a fact")]
    ExpectedRuleOrFact,
    /// Expected a negative constraint.
    #[error("Expected a negative constraint")]
    ExpectedConstraint,
    /// Expected a query.
    #[error("Expected a query")]
    ExpectedQuery,
    /// Expected an atom.
    #[error("Expected an atom")]
    ExpectedAtom,
    /// Expected a predicate name.
    #[error("Expected a predicate name")]
    ExpectedPredicate,
    /// Expected a term.
    #[error("Expected a term")]
    ExpectedTerm,
    /// Expected a variable.
    #[error("Expected a variable")]
    ExpectedVariable,
    /// Expected a constant.
    #[error("Expected a constant")]
    ExpectedConstant,
    /// Expected an IRI.
    #[error("Expected an IRI")]
    ExpectedIriref,
    /// Expected a prefixed name.
    #[error("Expected a prefixed name")]
    ExpectedPrefixedName,
}

impl ParseError {
    /// Locate this error by adding a position.
    pub fn at(self, position: Span) -> LocatedParseError {
        let column = position.naive_get_utf8_column();
        let fragment = if position.is_empty() {
            String::new()
        } else {
            let line = String::from_utf8_lossy(position.get_line_beginning()).to_string();
            format!("\"{line}\"\n{}^", "-".repeat(column))
        };

        LocatedParseError {
            source: self,
            line: position.location_line(),
            column,
            fragment,
            context: Vec::new(),
        }
    }
}

impl nom::error::ParseError<Span<'_>> for LocatedParseError {
    fn from_error_kind(input: Span, kind: ErrorKind) -> Self {
        ParseError::SyntaxError(kind.description().to_string()).at(input)
    }

    fn append(input: Span, kind: ErrorKind, other: Self) -> Self {
        let mut error = ParseError::SyntaxError(kind.description().to_string()).at(input);
        error.append(other);
        error
    }
}
