//! A parser for rule files in the DLGP format.

use std::{cell::RefCell, collections::HashMap, fmt::Debug};

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::{alpha1, anychar, char, digit1, multispace1, satisfy},
    combinator::{all_consuming, cut, map, opt, recognize, value},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    Err,
};

use crate::rule_model::{Atom, Rule, Term, Variable};

pub(crate) mod types;

use types::{IntermediateResult, Span};
pub use types::{LocatedParseError, ParseError, ParseResult};

/// A record of a DLGP document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A conjunction of facts
    Fact {
        /// Label of the statement, if any
        label: Option<String>,
        /// The asserted atoms
        atoms: Vec<Atom>,
    },
    /// An existential rule
    Rule(Rule),
    /// A negative constraint `! :- body.`
    NegativeConstraint {
        /// Label of the statement, if any
        label: Option<String>,
        /// Body of the constraint
        body: Vec<Atom>,
    },
    /// A conjunctive query `?(X) :- body.`
    Query {
        /// Label of the statement, if any
        label: Option<String>,
        /// Answer terms
        answer: Vec<Term>,
        /// Body of the query
        body: Vec<Atom>,
    },
}

impl Statement {
    /// Return the rule if this statement is one.
    pub fn into_rule(self) -> Option<Rule> {
        match self {
            Statement::Rule(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Parse every statement of a DLGP document.
///
/// # Errors
/// Returns a [LocatedParseError] pointing at the first statement that could not be parsed.
pub fn parse_statements(input: &str) -> ParseResult<Vec<Statement>> {
    all_input_consumed(RuleParser::new().parse_document())(input)
}

/// Parse a DLGP document and keep only its rules.
///
/// Facts, negative constraints and queries are dropped.
///
/// # Errors
/// Returns a [LocatedParseError] pointing at the first statement that could not be parsed.
pub fn parse_rules(input: &str) -> ParseResult<Vec<Rule>> {
    let statements = parse_statements(input)?;
    let total = statements.len();

    let rules: Vec<Rule> = statements
        .into_iter()
        .filter_map(Statement::into_rule)
        .collect();
    log::debug!(
        "parsed {} rules, dropped {} other statements",
        rules.len(),
        total - rules.len()
    );

    Ok(rules)
}

/// A combinator to add tracing to the parser.
/// [fun] is an identifier for the parser and [parser] is the actual parser.
#[inline(always)]
fn traced<'a, T, P>(
    fun: &'static str,
    mut parser: P,
) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, T>
where
    T: Debug,
    P: FnMut(Span<'a>) -> IntermediateResult<'a, T>,
{
    move |input| {
        log::trace!(target: "parser", "{fun}({input:?})");
        let result = parser(input);
        log::trace!(target: "parser", "{fun}({input:?}) -> {result:?}");
        result
    }
}

/// A combinator that makes sure all input has been consumed.
fn all_input_consumed<'a, T: 'a>(
    parser: impl FnMut(Span<'a>) -> IntermediateResult<'a, T> + 'a,
) -> impl FnMut(&'a str) -> ParseResult<T> + 'a {
    let mut p = all_consuming(parser);
    move |input| {
        let input = Span::new(input);
        p(input).map(|(_, result)| result).map_err(|e| match e {
            Err::Incomplete(e) => ParseError::MissingInput(match e {
                nom::Needed::Unknown => "expected an unknown amount of further input".to_string(),
                nom::Needed::Size(size) => format!("expected at least {size} more bytes"),
            })
            .at(input),
            Err::Error(e) | Err::Failure(e) => e,
        })
    }
}

/// A combinator that recognises a comment, starting at a `%`
/// character and ending at the end of the line.
fn comment(input: Span) -> IntermediateResult<()> {
    alt((
        value((), pair(tag("%"), is_not("\n\r"))),
        // a comment that immediately precedes the end of the line
        value((), tag("%")),
    ))(input)
}

/// A combinator that recognises an arbitrary amount of whitespace and
/// comments.
fn multispace_or_comment0(input: Span) -> IntermediateResult<()> {
    value((), many0(alt((value((), multispace1), comment))))(input)
}

/// A combinator that recognises any non-empty amount of whitespace
/// and comments.
fn multispace_or_comment1(input: Span) -> IntermediateResult<()> {
    value((), many1(alt((value((), multispace1), comment))))(input)
}

/// A combinator that modifies the associated error.
fn map_error<'a, T: 'a>(
    mut parser: impl FnMut(Span<'a>) -> IntermediateResult<'a, T> + 'a,
    mut error: impl FnMut() -> ParseError + 'a,
) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, T> + 'a {
    move |input| {
        parser(input).map_err(|e| match e {
            Err::Incomplete(_) => e,
            Err::Error(context) => {
                let mut err = error().at(input);
                err.append(context);
                Err::Error(err)
            }
            Err::Failure(context) => {
                let mut err = error().at(input);
                err.append(context);
                Err::Failure(err)
            }
        })
    }
}

/// A combinator that creates a parser for a specific token.
fn token<'a>(token: &'a str) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Span<'a>> {
    map_error(tag(token), || ParseError::ExpectedToken(token.to_string()))
}

/// A combinator that creates a parser for a specific token,
/// surrounded by whitespace or comments.
fn space_delimited_token<'a>(
    token: &'a str,
) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Span<'a>> {
    map_error(
        delimited(multispace_or_comment0, tag(token), multispace_or_comment0),
        || ParseError::ExpectedToken(token.to_string()),
    )
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parse an identifier starting with a lowercase letter.
fn parse_lowercase_name(input: Span) -> IntermediateResult<Span> {
    recognize(pair(satisfy(char::is_lowercase), take_while(is_name_char)))(input)
}

/// Parse the content of an IRI reference `<...>`.
fn parse_iriref(input: Span) -> IntermediateResult<Span> {
    delimited(
        char('<'),
        take_while(|c: char| {
            !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
        }),
        char('>'),
    )(input)
}

/// Parse the prefix part of a prefixed name, without the colon.
fn parse_prefix_label(input: Span) -> IntermediateResult<Span> {
    recognize(opt(pair(
        satisfy(char::is_alphabetic),
        take_while(|c: char| is_name_char(c) || c == '-'),
    )))(input)
}

/// Parse the local part of a prefixed name.
///
/// The local part may not start with `-`, so `p:-q` is read as a rule.
fn parse_local_name(input: Span) -> IntermediateResult<Span> {
    recognize(pair(
        satisfy(is_name_char),
        take_while(|c: char| is_name_char(c) || c == '-'),
    ))(input)
}

fn parse_number(input: Span) -> IntermediateResult<Span> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

/// Parse a quoted string, optionally followed by a datatype or a language tag.
fn parse_string_literal(input: Span) -> IntermediateResult<Span> {
    recognize(tuple((
        char('"'),
        many0(alt((is_not("\\\""), recognize(pair(char('\\'), anychar))))),
        cut(char('"')),
        opt(alt((
            recognize(pair(tag("^^"), parse_iriref)),
            recognize(pair(
                char('@'),
                take_while(|c: char| c.is_alphanumeric() || c == '-'),
            )),
        ))),
    )))(input)
}

/// The main parser. Holds a hash map for
/// prefixes, as well as the base IRI.
#[derive(Debug, Default)]
struct RuleParser<'a> {
    /// The base IRI, if set.
    base: RefCell<Option<&'a str>>,
    /// A map from prefixes to (resolved) IRIs.
    prefixes: RefCell<HashMap<&'a str, String>>,
}

impl<'a> RuleParser<'a> {
    /// Construct a new [RuleParser].
    fn new() -> Self {
        Default::default()
    }

    /// Resolve a relative IRI against the base IRI.
    fn resolve_iri(&self, iri: &str) -> String {
        match *self.base.borrow() {
            Some(base) if !iri.contains(':') => format!("{base}{iri}"),
            _ => iri.to_string(),
        }
    }

    /// Parse the dot that ends statements, optionally surrounded by spaces.
    fn parse_dot(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Span<'a>> {
        traced("parse_dot", space_delimited_token("."))
    }

    /// Parse a comma, optionally surrounded by spaces.
    fn parse_comma(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Span<'a>> {
        traced("parse_comma", space_delimited_token(","))
    }

    /// Parse the rule arrow `:-`, optionally surrounded by spaces.
    fn parse_arrow(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Span<'a>> {
        traced("parse_arrow", space_delimited_token(":-"))
    }

    /// Parse an opening parenthesis, optionally surrounded by spaces.
    fn parse_open_parenthesis(
        &'a self,
    ) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Span<'a>> {
        traced("parse_open_parenthesis", space_delimited_token("("))
    }

    /// Parse a closing parenthesis, optionally surrounded by spaces.
    fn parse_close_parenthesis(
        &'a self,
    ) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Span<'a>> {
        traced("parse_close_parenthesis", space_delimited_token(")"))
    }

    /// Parse a directive such as `@prefix` or a section marker such as `@rules`.
    fn parse_directive(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, ()> {
        traced(
            "parse_directive",
            map_error(
                move |input| {
                    let (remainder, name) = preceded(token("@"), cut(alpha1))(input)?;

                    match *name.fragment() {
                        "base" => {
                            let (remainder, iri) =
                                preceded(multispace_or_comment0, cut(parse_iriref))(remainder)?;

                            log::debug!(target: "parser", r#"parse_directive: set new base: "{iri}""#);
                            *self.base.borrow_mut() = Some(*iri.fragment());

                            Ok((remainder, ()))
                        }
                        "prefix" => {
                            let (remainder, (prefix, iri)) = preceded(
                                multispace_or_comment1,
                                cut(separated_pair(
                                    terminated(parse_prefix_label, char(':')),
                                    multispace_or_comment0,
                                    parse_iriref,
                                )),
                            )(remainder)?;

                            log::debug!(target: "parser", r#"parse_directive: got prefix "{prefix}" for iri "{iri}""#);
                            let iri = self.resolve_iri(iri.fragment());
                            self.prefixes.borrow_mut().insert(*prefix.fragment(), iri);

                            Ok((remainder, ()))
                        }
                        "top" => {
                            let (remainder, top) = preceded(
                                multispace_or_comment1,
                                cut(self.parse_predicate_name()),
                            )(remainder)?;

                            log::debug!(target: "parser", "parse_directive: ignoring top predicate {top}");

                            Ok((remainder, ()))
                        }
                        "una" | "facts" | "rules" | "queries" | "constraints" => {
                            Ok((remainder, ()))
                        }
                        other => Err(Err::Failure(
                            ParseError::UnknownDirective(other.to_string()).at(input),
                        )),
                    }
                },
                || ParseError::ExpectedDirective,
            ),
        )
    }

    /// Parse a statement label `[...]`.
    fn parse_label(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, String> {
        traced(
            "parse_label",
            map_error(
                map(
                    delimited(token("["), is_not("]\n\r"), cut(token("]"))),
                    |label: Span<'a>| label.fragment().trim().to_string(),
                ),
                || ParseError::ExpectedLabel,
            ),
        )
    }

    /// Parse an IRI, resolving it against the base.
    fn parse_iri(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, String> {
        traced(
            "parse_iri",
            map_error(
                move |input| {
                    let (remainder, iri) = parse_iriref(input)?;

                    Ok((remainder, format!("<{}>", self.resolve_iri(iri.fragment()))))
                },
                || ParseError::ExpectedIriref,
            ),
        )
    }

    /// Parse a prefixed name and expand it into an IRI.
    fn parse_prefixed_name(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, String> {
        traced(
            "parse_prefixed_name",
            map_error(
                move |input| {
                    let (remainder, (prefix, local)) =
                        pair(terminated(parse_prefix_label, char(':')), parse_local_name)(input)?;

                    let prefixes = self.prefixes.borrow();
                    let iri = prefixes.get(prefix.fragment()).ok_or_else(|| {
                        Err::Failure(ParseError::UndeclaredPrefix(prefix.to_string()).at(input))
                    })?;

                    Ok((remainder, format!("<{iri}{local}>")))
                },
                || ParseError::ExpectedPrefixedName,
            ),
        )
    }

    /// Parse the name of a predicate.
    fn parse_predicate_name(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, String> {
        traced(
            "parse_predicate_name",
            map_error(
                alt((
                    self.parse_iri(),
                    self.parse_prefixed_name(),
                    map(parse_lowercase_name, |name: Span<'a>| name.to_string()),
                )),
                || ParseError::ExpectedPredicate,
            ),
        )
    }

    /// Parse a variable.
    fn parse_variable(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Variable> {
        traced(
            "parse_variable",
            map_error(
                map(
                    recognize(pair(
                        satisfy(|c| c.is_uppercase() || c == '_'),
                        take_while(is_name_char),
                    )),
                    |name: Span<'a>| Variable::new(*name.fragment()),
                ),
                || ParseError::ExpectedVariable,
            ),
        )
    }

    /// Parse a constant.
    fn parse_constant(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Term> {
        traced(
            "parse_constant",
            map_error(
                alt((
                    map(self.parse_iri(), Term::Constant),
                    map(self.parse_prefixed_name(), Term::Constant),
                    map(parse_number, |number: Span<'a>| {
                        Term::constant(*number.fragment())
                    }),
                    map(parse_string_literal, |literal: Span<'a>| {
                        Term::constant(*literal.fragment())
                    }),
                    map(parse_lowercase_name, |name: Span<'a>| {
                        Term::constant(*name.fragment())
                    }),
                )),
                || ParseError::ExpectedConstant,
            ),
        )
    }

    /// Parse a [Term].
    fn parse_term(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Term> {
        traced(
            "parse_term",
            map_error(
                alt((map(self.parse_variable(), Term::Variable), self.parse_constant())),
                || ParseError::ExpectedTerm,
            ),
        )
    }

    /// Parse an [Atom]. Nullary atoms may omit the parentheses.
    fn parse_atom(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Atom> {
        traced(
            "parse_atom",
            map_error(
                move |input| {
                    let (remainder, predicate) = self.parse_predicate_name()(input)?;
                    let (remainder, terms) = opt(delimited(
                        self.parse_open_parenthesis(),
                        cut(separated_list0(self.parse_comma(), self.parse_term())),
                        cut(self.parse_close_parenthesis()),
                    ))(remainder)?;

                    log::trace!(target: "parser", "found atom {predicate}({terms:?})");

                    Ok((remainder, Atom::new(predicate, terms.unwrap_or_default())))
                },
                || ParseError::ExpectedAtom,
            ),
        )
    }

    /// Parse a non-empty conjunction of atoms.
    fn parse_conjunction(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Vec<Atom>> {
        traced(
            "parse_conjunction",
            separated_list1(self.parse_comma(), self.parse_atom()),
        )
    }

    /// Parse a negative constraint `! :- body.`.
    fn parse_constraint(
        &'a self,
        label: Option<String>,
    ) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Statement> {
        traced(
            "parse_constraint",
            map_error(
                move |input| {
                    let (remainder, body) = preceded(
                        pair(token("!"), cut(self.parse_arrow())),
                        cut(terminated(self.parse_conjunction(), self.parse_dot())),
                    )(input)?;

                    Ok((
                        remainder,
                        Statement::NegativeConstraint {
                            label: label.clone(),
                            body,
                        },
                    ))
                },
                || ParseError::ExpectedConstraint,
            ),
        )
    }

    /// Parse a conjunctive query `?(X, Y) :- body.`.
    fn parse_query(
        &'a self,
        label: Option<String>,
    ) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Statement> {
        traced(
            "parse_query",
            map_error(
                move |input| {
                    let (remainder, answer) = preceded(
                        token("?"),
                        opt(delimited(
                            self.parse_open_parenthesis(),
                            cut(separated_list0(self.parse_comma(), self.parse_term())),
                            cut(self.parse_close_parenthesis()),
                        )),
                    )(input)?;
                    let (remainder, body) = preceded(
                        cut(self.parse_arrow()),
                        cut(terminated(self.parse_conjunction(), self.parse_dot())),
                    )(remainder)?;

                    Ok((
                        remainder,
                        Statement::Query {
                            label: label.clone(),
                            answer: answer.unwrap_or_default(),
                            body,
                        },
                    ))
                },
                || ParseError::ExpectedQuery,
            ),
        )
    }

    /// Parse a rule `head :- body.` or a fact `atoms.`.
    fn parse_rule_or_fact(
        &'a self,
        label: Option<String>,
    ) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Statement> {
        traced(
            "parse_rule_or_fact",
            map_error(
                move |input| {
                    let (remainder, head) = self.parse_conjunction()(input)?;
                    let (remainder, body) =
                        opt(preceded(self.parse_arrow(), cut(self.parse_conjunction())))(
                            remainder,
                        )?;
                    let (remainder, _) = cut(self.parse_dot())(remainder)?;

                    let Some(body) = body else {
                        return Ok((
                            remainder,
                            Statement::Fact {
                                label: label.clone(),
                                atoms: head,
                            },
                        ));
                    };

                    let rule = Rule::new(label.clone(), body, head).map_err(|err| {
                        Err::Failure(ParseError::InvalidRule(err.to_string()).at(input))
                    })?;
                    log::trace!(target: "parser", "found rule {rule}");

                    Ok((remainder, Statement::Rule(rule)))
                },
                || ParseError::ExpectedRuleOrFact,
            ),
        )
    }

    /// Parse a (possibly labelled) statement.
    fn parse_statement(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Statement> {
        traced(
            "parse_statement",
            map_error(
                move |input| {
                    let (remainder, label) =
                        opt(terminated(self.parse_label(), multispace_or_comment0))(input)?;

                    alt((
                        self.parse_constraint(label.clone()),
                        self.parse_query(label.clone()),
                        self.parse_rule_or_fact(label),
                    ))(remainder)
                },
                || ParseError::ExpectedStatement,
            ),
        )
    }

    /// Parse a whole DLGP document.
    fn parse_document(&'a self) -> impl FnMut(Span<'a>) -> IntermediateResult<'a, Vec<Statement>> {
        traced("parse_document", move |input| {
            let (mut remainder, _) = multispace_or_comment0(input)?;
            let mut statements = Vec::new();

            while !remainder.is_empty() {
                let (rest, statement) = terminated(
                    alt((
                        map(self.parse_directive(), |_| None::<Statement>),
                        map(self.parse_statement(), Some),
                    )),
                    multispace_or_comment0,
                )(remainder)?;

                statements.extend(statement);
                remainder = rest;
            }

            log::debug!(target: "parser", "parsed {} statements", statements.len());

            Ok((remainder, statements))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    macro_rules! assert_parse {
        ($parser:expr, $left:expr, $right:expr $(,) ?) => {
            assert_eq!(
                all_input_consumed($parser)($left).expect(
                    format!("failed to parse `{:?}`\nexpected `{:?}`", $left, $right).as_str()
                ),
                $right
            );
        };
    }

    fn var(name: &str) -> Term {
        Term::variable(name)
    }

    fn constant(name: &str) -> Term {
        Term::constant(name)
    }

    #[test]
    fn atom() {
        let parser = RuleParser::new();

        assert_parse!(
            parser.parse_atom(),
            r#"p(X, a, "some string", -12.5, <http://example.org/c>)"#,
            Atom::new(
                "p",
                vec![
                    var("X"),
                    constant("a"),
                    constant(r#""some string""#),
                    constant("-12.5"),
                    constant("<http://example.org/c>"),
                ]
            )
        );
        assert_parse!(parser.parse_atom(), "stop", Atom::new("stop", Vec::new()));
        assert_parse!(
            parser.parse_atom(),
            "q( _Y ,Z1 )",
            Atom::new("q", vec![var("_Y"), var("Z1")])
        );
    }

    #[test]
    fn labelled_rule() {
        let statements = parse_statements("[r1] q(X, Z) :- p(X, Y).").unwrap();

        let expected = Rule::new(
            Some("r1".to_string()),
            vec![Atom::new("p", vec![var("X"), var("Y")])],
            vec![Atom::new("q", vec![var("X"), var("Z")])],
        )
        .unwrap();
        assert_eq!(statements, vec![Statement::Rule(expected)]);
    }

    #[test]
    fn statement_kinds() {
        let input = r#"
            @facts
            p(a), q(b).
            @rules
            [r] q(X) :- p(X).
            @constraints
            ! :- p(X), q(X).
            @queries
            [qu] ?(X) :- q(X).
            ? :- p(a).
        "#;

        let statements = parse_statements(input).unwrap();

        assert_eq!(statements.len(), 5);
        assert_eq!(
            statements[0],
            Statement::Fact {
                label: None,
                atoms: vec![
                    Atom::new("p", vec![constant("a")]),
                    Atom::new("q", vec![constant("b")])
                ]
            }
        );
        assert!(matches!(statements[1], Statement::Rule(_)));
        assert_eq!(
            statements[2],
            Statement::NegativeConstraint {
                label: None,
                body: vec![
                    Atom::new("p", vec![var("X")]),
                    Atom::new("q", vec![var("X")])
                ]
            }
        );
        assert_eq!(
            statements[3],
            Statement::Query {
                label: Some("qu".to_string()),
                answer: vec![var("X")],
                body: vec![Atom::new("q", vec![var("X")])]
            }
        );
        assert!(matches!(&statements[4], Statement::Query { answer, .. } if answer.is_empty()));
    }

    #[test]
    fn only_rules_are_kept() {
        let rules = parse_rules("p(a). q(X) :- p(X). ! :- q(a). r(X) :- q(X).").unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].head()[0].predicate().name(), "q");
        assert_eq!(rules[1].head()[0].predicate().name(), "r");
    }

    #[test]
    fn comments() {
        let input = "% leading comment\np(X) :- q(X). % trailing\n%\nr(X) :- % inside\n p(X).";

        assert_eq!(parse_rules(input).unwrap().len(), 2);
    }

    #[test]
    fn prefixes_and_base() {
        let input = r#"
            @base <http://example.org/>
            @prefix ex: <http://example.org/ns#>
            @prefix rel: <rel/>
            @una
            @top top
            ex:q(X) :- rel:p(X, <c>).
        "#;

        let rules = parse_rules(input).unwrap();

        assert_eq!(
            rules[0].head(),
            &[Atom::new("<http://example.org/ns#q>", vec![var("X")])]
        );
        assert_eq!(
            rules[0].body(),
            &[Atom::new(
                "<http://example.org/rel/p>",
                vec![var("X"), constant("<http://example.org/c>")]
            )]
        );
    }

    #[test]
    fn arrow_after_nullary_atom() {
        let rules = parse_rules("p:-q.").unwrap();

        assert_eq!(rules[0].head(), &[Atom::new("p", Vec::new())]);
        assert_eq!(rules[0].body(), &[Atom::new("q", Vec::new())]);
    }

    #[test]
    fn undeclared_prefix() {
        let result = parse_rules("ex:q(X) :- p(X).");

        assert!(result
            .unwrap_err()
            .to_string()
            .contains(r#"Undeclared prefix "ex""#));
    }

    #[test]
    fn unknown_directive() {
        let result = parse_statements("@import <file.csv>");

        assert!(result
            .unwrap_err()
            .to_string()
            .contains(r#"Unknown directive "@import""#));
    }

    #[test]
    fn error_location() {
        let error = parse_statements("p(a).\nq(X :- r(X).").unwrap_err();

        assert_eq!(error.line(), 2);
        assert_eq!(error.column(), 1);
        assert!(matches!(error.kind(), ParseError::ExpectedStatement));
    }

    #[test]
    fn written_rules_parse_back() {
        let input = r#"[r] q(X, Z), s(Z, "c") :- p(X, Y), t(Y, 3)."#;
        let rule = parse_rules(input).unwrap().remove(0);

        assert_eq!(rule.to_string(), input);
        assert_eq!(parse_rules(&rule.to_string()).unwrap(), vec![rule]);
    }
}
