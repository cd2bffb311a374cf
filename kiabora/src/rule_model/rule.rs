//! This module defines [Rule].

use std::{collections::BTreeSet, fmt::Display};

use super::{atom::Atom, error::RuleSetError, term::Variable};

/// Rule
///
/// An existential rule `body -> head`, where body and head are conjunctions of [Atom]s.
/// Variables shared by body and head form the frontier,
/// head variables that do not occur in the body are existentially quantified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Label of the rule
    label: Option<String>,

    /// Body of the rule
    body: Vec<Atom>,
    /// Head of the rule
    head: Vec<Atom>,

    /// Variables shared by body and head
    frontier: BTreeSet<Variable>,
    /// Head variables not bound by the body
    existentials: BTreeSet<Variable>,
}

impl Rule {
    /// Create a new [Rule], deriving its frontier from body and head.
    ///
    /// # Errors
    /// Returns [RuleSetError::MalformedRule] if the head is empty.
    pub fn new(
        label: Option<String>,
        body: Vec<Atom>,
        head: Vec<Atom>,
    ) -> Result<Self, RuleSetError> {
        if head.is_empty() {
            return Err(RuleSetError::malformed(label.as_deref(), "the head is empty"));
        }

        let body_variables: BTreeSet<Variable> =
            body.iter().flat_map(Atom::variables).cloned().collect();
        let (frontier, existentials): (BTreeSet<Variable>, BTreeSet<Variable>) = head
            .iter()
            .flat_map(Atom::variables)
            .cloned()
            .partition(|variable| body_variables.contains(variable));

        Ok(Self {
            label,
            body,
            head,
            frontier,
            existentials,
        })
    }

    /// Create a new [Rule] whose frontier was computed elsewhere.
    ///
    /// # Errors
    /// Returns [RuleSetError::MalformedRule] if the head is empty
    /// or if `frontier` differs from the set of variables shared by body and head.
    pub fn with_frontier(
        label: Option<String>,
        body: Vec<Atom>,
        head: Vec<Atom>,
        frontier: BTreeSet<Variable>,
    ) -> Result<Self, RuleSetError> {
        let rule = Self::new(label, body, head)?;

        if rule.frontier != frontier {
            let expected = rule.frontier.iter().map(Variable::name).collect::<Vec<_>>();
            let given = frontier.iter().map(Variable::name).collect::<Vec<_>>();

            return Err(RuleSetError::malformed(
                rule.label(),
                format!(
                    "frontier {{{}}} does not match the variables shared by body and head {{{}}}",
                    given.join(", "),
                    expected.join(", ")
                ),
            ));
        }

        Ok(rule)
    }

    /// Return the label of the rule, if it has one.
    ///
    /// Every rule of a [RuleSet][super::RuleSet] is labelled.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Return a copy of this rule carrying the given label.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Return a reference to the body of the rule.
    pub fn body(&self) -> &[Atom] {
        &self.body
    }

    /// Return a reference to the head of the rule.
    pub fn head(&self) -> &[Atom] {
        &self.head
    }

    /// Return the frontier of the rule.
    pub fn frontier(&self) -> &BTreeSet<Variable> {
        &self.frontier
    }

    /// Return the existentially quantified variables of the rule.
    pub fn existential_variables(&self) -> &BTreeSet<Variable> {
        &self.existentials
    }

    /// Return whether the given variable is existentially quantified in this rule.
    pub fn is_existential(&self, variable: &Variable) -> bool {
        self.existentials.contains(variable)
    }

    /// Return the set of variables occurring in the body.
    pub fn body_variables(&self) -> BTreeSet<&Variable> {
        self.body.iter().flat_map(Atom::variables).collect()
    }

    /// Return the number of occurrences of the given variable in the body.
    pub fn body_occurrences(&self, variable: &Variable) -> usize {
        self.body
            .iter()
            .flat_map(Atom::variables)
            .filter(|var| *var == variable)
            .count()
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "[{label}] ")?;
        }

        for (head_index, head_atom) in self.head.iter().enumerate() {
            write!(f, "{}", head_atom)?;

            if head_index < self.head.len() - 1 {
                f.write_str(", ")?;
            }
        }

        if !self.body.is_empty() {
            f.write_str(" :- ")?;
        }

        for (body_index, body_atom) in self.body.iter().enumerate() {
            write!(f, "{}", body_atom)?;

            if body_index < self.body.len() - 1 {
                f.write_str(", ")?;
            }
        }

        f.write_str(".")
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use test_log::test;

    use crate::rule_model::{error::RuleSetError, Atom, Rule, Term, Variable};

    fn rule() -> Rule {
        Rule::new(
            Some("r".to_string()),
            vec![Atom::new("p", vec![Term::variable("X"), Term::variable("Y")])],
            vec![Atom::new("q", vec![Term::variable("X"), Term::variable("Z")])],
        )
        .unwrap()
    }

    #[test]
    fn frontier_and_existentials() {
        let rule = rule();

        assert_eq!(rule.frontier(), &BTreeSet::from([Variable::new("X")]));
        assert_eq!(
            rule.existential_variables(),
            &BTreeSet::from([Variable::new("Z")])
        );
        assert!(rule.is_existential(&Variable::new("Z")));
        assert!(!rule.is_existential(&Variable::new("Y")));
    }

    #[test]
    fn empty_head_is_rejected() {
        let result = Rule::new(
            None,
            vec![Atom::new("p", vec![Term::variable("X")])],
            Vec::new(),
        );

        assert!(matches!(result, Err(RuleSetError::MalformedRule { .. })));
    }

    #[test]
    fn wrong_frontier_is_rejected() {
        let result = Rule::with_frontier(
            Some("r".to_string()),
            vec![Atom::new("p", vec![Term::variable("X"), Term::variable("Y")])],
            vec![Atom::new("q", vec![Term::variable("X")])],
            BTreeSet::from([Variable::new("X"), Variable::new("Y")]),
        );

        assert!(matches!(result, Err(RuleSetError::MalformedRule { label, .. }) if label == "r"));
    }

    #[test]
    fn display_is_dlgp() {
        assert_eq!(rule().to_string(), "[r] q(X, Z) :- p(X, Y).");
    }
}
