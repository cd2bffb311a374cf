//! Dependencies between rules.
//!
//! A rule `R2` depends on a rule `R1` if an application of `R1` may trigger a new
//! application of `R2`. Such a dependency is witnessed by a [PieceUnifier] of the head of
//! `R1` with the body of `R2`, which a [DependencyChecker] then accepts or rejects.

pub mod unifier;

use std::fmt::Debug;

use serde::Serialize;

use crate::rule_model::Rule;

pub use unifier::{piece_unifiers, Node, PieceUnifier, Side};

use unifier::{maps_into, ImageAtom};

/// Strategy deciding which piece-unifiers witness a dependency
pub trait DependencyChecker: Debug {
    /// Name of the strategy
    fn name(&self) -> &'static str;

    /// Return whether `unifier` of the head of `source` with the body of `target`
    /// witnesses a dependency of `target` on `source`.
    fn is_valid_dependency(&self, source: &Rule, target: &Rule, unifier: &PieceUnifier) -> bool;
}

/// Accepts every piece-unifier of the head of the source with the body of the target
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductivityChecker;

impl DependencyChecker for ProductivityChecker {
    fn name(&self) -> &'static str {
        "productivity"
    }

    fn is_valid_dependency(&self, _source: &Rule, _target: &Rule, _unifier: &PieceUnifier) -> bool {
        true
    }
}

/// Accepts the unifiers that are productive for the restricted chase
///
/// The unifier is rejected if it identifies two existential variables,
/// if the unified piece only re-derives atoms of the source body,
/// if the source rule would already be satisfied by its own body,
/// or if the head of the target rule is already satisfied after both applications.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictedProductivityChecker;

impl DependencyChecker for RestrictedProductivityChecker {
    fn name(&self) -> &'static str {
        "restricted productivity"
    }

    fn is_valid_dependency(&self, source: &Rule, target: &Rule, unifier: &PieceUnifier) -> bool {
        if unifier.is_special() {
            return false;
        }

        let substitution = unifier.substitution();
        let source_body = substitution.apply_all(source.body(), Side::Source);

        let piece: Vec<ImageAtom> = unifier
            .piece()
            .iter()
            .map(|&index| substitution.apply(&target.body()[index], Side::Target))
            .collect();
        if piece.iter().all(|atom| source_body.contains(atom)) {
            log::trace!("piece of {unifier} is already in the source body");
            return false;
        }

        let source_head = substitution.apply_all(source.head(), Side::Source);

        let source_existential = |node: &Node| {
            matches!(node, Node::Variable(Side::Source, variable) if source.is_existential(variable))
        };
        if maps_into(&source_head, &source_body, source_existential) {
            log::trace!("source head is satisfied by its body under {unifier}");
            return false;
        }

        let target_head = substitution.apply_all(target.head(), Side::Target);
        let context: Vec<ImageAtom> = source_body
            .into_iter()
            .chain(source_head)
            .chain(substitution.apply_all(target.body(), Side::Target))
            .collect();

        let target_existential = |node: &Node| {
            matches!(node, Node::Variable(Side::Target, variable) if target.is_existential(variable))
        };
        if maps_into(&target_head, &context, target_existential) {
            log::trace!("target head is already satisfied under {unifier}");
            return false;
        }

        true
    }
}

/// Selects the active [DependencyChecker] of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStrategy {
    /// Use [ProductivityChecker]
    #[default]
    Productivity,
    /// Use [RestrictedProductivityChecker]
    RestrictedProductivity,
}

impl DependencyStrategy {
    /// Return the checker implementing this strategy.
    pub fn checker(self) -> &'static dyn DependencyChecker {
        match self {
            DependencyStrategy::Productivity => &ProductivityChecker,
            DependencyStrategy::RestrictedProductivity => &RestrictedProductivityChecker,
        }
    }
}

/// Compute the unifiers witnessing a dependency of `target` on `source`.
///
/// If `collect_all` is false, at most one unifier is returned:
/// the first accepted unifier that is not special, or failing that the first special one.
pub fn dependency_unifiers(
    source: &Rule,
    target: &Rule,
    checker: &dyn DependencyChecker,
    collect_all: bool,
) -> Vec<PieceUnifier> {
    let accepted = piece_unifiers(source, target)
        .into_iter()
        .filter(|unifier| checker.is_valid_dependency(source, target, unifier));

    if collect_all {
        return accepted.collect();
    }

    let mut first_special = None;
    for unifier in accepted {
        if !unifier.is_special() {
            return vec![unifier];
        }

        first_special.get_or_insert(unifier);
    }

    first_special.into_iter().collect()
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::rule_model::{Atom, Rule, Term};

    fn atom(predicate: &str, variables: &[&str]) -> Atom {
        Atom::new(
            predicate,
            variables.iter().map(|name| Term::variable(*name)).collect(),
        )
    }

    fn rule(body: Vec<Atom>, head: Vec<Atom>) -> Rule {
        Rule::new(None, body, head).unwrap()
    }

    #[test]
    fn rederiving_the_body_is_only_dropped_when_restricted() {
        let copy = rule(vec![atom("p", &["X"])], vec![atom("p", &["X"])]);

        assert_eq!(piece_unifiers(&copy, &copy).len(), 1);
        assert_eq!(
            dependency_unifiers(&copy, &copy, &ProductivityChecker, true).len(),
            1
        );
        assert!(dependency_unifiers(&copy, &copy, &RestrictedProductivityChecker, true).is_empty());

        let copy = rule(
            vec![atom("p", &["X"]), atom("s", &["X"])],
            vec![atom("p", &["X"]), atom("s", &["X"])],
        );
        let target = rule(
            vec![atom("p", &["X"]), atom("t", &["X"])],
            vec![atom("r", &["X"])],
        );

        assert!(!dependency_unifiers(&copy, &target, &ProductivityChecker, true).is_empty());
        assert!(
            dependency_unifiers(&copy, &target, &RestrictedProductivityChecker, true).is_empty()
        );
    }

    #[test]
    fn existential_successor_is_productive() {
        let successor = rule(
            vec![atom("p", &["X"])],
            vec![atom("e", &["X", "Y"]), atom("p", &["Y"])],
        );

        let unifiers = dependency_unifiers(&successor, &successor, &ProductivityChecker, true);
        assert_eq!(unifiers.len(), 1);

        let unifiers =
            dependency_unifiers(&successor, &successor, &RestrictedProductivityChecker, true);
        assert_eq!(unifiers.len(), 1);
    }

    #[test]
    fn restricted_drops_satisfied_heads() {
        // the source already derives the head of the target
        let source = rule(
            vec![atom("p", &["X"])],
            vec![atom("q", &["X", "Z"]), atom("r", &["X", "Z"])],
        );
        let target = rule(vec![atom("q", &["X", "Y"])], vec![atom("r", &["X", "Y"])]);

        assert!(!dependency_unifiers(&source, &target, &ProductivityChecker, true).is_empty());
        assert!(
            dependency_unifiers(&source, &target, &RestrictedProductivityChecker, true).is_empty()
        );
    }

    #[test]
    fn restricted_drops_self_satisfied_sources() {
        // the source head q(X, Z) is satisfied by its body q(X, X)
        let source = rule(vec![atom("q", &["X", "X"])], vec![atom("q", &["X", "Z"])]);
        let target = rule(vec![atom("q", &["U", "V"])], vec![atom("s", &["V"])]);

        assert!(!dependency_unifiers(&source, &target, &ProductivityChecker, true).is_empty());
        assert!(
            dependency_unifiers(&source, &target, &RestrictedProductivityChecker, true).is_empty()
        );
    }

    #[test]
    fn first_witness_prefers_non_special_unifiers() {
        let source = rule(
            vec![atom("p", &["X"])],
            vec![atom("q", &["X", "Z1"]), atom("q", &["X", "Z2"])],
        );
        let target = rule(
            vec![atom("q", &["Y", "W"]), atom("q", &["V", "W"])],
            vec![atom("r", &["Y", "V"])],
        );

        let all = dependency_unifiers(&source, &target, &ProductivityChecker, true);
        let first = dependency_unifiers(&source, &target, &ProductivityChecker, false);

        assert!(all.len() > 1);
        assert_eq!(first.len(), 1);
        assert!(!first[0].is_special());
    }

    #[test]
    fn strategies() {
        assert_eq!(DependencyStrategy::default(), DependencyStrategy::Productivity);
        assert_eq!(DependencyStrategy::Productivity.checker().name(), "productivity");
        assert_eq!(
            DependencyStrategy::RestrictedProductivity.checker().name(),
            "restricted productivity"
        );
    }
}
