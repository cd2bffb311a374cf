//! Functionality that provides the static checks for a single rule.

use std::collections::BTreeSet;

use crate::{
    rule_model::{Rule, Variable},
    static_checks::positions::{
        body_positions_covered, is_attacked, Positions, PositionsByRuleAndVariables,
    },
};

/// This trait gives some static checks for a rule.
pub trait RuleProperties {
    /// Determine whether no variable occurs more than once in the body.
    fn is_joinless(&self) -> bool;
    /// Determine whether the body has at most one atom.
    fn is_linear(&self) -> bool;
    /// Determine whether some body atom contains every body variable.
    fn is_guarded(&self) -> bool;
    /// Determine whether every head atom contains either no frontier variable
    /// or every body variable.
    fn is_domain_restricted(&self) -> bool;
    /// Determine whether there is at most one frontier variable.
    fn is_frontier_one(&self) -> bool;
    /// Determine whether there are no existential variables.
    fn is_datalog(&self) -> bool;
    /// Determine whether body and head share no variable.
    fn is_disconnected(&self) -> bool;
    /// Determine whether some body atom contains every frontier variable.
    fn is_frontier_guarded(&self) -> bool;
    /// Determine whether some body atom contains every affected body variable.
    fn is_weakly_guarded(&self, affected_positions: &Positions) -> bool;
    /// Determine whether some body atom contains every affected frontier variable.
    fn is_weakly_frontier_guarded(&self, affected_positions: &Positions) -> bool;
    /// Determine whether some body atom contains every attacked body variable.
    fn is_jointly_guarded(&self, attacked_positions: &PositionsByRuleAndVariables) -> bool;
    /// Determine whether some body atom contains every attacked frontier variable.
    fn is_jointly_frontier_guarded(
        &self,
        attacked_positions: &PositionsByRuleAndVariables,
    ) -> bool;
}

impl Rule {
    fn is_guarded_for_variables(&self, variables: &BTreeSet<&Variable>) -> bool {
        variables.is_empty()
            || self
                .body()
                .iter()
                .any(|atom| variables.iter().all(|variable| atom.contains_variable(variable)))
    }

    fn affected_variables<'a>(
        &'a self,
        variables: impl IntoIterator<Item = &'a Variable>,
        affected_positions: &Positions,
    ) -> BTreeSet<&'a Variable> {
        variables
            .into_iter()
            .filter(|variable| body_positions_covered(self, variable, affected_positions))
            .collect()
    }

    fn attacked_variables<'a>(
        &'a self,
        variables: impl IntoIterator<Item = &'a Variable>,
        attacked_positions: &PositionsByRuleAndVariables,
    ) -> BTreeSet<&'a Variable> {
        variables
            .into_iter()
            .filter(|variable| is_attacked(self, variable, attacked_positions))
            .collect()
    }
}

impl RuleProperties for Rule {
    fn is_joinless(&self) -> bool {
        self.body_variables()
            .into_iter()
            .all(|variable| self.body_occurrences(variable) <= 1)
    }

    fn is_linear(&self) -> bool {
        1 >= self.body().len()
    }

    fn is_guarded(&self) -> bool {
        self.is_guarded_for_variables(&self.body_variables())
    }

    fn is_domain_restricted(&self) -> bool {
        let body_variables = self.body_variables();
        self.head().iter().all(|atom| {
            let universal_variables: BTreeSet<&Variable> = atom
                .variables()
                .filter(|variable| !self.is_existential(variable))
                .collect();

            universal_variables.is_empty() || universal_variables == body_variables
        })
    }

    fn is_frontier_one(&self) -> bool {
        1 >= self.frontier().len()
    }

    fn is_datalog(&self) -> bool {
        self.existential_variables().is_empty()
    }

    fn is_disconnected(&self) -> bool {
        self.frontier().is_empty()
    }

    fn is_frontier_guarded(&self) -> bool {
        self.is_guarded_for_variables(&self.frontier().iter().collect())
    }

    fn is_weakly_guarded(&self, affected_positions: &Positions) -> bool {
        let affected = self.affected_variables(self.body_variables(), affected_positions);
        self.is_guarded_for_variables(&affected)
    }

    fn is_weakly_frontier_guarded(&self, affected_positions: &Positions) -> bool {
        let affected = self.affected_variables(self.frontier(), affected_positions);
        self.is_guarded_for_variables(&affected)
    }

    fn is_jointly_guarded(&self, attacked_positions: &PositionsByRuleAndVariables) -> bool {
        let attacked = self.attacked_variables(self.body_variables(), attacked_positions);
        self.is_guarded_for_variables(&attacked)
    }

    fn is_jointly_frontier_guarded(
        &self,
        attacked_positions: &PositionsByRuleAndVariables,
    ) -> bool {
        let attacked = self.attacked_variables(self.frontier(), attacked_positions);
        self.is_guarded_for_variables(&attacked)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::RuleProperties;
    use crate::{
        io::parse_rules,
        rule_model::Rule,
        static_checks::positions::{affected_positions, attacked_positions},
    };

    fn rule(input: &str) -> Rule {
        parse_rules(input).unwrap().remove(0)
    }

    #[test]
    fn linear_and_guarded() {
        let linear = rule("q(X, Z) :- p(X, Y).");
        assert!(linear.is_linear());
        assert!(linear.is_guarded());
        assert!(linear.is_frontier_guarded());

        let guarded = rule("q(X) :- p(X, Y), r(Y).");
        assert!(!guarded.is_linear());
        assert!(guarded.is_guarded());

        let unguarded = rule("q(X, Y) :- p(X), r(Y).");
        assert!(!unguarded.is_guarded());
        assert!(!unguarded.is_frontier_guarded());
    }

    #[test]
    fn frontier() {
        let one = rule("q(X, Z) :- p(X, Y), r(Y).");
        assert!(one.is_frontier_one());
        assert!(!one.is_disconnected());

        let disconnected = rule("q(Z) :- p(X).");
        assert!(disconnected.is_disconnected());
        assert!(disconnected.is_frontier_one());
        assert!(disconnected.is_frontier_guarded());
    }

    #[test]
    fn joins() {
        assert!(rule("q(X) :- p(X, Y), r(Z).").is_joinless());
        assert!(!rule("q(X) :- p(X, Y), r(Y).").is_joinless());
        assert!(!rule("q(X) :- p(X, X).").is_joinless());
    }

    #[test]
    fn datalog_and_domain_restriction() {
        assert!(rule("q(X) :- p(X).").is_datalog());
        assert!(!rule("q(X, Z) :- p(X).").is_datalog());

        assert!(rule("q(X, Y, Z), r(Z) :- p(X, Y).").is_domain_restricted());
        assert!(!rule("q(X, Z) :- p(X, Y).").is_domain_restricted());
    }

    #[test]
    fn weakly_and_jointly_guarded() {
        let rules = parse_rules("r(X, Z) :- p(X). q(X, Y) :- r(U, Y), s(X, U).").unwrap();
        let references: Vec<&Rule> = rules.iter().collect();
        let affected = affected_positions(&references);
        let attacked = attacked_positions(&references);

        // only Y may hold a null and r(U, Y) guards it
        let joining = &rules[1];
        assert!(!joining.is_guarded());
        assert!(joining.is_weakly_guarded(&affected));
        assert!(joining.is_weakly_frontier_guarded(&affected));
        assert!(joining.is_jointly_guarded(&attacked));
        assert!(joining.is_jointly_frontier_guarded(&attacked));
    }
}
