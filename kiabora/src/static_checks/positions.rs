//! Functionality that provides methods in relation with positions of a set of rules.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    graph::Position,
    rule_model::{Atom, Rule, Variable},
};

/// Type to represent a set of positions.
pub type Positions<'a> = BTreeSet<Position<'a>>;

/// A variable of a rule, where the rule is given by its index in the analysed slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleAndVariable<'a> {
    /// Index of the rule
    pub rule: usize,
    /// The variable
    pub variable: &'a Variable,
}

/// Type to map existential variables to the positions they attack.
pub type PositionsByRuleAndVariables<'a> = BTreeMap<RuleAndVariable<'a>, Positions<'a>>;

/// Return the positions at which `variable` occurs in `atoms`.
pub fn positions_of<'a>(atoms: &'a [Atom], variable: &'a Variable) -> Positions<'a> {
    atoms
        .iter()
        .flat_map(|atom| {
            atom.positions_of(variable)
                .map(move |index| Position::new(atom.predicate(), index))
        })
        .collect()
}

/// Return whether every body position of `variable` in `rule` lies in `positions`.
///
/// Variables that do not occur in the body are never covered.
pub fn body_positions_covered(rule: &Rule, variable: &Variable, positions: &Positions) -> bool {
    let body_positions = positions_of(rule.body(), variable);

    !body_positions.is_empty() && body_positions.is_subset(positions)
}

/// Close `positions` under propagation through frontier variables:
/// if every body position of a frontier variable is in the set,
/// so are its head positions.
fn propagate<'a>(rules: &[&'a Rule], mut positions: Positions<'a>) -> Positions<'a> {
    loop {
        let mut new_positions = Positions::new();

        for rule in rules {
            for variable in rule.frontier() {
                if body_positions_covered(rule, variable, &positions) {
                    new_positions.extend(
                        positions_of(rule.head(), variable)
                            .into_iter()
                            .filter(|position| !positions.contains(position)),
                    );
                }
            }
        }

        if new_positions.is_empty() {
            return positions;
        }

        positions.extend(new_positions);
    }
}

/// Return the affected positions of `rules`,
/// that is the positions at which a null may occur during the chase.
pub fn affected_positions<'a>(rules: &[&'a Rule]) -> Positions<'a> {
    let initial = rules
        .iter()
        .flat_map(|rule| {
            rule.existential_variables()
                .iter()
                .flat_map(|variable| positions_of(rule.head(), variable))
        })
        .collect();

    propagate(rules, initial)
}

/// Return the existential variables of `rules`.
pub fn existential_rule_and_variables<'a>(rules: &[&'a Rule]) -> BTreeSet<RuleAndVariable<'a>> {
    rules
        .iter()
        .enumerate()
        .flat_map(|(index, rule)| {
            rule.existential_variables()
                .iter()
                .map(move |variable| RuleAndVariable {
                    rule: index,
                    variable,
                })
        })
        .collect()
}

/// Return, for every existential variable of `rules`, the positions it attacks,
/// that is the positions at which a null created for this variable may occur.
pub fn attacked_positions<'a>(rules: &[&'a Rule]) -> PositionsByRuleAndVariables<'a> {
    existential_rule_and_variables(rules)
        .into_iter()
        .map(|existential| {
            let initial = positions_of(rules[existential.rule].head(), existential.variable);
            (existential, propagate(rules, initial))
        })
        .collect()
}

/// Return whether `variable` of `rule` is attacked by some existential variable.
pub fn is_attacked(
    rule: &Rule,
    variable: &Variable,
    attacked_positions: &PositionsByRuleAndVariables,
) -> bool {
    attacked_positions
        .values()
        .any(|positions| body_positions_covered(rule, variable, positions))
}

/// Compute the sticky marking of `rules`.
///
/// A body variable is marked initially if some head atom does not contain it.
/// Afterwards, a body variable is marked if it occurs in the head at a position
/// where some rule body holds a marked variable.
pub fn sticky_marking<'a>(rules: &[&'a Rule]) -> BTreeSet<RuleAndVariable<'a>> {
    let mut marked: BTreeSet<RuleAndVariable<'a>> = rules
        .iter()
        .enumerate()
        .flat_map(|(index, rule)| {
            rule.body_variables()
                .into_iter()
                .filter(|variable| rule.head().iter().any(|atom| !atom.contains_variable(variable)))
                .map(move |variable| RuleAndVariable {
                    rule: index,
                    variable,
                })
        })
        .collect();

    loop {
        let marked_positions: Positions = marked
            .iter()
            .flat_map(|marked| positions_of(rules[marked.rule].body(), marked.variable))
            .collect();

        let mut newly_marked = BTreeSet::new();
        for (index, rule) in rules.iter().enumerate() {
            for variable in rule.frontier() {
                let candidate = RuleAndVariable {
                    rule: index,
                    variable,
                };
                if marked.contains(&candidate) {
                    continue;
                }

                if !positions_of(rule.head(), variable).is_disjoint(&marked_positions) {
                    newly_marked.insert(candidate);
                }
            }
        }

        if newly_marked.is_empty() {
            log::trace!("sticky marking: {} marked variables", marked.len());
            return marked;
        }

        marked.extend(newly_marked);
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::{io::parse_rules, rule_model::Predicate};

    #[test]
    fn affected() {
        let rules = parse_rules("r(X, Z) :- p(X). s(Y) :- r(X, Y). t(X) :- r(X, Y), p(Y).").unwrap();
        let rules: Vec<&Rule> = rules.iter().collect();

        let r = Predicate::new("r", 2);
        let s = Predicate::new("s", 1);
        let t = Predicate::new("t", 1);

        let affected = affected_positions(&rules);
        assert!(affected.contains(&Position::new(&r, 1)));
        assert!(affected.contains(&Position::new(&s, 0)));
        assert!(!affected.contains(&Position::new(&r, 0)));
        assert!(!affected.contains(&Position::new(&t, 0)));
    }

    #[test]
    fn attacked() {
        let rules = parse_rules("r(X, Z) :- p(X). q(Y, W) :- s(Y).").unwrap();
        let rules: Vec<&Rule> = rules.iter().collect();

        let attacked = attacked_positions(&rules);
        assert_eq!(attacked.len(), 2);

        let z = Variable::new("Z");
        let by_z = &attacked[&RuleAndVariable {
            rule: 0,
            variable: &z,
        }];
        assert_eq!(by_z.len(), 1);
    }

    #[test]
    fn marking() {
        // Y does not reach the head of the first rule and is marked,
        // X of the second rule occurs at the marked position p[1]
        let rules = parse_rules("q(X) :- p(X, Y). p(X, X) :- s(X).").unwrap();
        let rules: Vec<&Rule> = rules.iter().collect();

        let x = Variable::new("X");
        let y = Variable::new("Y");
        let marked = sticky_marking(&rules);

        assert!(marked.contains(&RuleAndVariable {
            rule: 0,
            variable: &y
        }));
        assert!(!marked.contains(&RuleAndVariable {
            rule: 0,
            variable: &x
        }));
        assert!(marked.contains(&RuleAndVariable {
            rule: 1,
            variable: &x
        }));
    }
}
