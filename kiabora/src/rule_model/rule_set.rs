//! This module defines [RuleSet].

use std::collections::{hash_map::Entry, HashMap, HashSet};

use super::{error::RuleSetError, rule::Rule};

/// Position of a rule inside its [RuleSet]
pub type RuleIndex = usize;

/// Ordered collection of uniquely labelled [Rule]s
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    labels: HashMap<String, RuleIndex>,
}

impl RuleSet {
    /// Build a [RuleSet] from a sequence of rules.
    ///
    /// Unlabelled rules receive the label `R<n>`, where `n` is their position in the input
    /// (the next free number is used if that label is already taken).
    ///
    /// # Errors
    /// Returns [RuleSetError::DuplicateLabel] if two rules share a label.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Result<Self, RuleSetError> {
        let rules: Vec<Rule> = rules.into_iter().collect();

        let mut labels = HashMap::<String, RuleIndex>::new();
        for (index, rule) in rules.iter().enumerate() {
            let Some(label) = rule.label() else {
                continue;
            };

            match labels.entry(label.to_string()) {
                Entry::Occupied(entry) => {
                    return Err(RuleSetError::DuplicateLabel {
                        label: label.to_string(),
                        first: *entry.get(),
                        second: index,
                    })
                }
                Entry::Vacant(entry) => {
                    entry.insert(index);
                }
            }
        }

        let mut used: HashSet<String> = labels.keys().cloned().collect();
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                if rule.label().is_some() {
                    return rule;
                }

                let label = (index..)
                    .map(|number| format!("R{number}"))
                    .find(|candidate| !used.contains(candidate))
                    .expect("there are infinitely many candidate labels");
                log::debug!("assigning label {label} to rule {index}");

                used.insert(label.clone());
                labels.insert(label.clone(), index);
                rule.labelled(label)
            })
            .collect();

        Ok(Self { rules, labels })
    }

    /// Return the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Return whether the set contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Return an iterator over the rules in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Return the rule at the given position.
    pub fn get(&self, index: RuleIndex) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Return the label of the rule at the given position.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn label(&self, index: RuleIndex) -> &str {
        self.rules[index]
            .label()
            .expect("rules of a rule set are labelled")
    }

    /// Return the position of the rule with the given label.
    pub fn index_of(&self, label: &str) -> Option<RuleIndex> {
        self.labels.get(label).copied()
    }

    /// Return the rules as a slice.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::rule_model::{error::RuleSetError, Atom, Rule, RuleSet, Term};

    fn rule(label: Option<&str>) -> Rule {
        Rule::new(
            label.map(str::to_string),
            vec![Atom::new("p", vec![Term::variable("X")])],
            vec![Atom::new("q", vec![Term::variable("X")])],
        )
        .unwrap()
    }

    #[test]
    fn labels_are_assigned() {
        let rule_set = RuleSet::new([rule(None), rule(Some("R1")), rule(None)]).unwrap();

        assert_eq!(rule_set.label(0), "R0");
        assert_eq!(rule_set.label(1), "R1");
        assert_eq!(rule_set.label(2), "R2");
    }

    #[test]
    fn assigned_labels_avoid_explicit_ones() {
        let rule_set = RuleSet::new([rule(None), rule(Some("R0"))]).unwrap();

        assert_eq!(rule_set.label(0), "R1");
        assert_eq!(rule_set.label(1), "R0");
        assert_eq!(rule_set.index_of("R1"), Some(0));
    }

    #[test]
    fn duplicate_labels() {
        let result = RuleSet::new([rule(Some("a")), rule(None), rule(Some("a"))]);

        assert_eq!(
            result.unwrap_err(),
            RuleSetError::DuplicateLabel {
                label: "a".to_string(),
                first: 0,
                second: 2
            }
        );
    }

    #[test]
    fn empty_rule_set() {
        let rule_set = RuleSet::new(Vec::new()).unwrap();

        assert!(rule_set.is_empty());
    }
}
