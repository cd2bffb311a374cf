//! Evaluation of [Property]s on rules, components and whole rule sets.

use std::{collections::BTreeMap, fmt::Display};

use petgraph::{algo::is_cyclic_directed, graphmap::DiGraphMap};

use crate::{
    graph::{ComponentIndex, Condensation, Grd},
    property::{Property, PropertyHierarchy, Satisfaction},
    rule_model::{Rule, RuleIndex, RuleSet},
    static_checks::RulesProperties,
};

/// Satisfaction of each selected property, ordered by label
pub type PropertyTable = BTreeMap<Property, Satisfaction>;

/// Granularity at which properties are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A single rule
    Rule(RuleIndex),
    /// A strongly connected component of the graph of rule dependencies
    Component(ComponentIndex),
    /// The whole rule set
    RuleSet,
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Rule(rule) => write!(f, "rule {rule}"),
            Scope::Component(component) => write!(f, "C{component}"),
            Scope::RuleSet => write!(f, "rule set"),
        }
    }
}

/// Computes [PropertyTable]s for the scopes of an analysis
#[derive(Debug, Clone, Copy)]
pub struct PropertyEvaluator<'a> {
    hierarchy: &'a PropertyHierarchy,
    rules: &'a RuleSet,
    grd: &'a Grd,
    condensation: &'a Condensation,
}

impl<'a> PropertyEvaluator<'a> {
    /// Create a new [PropertyEvaluator].
    pub fn new(
        hierarchy: &'a PropertyHierarchy,
        rules: &'a RuleSet,
        grd: &'a Grd,
        condensation: &'a Condensation,
    ) -> Self {
        Self {
            hierarchy,
            rules,
            grd,
            condensation,
        }
    }

    /// Evaluate every selected property on every rule.
    pub fn evaluate_rules(&self) -> Vec<PropertyTable> {
        (0..self.rules.len())
            .map(|rule| self.evaluate(Scope::Rule(rule), &[]))
            .collect()
    }

    /// Evaluate every selected property on the given scope.
    ///
    /// Properties that only concern single rules are taken from `rule_tables`
    /// for scopes larger than a rule. If `rule_tables` does not cover every rule,
    /// the rule tables are recomputed with [PropertyEvaluator::evaluate_rules].
    pub fn evaluate(&self, scope: Scope, rule_tables: &[PropertyTable]) -> PropertyTable {
        let computed;
        let rule_tables: &[PropertyTable] = match scope {
            Scope::Component(_) | Scope::RuleSet if rule_tables.len() < self.rules.len() => {
                log::debug!("{scope}: rule tables are missing, evaluating every rule");
                computed = self.evaluate_rules();
                computed.as_slice()
            }
            _ => rule_tables,
        };

        let indices = self.indices(scope);
        let rules: Vec<&Rule> = indices
            .iter()
            .map(|&index| &self.rules.rules()[index])
            .collect();

        let mut table = PropertyTable::new();
        for &property in self.hierarchy.properties() {
            let implied = self
                .hierarchy
                .implying(property)
                .find(|stronger| table.get(stronger).is_some_and(|value| value.holds()));

            let value = match implied {
                Some(stronger) => {
                    log::trace!("{scope}: {property} is implied by {stronger}");
                    Satisfaction::Holds
                }
                None => match scope {
                    Scope::Rule(_) => self.check(property, &indices, &rules),
                    _ if property.is_rule_local() => Satisfaction::all(
                        indices
                            .iter()
                            .map(|&rule| rule_tables[rule][&property]),
                    ),
                    _ => self.check(property, &indices, &rules),
                },
            };

            table.insert(property, value);
        }

        for &property in self.hierarchy.properties() {
            if table[&property] != Satisfaction::Fails {
                continue;
            }

            for stronger in self.hierarchy.implying(property) {
                if let Some(value) = table.get_mut(&stronger) {
                    if *value == Satisfaction::Unknown {
                        log::trace!("{scope}: {stronger} fails because {property} fails");
                        *value = Satisfaction::Fails;
                    }
                }
            }
        }

        log::debug!(
            "{scope}: {}",
            table
                .iter()
                .map(|(property, value)| format!("{property}={value}"))
                .collect::<Vec<_>>()
                .join(" ")
        );

        table
    }

    fn indices(&self, scope: Scope) -> Vec<RuleIndex> {
        match scope {
            Scope::Rule(rule) => vec![rule],
            Scope::Component(component) => self.condensation.component(component).to_vec(),
            Scope::RuleSet => (0..self.rules.len()).collect(),
        }
    }

    /// Return whether the dependencies among `indices` contain a cycle.
    fn has_cyclic_dependencies(&self, indices: &[RuleIndex]) -> bool {
        let mut graph = DiGraphMap::<RuleIndex, ()>::new();
        for &index in indices {
            graph.add_node(index);
        }

        for edge in self.grd.edges() {
            if graph.contains_node(edge.source()) && graph.contains_node(edge.target()) {
                graph.add_edge(edge.source(), edge.target(), ());
            }
        }

        is_cyclic_directed(&graph)
    }

    fn check(&self, property: Property, indices: &[RuleIndex], rules: &[&Rule]) -> Satisfaction {
        let holds = match property {
            Property::FiniteExpansionSet
            | Property::FiniteUnificationSet
            | Property::BoundedTreewidthSet => return Satisfaction::Unknown,
            Property::AcyclicGrd => !self.has_cyclic_dependencies(indices),
            Property::Disconnected => rules.is_disconnected(),
            Property::DomainRestricted => rules.is_domain_restricted(),
            Property::FrontierGuarded => rules.is_frontier_guarded(),
            Property::FrontierOne => rules.is_frontier_one(),
            Property::Guarded => rules.is_guarded(),
            Property::JointlyAcyclic => rules.is_jointly_acyclic(),
            Property::JointlyFrontierGuarded => rules.is_jointly_frontier_guarded(),
            Property::JointlyGuarded => rules.is_jointly_guarded(),
            Property::Joinless => rules.is_joinless(),
            Property::Linear => rules.is_linear(),
            Property::RangeRestricted => rules.is_datalog(),
            Property::Sticky => rules.is_sticky(),
            Property::WeaklyAcyclic => rules.is_weakly_acyclic(),
            Property::WeaklyFrontierGuarded => rules.is_weakly_frontier_guarded(),
            Property::WeaklyGuarded => rules.is_weakly_guarded(),
            Property::WeaklySticky => rules.is_weakly_sticky(),
        };

        Satisfaction::from_bool(holds)
    }
}
