//! Functionality that provides methods to build the JointAcyclicityGraph of a set of rules.

use petgraph::{algo::is_cyclic_directed, graphmap::DiGraphMap};

use crate::{
    rule_model::Rule,
    static_checks::positions::{
        attacked_positions, body_positions_covered, existential_rule_and_variables,
        PositionsByRuleAndVariables, RuleAndVariable,
    },
};

/// Graph over the existential variables of a set of rules
///
/// There is an edge from `y` to every existential variable of a rule
/// that has a frontier variable attacked by `y`.
#[derive(Debug, Clone)]
pub struct JointAcyclicityGraph<'a>(DiGraphMap<RuleAndVariable<'a>, ()>);

impl<'a> JointAcyclicityGraph<'a> {
    /// Builds the JointAcyclicityGraph of `rules`.
    pub fn new(rules: &[&'a Rule]) -> Self {
        let mut graph = DiGraphMap::new();
        for existential in existential_rule_and_variables(rules) {
            graph.add_node(existential);
        }

        let attacked = attacked_positions(rules);
        for (index, &rule) in rules.iter().enumerate() {
            Self::add_edges_for_rule(&mut graph, index, rule, &attacked);
        }

        Self(graph)
    }

    fn add_edges_for_rule(
        graph: &mut DiGraphMap<RuleAndVariable<'a>, ()>,
        index: usize,
        rule: &'a Rule,
        attacked: &PositionsByRuleAndVariables<'a>,
    ) {
        for (attacking, positions) in attacked {
            let attacks_frontier = rule
                .frontier()
                .iter()
                .any(|variable| body_positions_covered(rule, variable, positions));

            if attacks_frontier {
                for variable in rule.existential_variables() {
                    graph.add_edge(
                        *attacking,
                        RuleAndVariable {
                            rule: index,
                            variable,
                        },
                        (),
                    );
                }
            }
        }
    }

    /// Return the number of existential variables.
    pub fn node_count(&self) -> usize {
        self.0.node_count()
    }

    /// Checks if the graph is cyclic.
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.0)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::JointAcyclicityGraph;
    use crate::{io::parse_rules, rule_model::Rule};

    #[test]
    fn successor_is_cyclic() {
        let rules = parse_rules("e(X, Y), p(Y) :- p(X).").unwrap();
        let rules: Vec<&Rule> = rules.iter().collect();
        let graph = JointAcyclicityGraph::new(&rules);

        assert_eq!(graph.node_count(), 1);
        assert!(graph.is_cyclic());
    }

    #[test]
    fn guarded_join_breaks_cycle() {
        // the null at q[1] never reaches both body positions of X in the second rule
        let rules = parse_rules("q(X, Y) :- p(X). p(X) :- q(X, Y), q(Y, X).").unwrap();
        let rules: Vec<&Rule> = rules.iter().collect();
        let graph = JointAcyclicityGraph::new(&rules);

        assert!(!graph.is_cyclic());
    }
}
