//! The graph of rule dependencies.

use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    dependency::{dependency_unifiers, DependencyChecker, PieceUnifier},
    rule_model::{RuleIndex, RuleSet},
};

/// Dependency of a target rule on a source rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    source: RuleIndex,
    target: RuleIndex,
    unifiers: Vec<PieceUnifier>,
    special: bool,
}

impl DependencyEdge {
    /// Return the rule whose application triggers the target.
    pub fn source(&self) -> RuleIndex {
        self.source
    }

    /// Return the rule that is triggered.
    pub fn target(&self) -> RuleIndex {
        self.target
    }

    /// Return the unifiers witnessing this dependency.
    pub fn unifiers(&self) -> &[PieceUnifier] {
        &self.unifiers
    }

    /// Return whether every witness of this dependency identifies two existential variables.
    pub fn is_special(&self) -> bool {
        self.special
    }
}

/// Graph of rule dependencies
///
/// Node `i` of the underlying graph is the rule at position `i` of the [RuleSet].
/// There is at most one edge per ordered pair of rules, self-loops included.
#[derive(Debug, Clone, Default)]
pub struct Grd {
    graph: DiGraph<RuleIndex, DependencyEdge>,
}

impl Grd {
    /// Build the graph of rule dependencies of `rules`,
    /// testing every ordered pair of rules with `checker`.
    ///
    /// If `collect_all` is set, every edge carries all its unifiers,
    /// otherwise only the first witness found.
    pub fn new(rules: &RuleSet, checker: &dyn DependencyChecker, collect_all: bool) -> Self {
        let mut graph = DiGraph::with_capacity(rules.len(), rules.len());
        for index in 0..rules.len() {
            graph.add_node(index);
        }

        for (source_index, source) in rules.iter().enumerate() {
            for (target_index, target) in rules.iter().enumerate() {
                let unifiers = dependency_unifiers(source, target, checker, collect_all);
                if unifiers.is_empty() {
                    continue;
                }

                let special = unifiers.iter().all(PieceUnifier::is_special);
                log::debug!(
                    "{} {} {} ({} unifiers)",
                    rules.label(source_index),
                    if special { "~>" } else { "->" },
                    rules.label(target_index),
                    unifiers.len()
                );

                graph.add_edge(
                    NodeIndex::new(source_index),
                    NodeIndex::new(target_index),
                    DependencyEdge {
                        source: source_index,
                        target: target_index,
                        unifiers,
                        special,
                    },
                );
            }
        }

        log::info!(
            "built dependency graph with {} rules and {} edges using {}",
            graph.node_count(),
            graph.edge_count(),
            checker.name()
        );

        Self { graph }
    }

    /// Return the number of rules.
    pub fn rule_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of dependencies.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return the dependencies, ordered by source and then target.
    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.graph.edge_weights()
    }

    /// Return the dependency of `target` on `source`, if there is one.
    pub fn edge(&self, source: RuleIndex, target: RuleIndex) -> Option<&DependencyEdge> {
        self.graph
            .find_edge(NodeIndex::new(source), NodeIndex::new(target))
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Return whether `target` depends on `source`.
    pub fn has_edge(&self, source: RuleIndex, target: RuleIndex) -> bool {
        self.edge(source, target).is_some()
    }

    /// Return the rules that depend on `rule`.
    pub fn successors(&self, rule: RuleIndex) -> impl Iterator<Item = RuleIndex> + '_ {
        self.graph
            .edges(NodeIndex::new(rule))
            .map(|edge| edge.target().index())
    }

    /// Return a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<RuleIndex, DependencyEdge> {
        &self.graph
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        dependency::{ProductivityChecker, RestrictedProductivityChecker},
        graph::Grd,
        io::parse_rules,
        rule_model::RuleSet,
    };

    fn rule_set(input: &str) -> RuleSet {
        RuleSet::new(parse_rules(input).unwrap()).unwrap()
    }

    #[test]
    fn chain() {
        let rules = rule_set("[A] q(X) :- p(X). [B] r(X) :- q(X).");
        let grd = Grd::new(&rules, &ProductivityChecker, false);

        assert_eq!(grd.rule_count(), 2);
        assert_eq!(grd.edge_count(), 1);
        assert!(grd.has_edge(0, 1));
        assert!(!grd.has_edge(1, 0));
        assert_eq!(grd.successors(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn self_loop() {
        let rules = rule_set("[succ] e(X, Y), p(Y) :- p(X).");
        let grd = Grd::new(&rules, &ProductivityChecker, false);

        let edge = grd.edge(0, 0).unwrap();
        assert_eq!(edge.source(), 0);
        assert_eq!(edge.target(), 0);
        assert!(!edge.is_special());
    }

    #[test]
    fn unifiers_are_collected_on_request() {
        let rules = rule_set("[A] q(X, Z1), q(X, Z2) :- p(X). [B] r(Y, V) :- q(Y, W), q(V, W).");

        let first = Grd::new(&rules, &ProductivityChecker, false);
        let all = Grd::new(&rules, &ProductivityChecker, true);

        assert_eq!(first.edge(0, 1).unwrap().unifiers().len(), 1);
        assert_eq!(all.edge(0, 1).unwrap().unifiers().len(), 3);
        assert!(!all.edge(0, 1).unwrap().is_special());
    }

    #[test]
    fn restricted_removes_edges() {
        let rules = rule_set("[A] q(X, Z), r(X, Z) :- p(X). [B] r(X, Y) :- q(X, Y).");

        let plain = Grd::new(&rules, &ProductivityChecker, false);
        let restricted = Grd::new(&rules, &RestrictedProductivityChecker, false);

        assert!(plain.has_edge(0, 1));
        assert!(!restricted.has_edge(0, 1));
    }
}
