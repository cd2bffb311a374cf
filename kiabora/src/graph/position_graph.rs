//! The predicate position graph of a rule set.

use std::{
    collections::{BTreeSet, HashMap},
    fmt::Display,
};

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap, visit::Dfs};

use crate::rule_model::{Atom, Predicate, Rule, Variable};

/// Argument position of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position<'a> {
    /// The predicate
    pub predicate: &'a Predicate,
    /// The zero-based argument index
    pub index: usize,
}

impl<'a> Position<'a> {
    /// Create a new [Position].
    pub fn new(predicate: &'a Predicate, index: usize) -> Self {
        Self { predicate, index }
    }
}

impl Display for Position<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.predicate, self.index)
    }
}

/// Enum to distinguish between (common / special) edges of the [PositionGraph].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionGraphEdgeType {
    /// A frontier variable is propagated from the source to the target position.
    Common,
    /// A new null may be created at the target position
    /// from a value at the source position.
    Special,
}

/// Graph over predicate positions tracking how values propagate through rule applications
///
/// For every frontier variable `X` of a rule, there is a common edge from every body position of
/// `X` to every head position of `X`, and a special edge from every body position of `X` to
/// every position of an existential variable.
#[derive(Debug, Clone, Default)]
pub struct PositionGraph<'a> {
    graph: DiGraphMap<Position<'a>, PositionGraphEdgeType>,
}

impl<'a> PositionGraph<'a> {
    /// Build the position graph of the given rules.
    pub fn new(rules: impl IntoIterator<Item = &'a Rule>) -> Self {
        let mut result = Self::default();

        for rule in rules {
            result.add_rule(rule);
        }

        log::trace!(
            "built position graph with {} positions and {} edges",
            result.graph.node_count(),
            result.graph.edge_count()
        );

        result
    }

    fn add_rule(&mut self, rule: &'a Rule) {
        for atom in rule.body().iter().chain(rule.head()) {
            for index in 0..atom.arity() {
                self.graph.add_node(Position::new(atom.predicate(), index));
            }
        }

        let existential_positions: Vec<Position<'a>> = rule
            .existential_variables()
            .iter()
            .flat_map(|variable| occurrences(rule.head(), variable))
            .collect();

        for variable in rule.frontier() {
            let head_positions: Vec<Position<'a>> = occurrences(rule.head(), variable).collect();

            for body_position in occurrences(rule.body(), variable) {
                for &head_position in &head_positions {
                    self.add_edge(body_position, head_position, PositionGraphEdgeType::Common);
                }

                for &existential_position in &existential_positions {
                    self.add_edge(
                        body_position,
                        existential_position,
                        PositionGraphEdgeType::Special,
                    );
                }
            }
        }
    }

    /// A special edge is never downgraded to a common one.
    fn add_edge(&mut self, from: Position<'a>, to: Position<'a>, edge: PositionGraphEdgeType) {
        if self.graph.edge_weight(from, to) != Some(&PositionGraphEdgeType::Special) {
            self.graph.add_edge(from, to, edge);
        }
    }

    /// Return the edges of the graph in ascending order.
    pub fn edges(&self) -> Vec<(Position<'a>, Position<'a>, PositionGraphEdgeType)> {
        let mut edges: Vec<_> = self
            .graph
            .all_edges()
            .map(|(from, to, edge)| (from, to, *edge))
            .collect();
        edges.sort_by_key(|&(from, to, _)| (from, to));

        edges
    }

    /// Return the special edges whose endpoints lie on a common cycle.
    fn special_edges_on_cycles(&self) -> Vec<(Position<'a>, Position<'a>)> {
        let component_of: HashMap<Position<'a>, usize> = tarjan_scc(&self.graph)
            .into_iter()
            .enumerate()
            .flat_map(|(index, component)| component.into_iter().map(move |node| (node, index)))
            .collect();

        self.graph
            .all_edges()
            .filter(|(from, to, edge)| {
                **edge == PositionGraphEdgeType::Special && component_of[from] == component_of[to]
            })
            .map(|(from, to, _)| (from, to))
            .collect()
    }

    /// Return whether no cycle of the graph goes through a special edge.
    pub fn is_weakly_acyclic(&self) -> bool {
        self.special_edges_on_cycles().is_empty()
    }

    /// Return the positions that may hold infinitely many nulls during the chase,
    /// that is the positions reachable from a special edge on a cycle.
    pub fn infinite_rank_positions(&self) -> BTreeSet<Position<'a>> {
        let mut result = BTreeSet::new();

        for (_, start) in self.special_edges_on_cycles() {
            if result.contains(&start) {
                continue;
            }

            let mut dfs = Dfs::new(&self.graph, start);
            while let Some(position) = dfs.next(&self.graph) {
                result.insert(position);
            }
        }

        result
    }
}

fn occurrences<'a>(
    atoms: &'a [Atom],
    variable: &'a Variable,
) -> impl Iterator<Item = Position<'a>> + 'a {
    atoms.iter().flat_map(move |atom| {
        atom.positions_of(variable)
            .map(move |index| Position::new(atom.predicate(), index))
    })
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::{PositionGraph, PositionGraphEdgeType};
    use crate::io::parse_rules;

    #[test]
    fn edges() {
        let rules = parse_rules("q(X, Z) :- p(X, Y).").unwrap();
        let graph = PositionGraph::new(&rules);

        let edges: Vec<String> = graph
            .edges()
            .into_iter()
            .map(|(from, to, edge)| match edge {
                PositionGraphEdgeType::Common => format!("{from} -> {to}"),
                PositionGraphEdgeType::Special => format!("{from} ~> {to}"),
            })
            .collect();

        assert_eq!(edges, vec!["p[0] -> q[0]", "p[0] ~> q[1]"]);
    }

    #[test]
    fn special_edges_win() {
        let rules = parse_rules("q(X, Z) :- p(X). q(X, X) :- p(X).").unwrap();
        let graph = PositionGraph::new(&rules);

        let edges = graph.edges();
        let (_, _, edge) = edges
            .iter()
            .find(|(from, to, _)| from.index == 0 && to.index == 1)
            .unwrap();

        assert_eq!(*edge, PositionGraphEdgeType::Special);
    }

    #[test]
    fn weak_acyclicity() {
        let successor = parse_rules("p(Y), e(X, Y) :- p(X).").unwrap();
        let graph = PositionGraph::new(&successor);

        assert!(!graph.is_weakly_acyclic());
        assert_eq!(graph.infinite_rank_positions().len(), 3);

        let datalog = parse_rules("q(X) :- p(X). p(X) :- q(X).").unwrap();
        let graph = PositionGraph::new(&datalog);

        assert!(graph.is_weakly_acyclic());
        assert!(graph.infinite_rank_positions().is_empty());
    }
}
