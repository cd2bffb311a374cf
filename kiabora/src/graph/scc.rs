//! Strongly connected components of the graph of rule dependencies.

use std::collections::BTreeSet;

use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};

use crate::{graph::Grd, rule_model::RuleIndex};

/// Index of a strongly connected component
pub type ComponentIndex = usize;

/// Condensation of the graph of rule dependencies
///
/// Components are numbered in a topological order of the condensation,
/// so every edge goes from a smaller to a larger index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condensation {
    components: Vec<Vec<RuleIndex>>,
    component_of: Vec<ComponentIndex>,
    edges: BTreeSet<(ComponentIndex, ComponentIndex)>,
    successors: Vec<BTreeSet<ComponentIndex>>,
    predecessors: Vec<BTreeSet<ComponentIndex>>,
    ancestors: Vec<BTreeSet<ComponentIndex>>,
}

impl Condensation {
    /// Decompose the graph of rule dependencies into its strongly connected components.
    pub fn from_grd(grd: &Grd) -> Self {
        // tarjan_scc returns the components in reverse topological order
        let components: Vec<Vec<RuleIndex>> = tarjan_scc(grd.graph())
            .into_iter()
            .rev()
            .map(|component| {
                let mut rules: Vec<RuleIndex> =
                    component.into_iter().map(|node| node.index()).collect();
                rules.sort_unstable();
                rules
            })
            .collect();

        let mut component_of = vec![0; grd.rule_count()];
        for (index, component) in components.iter().enumerate() {
            for &rule in component {
                component_of[rule] = index;
            }
        }

        let edges: Vec<(ComponentIndex, ComponentIndex)> = grd
            .edges()
            .map(|edge| (component_of[edge.source()], component_of[edge.target()]))
            .filter(|(from, to)| from != to)
            .collect();

        let condensation = Self::new(components, edges);
        log::debug!(
            "decomposed {} rules into {} components with {} edges",
            grd.rule_count(),
            condensation.len(),
            condensation.edges.len()
        );

        condensation
    }

    /// Create a condensation from its components and the edges between them.
    ///
    /// # Panics
    /// Panics if the components do not partition `0..n` for some `n`
    /// or if some edge does not go from a smaller to a larger component index.
    pub fn new(
        components: Vec<Vec<RuleIndex>>,
        edges: impl IntoIterator<Item = (ComponentIndex, ComponentIndex)>,
    ) -> Self {
        let rule_count = components.iter().map(Vec::len).sum();
        let mut component_of = vec![ComponentIndex::MAX; rule_count];
        for (index, component) in components.iter().enumerate() {
            for &rule in component {
                assert!(rule < rule_count, "rule {rule} is out of range");
                assert_eq!(
                    component_of[rule],
                    ComponentIndex::MAX,
                    "rule {rule} belongs to two components"
                );
                component_of[rule] = index;
            }
        }

        let mut successors = vec![BTreeSet::new(); components.len()];
        let mut predecessors = vec![BTreeSet::new(); components.len()];
        let edges: BTreeSet<(ComponentIndex, ComponentIndex)> = edges.into_iter().collect();
        for &(from, to) in &edges {
            assert!(
                from < to && to < components.len(),
                "condensation edge {from} -> {to} is not topological"
            );
            successors[from].insert(to);
            predecessors[to].insert(from);
        }

        let mut ancestors: Vec<BTreeSet<ComponentIndex>> = Vec::with_capacity(components.len());
        for component_predecessors in &predecessors {
            let mut component_ancestors = component_predecessors.clone();
            for &predecessor in component_predecessors {
                component_ancestors.extend(ancestors[predecessor].iter().copied());
            }
            ancestors.push(component_ancestors);
        }

        Self {
            components,
            component_of,
            edges,
            successors,
            predecessors,
            ancestors,
        }
    }

    /// Return the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Return whether there are no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Return the components, each given by its rules in ascending order.
    pub fn components(&self) -> &[Vec<RuleIndex>] {
        &self.components
    }

    /// Return the rules of the given component.
    pub fn component(&self, component: ComponentIndex) -> &[RuleIndex] {
        &self.components[component]
    }

    /// Return the component the given rule belongs to.
    pub fn component_of(&self, rule: RuleIndex) -> ComponentIndex {
        self.component_of[rule]
    }

    /// Return the edges between components in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (ComponentIndex, ComponentIndex)> + '_ {
        self.edges.iter().copied()
    }

    /// Return the components with an edge from `component`.
    pub fn successors(&self, component: ComponentIndex) -> &BTreeSet<ComponentIndex> {
        &self.successors[component]
    }

    /// Return the components with an edge to `component`.
    pub fn predecessors(&self, component: ComponentIndex) -> &BTreeSet<ComponentIndex> {
        &self.predecessors[component]
    }

    /// Return the components from which `component` can be reached.
    pub fn ancestors(&self, component: ComponentIndex) -> &BTreeSet<ComponentIndex> {
        &self.ancestors[component]
    }

    /// Return whether the condensation is free of cycles.
    pub fn is_acyclic(&self) -> bool {
        let mut graph = DiGraphMap::<ComponentIndex, ()>::new();
        for component in 0..self.len() {
            graph.add_node(component);
        }
        for (from, to) in self.edges() {
            graph.add_edge(from, to, ());
        }

        !is_cyclic_directed(&graph)
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use test_log::test;

    use crate::{
        dependency::ProductivityChecker,
        graph::{Condensation, Grd},
        io::parse_rules,
        rule_model::RuleSet,
    };

    fn condensation(input: &str) -> Condensation {
        let rules = RuleSet::new(parse_rules(input).unwrap()).unwrap();
        Condensation::from_grd(&Grd::new(&rules, &ProductivityChecker, false))
    }

    #[test]
    fn empty() {
        let condensation = condensation("");

        assert!(condensation.is_empty());
        assert_eq!(condensation.edges().count(), 0);
        assert!(condensation.is_acyclic());
    }

    #[test]
    fn chain_is_ordered_topologically() {
        // B is listed first but A feeds into it
        let condensation = condensation("[B] r(X) :- q(X). [A] q(X) :- p(X).");

        assert_eq!(condensation.components(), &[vec![1], vec![0]]);
        assert_eq!(condensation.edges().collect::<Vec<_>>(), vec![(0, 1)]);
        assert_eq!(condensation.component_of(1), 0);
    }

    #[test]
    fn mutual_dependency() {
        let condensation = condensation("[A] q(X) :- p(X). [B] p(X) :- q(X), s(X).");

        assert_eq!(condensation.components(), &[vec![0, 1]]);
        assert_eq!(condensation.edges().count(), 0);
    }

    #[test]
    fn ancestors() {
        let condensation = Condensation::new(
            vec![vec![0], vec![1], vec![2], vec![3]],
            [(0, 1), (1, 2), (0, 3)],
        );

        assert_eq!(condensation.ancestors(2), &BTreeSet::from([0, 1]));
        assert_eq!(condensation.ancestors(3), &BTreeSet::from([0]));
        assert!(condensation.ancestors(0).is_empty());
        assert_eq!(condensation.successors(0), &BTreeSet::from([1, 3]));
        assert_eq!(condensation.predecessors(2), &BTreeSet::from([1]));
        assert!(condensation.is_acyclic());
    }

    #[test]
    #[should_panic(expected = "condensation edge 1 -> 0 is not topological")]
    fn backward_edges_are_rejected() {
        Condensation::new(vec![vec![0], vec![1]], [(1, 0)]);
    }

    #[test]
    #[should_panic(expected = "rule 0 belongs to two components")]
    fn overlapping_components_are_rejected() {
        Condensation::new(vec![vec![0], vec![0]], Vec::new());
    }
}
