//! The implication order over [Property]s.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::OnceLock,
};

use petgraph::{algo::toposort, graphmap::DiGraphMap, visit::Dfs};
use strum::IntoEnumIterator;

use crate::property::Property;

/// Implication order over a selection of properties
///
/// `P` implies `Q` in the hierarchy if `Q` can be reached from `P` through
/// the fixed implications of [Property::implies], possibly through properties
/// that are not part of the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHierarchy {
    /// Selected properties, every property before the ones it implies
    order: Vec<Property>,
    /// For each selected property, the selected properties it implies
    implies: BTreeMap<Property, BTreeSet<Property>>,
    /// For each selected property, the selected properties implying it
    implied_by: BTreeMap<Property, BTreeSet<Property>>,
}

fn implication_graph() -> DiGraphMap<Property, ()> {
    let mut graph = DiGraphMap::new();

    for property in Property::iter() {
        graph.add_node(property);
        for &weaker in property.implies() {
            graph.add_edge(property, weaker, ());
        }
    }

    graph
}

impl PropertyHierarchy {
    /// Return the hierarchy over all known properties.
    pub fn standard() -> &'static PropertyHierarchy {
        static STANDARD: OnceLock<PropertyHierarchy> = OnceLock::new();
        STANDARD.get_or_init(|| PropertyHierarchy::new(Property::iter()))
    }

    /// Create the hierarchy restricted to the given properties.
    pub fn new(properties: impl IntoIterator<Item = Property>) -> Self {
        let selected: BTreeSet<Property> = properties.into_iter().collect();
        let graph = implication_graph();

        let order: Vec<Property> = toposort(&graph, None)
            .expect("the implications between properties are acyclic")
            .into_iter()
            .filter(|property| selected.contains(property))
            .collect();

        let mut implies = BTreeMap::new();
        let mut implied_by: BTreeMap<Property, BTreeSet<Property>> = selected
            .iter()
            .map(|&property| (property, BTreeSet::new()))
            .collect();

        for &property in &selected {
            let mut weaker = BTreeSet::new();

            let mut dfs = Dfs::new(&graph, property);
            while let Some(reachable) = dfs.next(&graph) {
                if reachable != property && selected.contains(&reachable) {
                    weaker.insert(reachable);
                    implied_by
                        .entry(reachable)
                        .or_default()
                        .insert(property);
                }
            }

            implies.insert(property, weaker);
        }

        log::trace!("property evaluation order: {order:?}");

        Self {
            order,
            implies,
            implied_by,
        }
    }

    /// Return the selected properties such that
    /// every property comes before the properties it implies.
    pub fn properties(&self) -> &[Property] {
        &self.order
    }

    /// Return the number of selected properties.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Return whether no property is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Return whether `property` is selected.
    pub fn contains(&self, property: Property) -> bool {
        self.implies.contains_key(&property)
    }

    /// Return the selected properties implied by `property`.
    pub fn implied(&self, property: Property) -> impl Iterator<Item = Property> + '_ {
        self.implies
            .get(&property)
            .into_iter()
            .flat_map(|weaker| weaker.iter().copied())
    }

    /// Return the selected properties implying `property`.
    pub fn implying(&self, property: Property) -> impl Iterator<Item = Property> + '_ {
        self.implied_by
            .get(&property)
            .into_iter()
            .flat_map(|stronger| stronger.iter().copied())
    }

    /// Return whether `stronger` implies `weaker` in this hierarchy.
    pub fn implies(&self, stronger: Property, weaker: Property) -> bool {
        self.implies
            .get(&stronger)
            .is_some_and(|implied| implied.contains(&weaker))
    }
}

impl Default for PropertyHierarchy {
    fn default() -> Self {
        Self::standard().clone()
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;
    use test_log::test;

    use super::PropertyHierarchy;
    use crate::property::Property;

    #[test]
    fn standard_contains_everything() {
        let hierarchy = PropertyHierarchy::standard();

        assert_eq!(hierarchy.len(), Property::iter().count());
        assert!(hierarchy.implies(Property::Linear, Property::Guarded));
        assert!(hierarchy.implies(Property::Linear, Property::BoundedTreewidthSet));
        assert!(hierarchy.implies(Property::RangeRestricted, Property::FiniteExpansionSet));
        assert!(!hierarchy.implies(Property::Guarded, Property::Linear));
        assert!(!hierarchy.implies(Property::Sticky, Property::Sticky));
    }

    #[test]
    fn stronger_properties_come_first() {
        let hierarchy = PropertyHierarchy::standard();
        let position = |property| {
            hierarchy
                .properties()
                .iter()
                .position(|&candidate| candidate == property)
                .unwrap()
        };

        for &stronger in hierarchy.properties() {
            for weaker in hierarchy.implied(stronger) {
                assert!(position(stronger) < position(weaker));
            }
        }
    }

    #[test]
    fn restriction_keeps_transitive_implications() {
        let hierarchy = PropertyHierarchy::new([Property::Linear, Property::JointlyGuarded]);

        assert_eq!(hierarchy.len(), 2);
        assert!(hierarchy.contains(Property::Linear));
        assert!(!hierarchy.contains(Property::Guarded));
        // lin -> g -> wg -> jg
        assert!(hierarchy.implies(Property::Linear, Property::JointlyGuarded));
        assert_eq!(
            hierarchy.implying(Property::JointlyGuarded).collect::<Vec<_>>(),
            vec![Property::Linear]
        );
        assert_eq!(
            hierarchy.properties(),
            &[Property::Linear, Property::JointlyGuarded]
        );
    }
}
