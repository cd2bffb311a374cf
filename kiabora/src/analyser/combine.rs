//! Combination of decidability classes across the components of a rule set.

use std::fmt::Display;

use serde::{Serialize, Serializer};
use strum::IntoEnumIterator;

use crate::{
    graph::{ComponentIndex, Condensation},
    property::{CombineClass, Property, PropertyTable},
};

/// Set of [CombineClass]es, stored as a bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClassSet(u8);

impl ClassSet {
    /// No class
    pub const EMPTY: ClassSet = ClassSet(0);
    /// Finite expansion set
    pub const FES: ClassSet = ClassSet(1);
    /// Finite unification set
    pub const FUS: ClassSet = ClassSet(1 << 1);
    /// Bounded treewidth set
    pub const BTS: ClassSet = ClassSet(1 << 2);

    /// Return the set containing only `class`.
    pub fn of(class: CombineClass) -> Self {
        match class {
            CombineClass::Fes => Self::FES,
            CombineClass::Fus => Self::FUS,
            CombineClass::Bts => Self::BTS,
        }
    }

    /// Return the classes certified by the holding properties of `table`.
    pub fn from_table(table: &PropertyTable) -> Self {
        table
            .iter()
            .filter(|(_, value)| value.holds())
            .filter_map(|(property, _)| Property::class(*property))
            .fold(Self::EMPTY, |set, class| set.with(class))
    }

    /// Return the underlying bit mask.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Return whether the set contains `class`.
    pub fn contains(self, class: CombineClass) -> bool {
        self.0 & Self::of(class).0 != 0
    }

    /// Return this set with `class` added.
    pub fn with(self, class: CombineClass) -> Self {
        Self(self.0 | Self::of(class).0)
    }

    /// Return whether the set contains no class.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return the classes of the set in the order FES, FUS, BTS.
    pub fn classes(self) -> impl Iterator<Item = CombineClass> {
        CombineClass::iter().filter(move |&class| self.contains(class))
    }
}

impl Display for ClassSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let names: Vec<&str> = self.classes().map(|class| class.name()).collect();
        write!(f, "{}", names.join("+"))
    }
}

impl Serialize for ClassSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.classes())
    }
}

/// Which class a combination tries first for each component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// Maximize forward chaining
    Fes,
    /// Maximize backward chaining
    Fus,
}

impl Preference {
    fn order(self) -> [CombineClass; 3] {
        match self {
            Preference::Fes => [CombineClass::Fes, CombineClass::Fus, CombineClass::Bts],
            Preference::Fus => [CombineClass::Fus, CombineClass::Fes, CombineClass::Bts],
        }
    }
}

/// Return whether `class` may be assigned to a component
/// whose ancestors have been assigned `ancestors`.
fn is_compatible(class: CombineClass, mut ancestors: impl Iterator<Item = ClassSet>) -> bool {
    match class {
        CombineClass::Fes => ancestors.all(|assigned| !assigned.is_empty()),
        CombineClass::Fus | CombineClass::Bts => ancestors.all(|assigned| {
            assigned.contains(CombineClass::Fes) || assigned.contains(CombineClass::Fus)
        }),
    }
}

/// Assign a decidability class to each component of `condensation`.
///
/// `available` lists for each component the classes it is certified for in isolation.
/// Components are visited in topological order; each one receives the first class
/// of `preference` it is certified for that is compatible with the classes of its ancestors,
/// or no class at all.
///
/// Returns `None` if the condensation is not empty but no component received a class.
pub fn combine(
    condensation: &Condensation,
    available: &[ClassSet],
    preference: Preference,
) -> Option<Vec<ClassSet>> {
    debug_assert_eq!(condensation.len(), available.len());

    let mut assignment = vec![ClassSet::EMPTY; condensation.len()];
    for component in 0..condensation.len() {
        let ancestors = condensation.ancestors(component);

        let chosen = preference.order().into_iter().find(|&class| {
            available[component].contains(class)
                && is_compatible(class, ancestors.iter().map(|&ancestor| assignment[ancestor]))
        });

        match chosen {
            Some(class) => {
                log::debug!("{preference:?} combination: C{component} is {class}");
                assignment[component] = ClassSet::of(class);
            }
            None => log::debug!("{preference:?} combination: no class for C{component}"),
        }
    }

    if !assignment.is_empty() && assignment.iter().all(|classes| classes.is_empty()) {
        return None;
    }

    Some(assignment)
}

/// Return whether `assignment` respects the compatibility of classes along `condensation`.
pub fn is_sound(condensation: &Condensation, assignment: &[ClassSet]) -> bool {
    (0..condensation.len()).all(|component: ComponentIndex| {
        assignment[component].classes().all(|class| {
            is_compatible(
                class,
                condensation
                    .ancestors(component)
                    .iter()
                    .map(|&ancestor| assignment[ancestor]),
            )
        })
    })
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::{combine, is_sound, ClassSet, Preference};
    use crate::{graph::Condensation, property::CombineClass};

    fn chain(length: usize) -> Condensation {
        Condensation::new(
            (0..length).map(|index| vec![index]).collect(),
            (1..length).map(|index| (index - 1, index)),
        )
    }

    #[test]
    fn class_sets() {
        let set = ClassSet::FES.with(CombineClass::Bts);

        assert!(set.contains(CombineClass::Fes));
        assert!(!set.contains(CombineClass::Fus));
        assert_eq!(set.bits(), 5);
        assert_eq!(set.to_string(), "FES+BTS");
        assert_eq!(ClassSet::EMPTY.to_string(), "none");
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["FES","BTS"]"#);
    }

    #[test]
    fn empty_condensation() {
        let condensation = Condensation::default();

        assert_eq!(combine(&condensation, &[], Preference::Fes), Some(vec![]));
        assert_eq!(combine(&condensation, &[], Preference::Fus), Some(vec![]));
    }

    #[test]
    fn nothing_certified() {
        let condensation = chain(1);

        assert_eq!(
            combine(&condensation, &[ClassSet::EMPTY], Preference::Fes),
            None
        );
    }

    #[test]
    fn preference_order() {
        let condensation = chain(1);
        let both = [ClassSet::FES.with(CombineClass::Fus)];

        assert_eq!(
            combine(&condensation, &both, Preference::Fes),
            Some(vec![ClassSet::FES])
        );
        assert_eq!(
            combine(&condensation, &both, Preference::Fus),
            Some(vec![ClassSet::FUS])
        );
    }

    #[test]
    fn gaps_are_reported_per_component() {
        let condensation = chain(3);
        let available = [ClassSet::FUS, ClassSet::FUS, ClassSet::EMPTY];

        assert_eq!(
            combine(&condensation, &available, Preference::Fus),
            Some(vec![ClassSet::FUS, ClassSet::FUS, ClassSet::EMPTY])
        );
    }

    #[test]
    fn gaps_block_descendants() {
        let condensation = chain(3);
        let available = [ClassSet::EMPTY, ClassSet::FES, ClassSet::FUS];

        assert_eq!(
            combine(&condensation, &available, Preference::Fes),
            None
        );
    }

    #[test]
    fn bts_needs_fes_or_fus_ancestors() {
        let condensation = chain(2);

        let after_fes = [ClassSet::FES, ClassSet::BTS];
        let assignment = combine(&condensation, &after_fes, Preference::Fes).unwrap();
        assert_eq!(assignment, vec![ClassSet::FES, ClassSet::BTS]);
        assert!(is_sound(&condensation, &assignment));

        let after_bts = [ClassSet::BTS, ClassSet::BTS];
        let assignment = combine(&condensation, &after_bts, Preference::Fes).unwrap();
        assert_eq!(assignment, vec![ClassSet::BTS, ClassSet::EMPTY]);

        // FES only needs its ancestors to be covered
        let fes_after_bts = [ClassSet::BTS, ClassSet::FES];
        let assignment = combine(&condensation, &fes_after_bts, Preference::Fes).unwrap();
        assert_eq!(assignment, vec![ClassSet::BTS, ClassSet::FES]);
    }

    #[test]
    fn unsound_assignments_are_detected() {
        let condensation = chain(2);

        assert!(!is_sound(&condensation, &[ClassSet::BTS, ClassSet::FUS]));
        assert!(is_sound(&condensation, &[ClassSet::FUS, ClassSet::FUS]));
    }
}
