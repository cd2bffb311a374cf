//! Named sufficient conditions for the decidability of reasoning over rules.
//!
//! Every [Property] carries a fixed set of implications to weaker properties
//! and optionally a [CombineClass] it certifies.
//! Their implication order is captured by the [PropertyHierarchy].

pub mod evaluator;
pub mod hierarchy;

use std::fmt::Display;

use enum_assoc::Assoc;
use serde::Serialize;
use strum_macros::EnumIter;

pub use evaluator::{PropertyEvaluator, PropertyTable, Scope};
pub use hierarchy::PropertyHierarchy;

/// Outcome of checking a [Property] at some scope
#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[func(pub fn symbol(&self) -> &'static str)]
#[serde(rename_all = "snake_case")]
pub enum Satisfaction {
    /// The property holds
    #[assoc(symbol = "X")]
    Holds,
    /// The property does not hold
    #[assoc(symbol = "-")]
    Fails,
    /// Neither could be established
    #[assoc(symbol = "?")]
    Unknown,
}

impl Satisfaction {
    /// Turn the result of a complete check into a [Satisfaction].
    pub fn from_bool(holds: bool) -> Self {
        if holds {
            Self::Holds
        } else {
            Self::Fails
        }
    }

    /// Return whether this is [Satisfaction::Holds].
    pub fn holds(self) -> bool {
        self == Self::Holds
    }

    /// Combine the results over the parts of a scope:
    /// holds if every part holds, fails if any part fails, unknown otherwise.
    pub fn all(values: impl IntoIterator<Item = Satisfaction>) -> Self {
        let mut result = Self::Holds;

        for value in values {
            match value {
                Self::Fails => return Self::Fails,
                Self::Unknown => result = Self::Unknown,
                Self::Holds => {}
            }
        }

        result
    }
}

impl Display for Satisfaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Decidability class certified by a property
#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize)]
#[func(pub fn name(&self) -> &'static str)]
#[serde(rename_all = "UPPERCASE")]
pub enum CombineClass {
    /// Finite expansion set, forward chaining terminates
    #[assoc(name = "FES")]
    Fes,
    /// Finite unification set, backward chaining terminates
    #[assoc(name = "FUS")]
    Fus,
    /// Bounded treewidth set
    #[assoc(name = "BTS")]
    Bts,
}

impl Display for CombineClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sufficient condition for decidability
///
/// Variants are ordered by their label.
#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize)]
#[func(pub fn label(&self) -> &'static str)]
#[func(pub fn from_label(label: &str) -> Option<Self>)]
#[func(pub fn full_name(&self) -> &'static str)]
#[func(pub fn description(&self) -> &'static str)]
#[func(pub fn implies(&self) -> &'static [Property])]
pub enum Property {
    /// Acyclic graph of rule dependencies
    #[assoc(label = "agrd")]
    #[assoc(from_label = "agrd")]
    #[assoc(full_name = "Acyclic graph of rule dependencies")]
    #[assoc(description = "The graph of rule dependencies has no cycle.")]
    #[assoc(implies = &[Property::FiniteExpansionSet, Property::FiniteUnificationSet])]
    #[serde(rename = "agrd")]
    AcyclicGrd,
    /// Bounded treewidth set
    #[assoc(label = "bts")]
    #[assoc(from_label = "bts")]
    #[assoc(full_name = "Bounded treewidth set")]
    #[assoc(description = "Every chase sequence has bounded treewidth.")]
    #[assoc(implies = &[])]
    #[serde(rename = "bts")]
    BoundedTreewidthSet,
    /// Disconnected
    #[assoc(label = "disc")]
    #[assoc(from_label = "disc")]
    #[assoc(full_name = "Disconnected")]
    #[assoc(description = "No variable is shared between the body and the head.")]
    #[assoc(implies = &[
        Property::FrontierOne,
        Property::FiniteExpansionSet,
        Property::FiniteUnificationSet,
    ])]
    #[serde(rename = "disc")]
    Disconnected,
    /// Domain restricted
    #[assoc(label = "dr")]
    #[assoc(from_label = "dr")]
    #[assoc(full_name = "Domain restricted")]
    #[assoc(
        description = "Every head atom contains either no body variable or all of them."
    )]
    #[assoc(implies = &[Property::FiniteUnificationSet])]
    #[serde(rename = "dr")]
    DomainRestricted,
    /// Finite expansion set
    #[assoc(label = "fes")]
    #[assoc(from_label = "fes")]
    #[assoc(full_name = "Finite expansion set")]
    #[assoc(description = "Every fact base has a finite universal model.")]
    #[assoc(implies = &[])]
    #[serde(rename = "fes")]
    FiniteExpansionSet,
    /// Frontier guarded
    #[assoc(label = "fg")]
    #[assoc(from_label = "fg")]
    #[assoc(full_name = "Frontier guarded")]
    #[assoc(description = "Some body atom contains every frontier variable.")]
    #[assoc(implies = &[Property::WeaklyFrontierGuarded])]
    #[serde(rename = "fg")]
    FrontierGuarded,
    /// Frontier one
    #[assoc(label = "fr1")]
    #[assoc(from_label = "fr1")]
    #[assoc(full_name = "Frontier one")]
    #[assoc(description = "There is at most one frontier variable.")]
    #[assoc(implies = &[Property::FrontierGuarded])]
    #[serde(rename = "fr1")]
    FrontierOne,
    /// Finite unification set
    #[assoc(label = "fus")]
    #[assoc(from_label = "fus")]
    #[assoc(full_name = "Finite unification set")]
    #[assoc(description = "Every conjunctive query has a finite rewriting.")]
    #[assoc(implies = &[])]
    #[serde(rename = "fus")]
    FiniteUnificationSet,
    /// Guarded
    #[assoc(label = "g")]
    #[assoc(from_label = "g")]
    #[assoc(full_name = "Guarded")]
    #[assoc(description = "Some body atom contains every body variable.")]
    #[assoc(implies = &[Property::FrontierGuarded, Property::WeaklyGuarded])]
    #[serde(rename = "g")]
    Guarded,
    /// Jointly acyclic
    #[assoc(label = "ja")]
    #[assoc(from_label = "ja")]
    #[assoc(full_name = "Jointly acyclic")]
    #[assoc(
        description = "No existential variable transitively triggers its own rule."
    )]
    #[assoc(implies = &[Property::FiniteExpansionSet])]
    #[serde(rename = "ja")]
    JointlyAcyclic,
    /// Jointly frontier guarded
    #[assoc(label = "jfg")]
    #[assoc(from_label = "jfg")]
    #[assoc(full_name = "Jointly frontier guarded")]
    #[assoc(description = "Some body atom contains every attacked frontier variable.")]
    #[assoc(implies = &[Property::BoundedTreewidthSet])]
    #[serde(rename = "jfg")]
    JointlyFrontierGuarded,
    /// Jointly guarded
    #[assoc(label = "jg")]
    #[assoc(from_label = "jg")]
    #[assoc(full_name = "Jointly guarded")]
    #[assoc(description = "Some body atom contains every attacked body variable.")]
    #[assoc(implies = &[Property::JointlyFrontierGuarded])]
    #[serde(rename = "jg")]
    JointlyGuarded,
    /// Joinless
    #[assoc(label = "jl")]
    #[assoc(from_label = "jl")]
    #[assoc(full_name = "Joinless")]
    #[assoc(description = "No variable occurs twice in the body.")]
    #[assoc(implies = &[Property::Sticky])]
    #[serde(rename = "jl")]
    Joinless,
    /// Linear
    #[assoc(label = "lin")]
    #[assoc(from_label = "lin")]
    #[assoc(full_name = "Linear")]
    #[assoc(description = "The body has at most one atom.")]
    #[assoc(implies = &[Property::Guarded, Property::FiniteUnificationSet])]
    #[serde(rename = "lin")]
    Linear,
    /// Range restricted
    #[assoc(label = "rr")]
    #[assoc(from_label = "rr")]
    #[assoc(full_name = "Range restricted")]
    #[assoc(description = "There are no existential variables.")]
    #[assoc(implies = &[Property::WeaklyAcyclic])]
    #[serde(rename = "rr")]
    RangeRestricted,
    /// Sticky
    #[assoc(label = "s")]
    #[assoc(from_label = "s")]
    #[assoc(full_name = "Sticky")]
    #[assoc(description = "No marked variable occurs twice in a body.")]
    #[assoc(implies = &[Property::WeaklySticky, Property::FiniteUnificationSet])]
    #[serde(rename = "s")]
    Sticky,
    /// Weakly acyclic
    #[assoc(label = "wa")]
    #[assoc(from_label = "wa")]
    #[assoc(full_name = "Weakly acyclic")]
    #[assoc(
        description = "No cycle of the position graph goes through a special edge."
    )]
    #[assoc(implies = &[Property::JointlyAcyclic, Property::WeaklySticky])]
    #[serde(rename = "wa")]
    WeaklyAcyclic,
    /// Weakly frontier guarded
    #[assoc(label = "wfg")]
    #[assoc(from_label = "wfg")]
    #[assoc(full_name = "Weakly frontier guarded")]
    #[assoc(description = "Some body atom contains every affected frontier variable.")]
    #[assoc(implies = &[Property::JointlyFrontierGuarded])]
    #[serde(rename = "wfg")]
    WeaklyFrontierGuarded,
    /// Weakly guarded
    #[assoc(label = "wg")]
    #[assoc(from_label = "wg")]
    #[assoc(full_name = "Weakly guarded")]
    #[assoc(description = "Some body atom contains every affected body variable.")]
    #[assoc(implies = &[Property::WeaklyFrontierGuarded, Property::JointlyGuarded])]
    #[serde(rename = "wg")]
    WeaklyGuarded,
    /// Weakly sticky
    #[assoc(label = "ws")]
    #[assoc(from_label = "ws")]
    #[assoc(full_name = "Weakly sticky")]
    #[assoc(
        description = "Every marked join variable occurs at a position of finite rank."
    )]
    #[assoc(implies = &[])]
    #[serde(rename = "ws")]
    WeaklySticky,
}

impl Property {
    /// Return the decidability class certified by this property, if any.
    pub fn class(self) -> Option<CombineClass> {
        match self {
            Property::FiniteExpansionSet => Some(CombineClass::Fes),
            Property::FiniteUnificationSet => Some(CombineClass::Fus),
            Property::BoundedTreewidthSet => Some(CombineClass::Bts),
            _ => None,
        }
    }

    /// Return whether this property is a condition on single rules.
    ///
    /// Such properties hold for a set of rules if they hold for each of its rules.
    pub fn is_rule_local(self) -> bool {
        matches!(
            self,
            Property::Linear
                | Property::Guarded
                | Property::FrontierGuarded
                | Property::FrontierOne
                | Property::Disconnected
                | Property::RangeRestricted
                | Property::DomainRestricted
                | Property::Joinless
        )
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;
    use test_log::test;

    use super::{CombineClass, Property, Satisfaction};

    #[test]
    fn labels() {
        for property in Property::iter() {
            assert_eq!(Property::from_label(property.label()), Some(property));
        }

        assert_eq!(Property::from_label("lin"), Some(Property::Linear));
        assert_eq!(Property::from_label("linear"), None);
        assert_eq!(Property::Linear.to_string(), "lin");
    }

    #[test]
    fn ordered_by_label() {
        let labels: Vec<&str> = Property::iter().map(|property| property.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();

        assert_eq!(labels, sorted);
    }

    #[test]
    fn classes() {
        let tagged: Vec<CombineClass> = Property::iter().filter_map(Property::class).collect();
        assert_eq!(
            tagged,
            vec![CombineClass::Bts, CombineClass::Fes, CombineClass::Fus]
        );
    }

    #[test]
    fn aggregation() {
        use Satisfaction::*;

        assert_eq!(Satisfaction::all([]), Holds);
        assert_eq!(Satisfaction::all([Holds, Holds]), Holds);
        assert_eq!(Satisfaction::all([Holds, Unknown]), Unknown);
        assert_eq!(Satisfaction::all([Unknown, Fails]), Fails);
        assert_eq!(Fails.to_string(), "-");
    }
}
