//! The analysis of a rule set.

pub mod combine;
pub mod report;

use serde::Serialize;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::{
    dependency::DependencyStrategy,
    graph::{Condensation, Grd, PositionGraph},
    property::{Property, PropertyEvaluator, PropertyHierarchy, PropertyTable, Scope},
    rule_model::RuleSet,
};

pub use combine::{ClassSet, Preference};
pub use report::AnalysisReport;

/// Label selecting every known property
pub const ALL_PROPERTIES: &str = "*";

/// Errors while setting up an analysis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A requested property is not known
    #[error("unknown property \"{0}\"")]
    UnknownProperty(String),
}

/// Settings of an [Analyser]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnalyserConfig {
    strategy: DependencyStrategy,
    with_unifiers: bool,
    properties: Option<Vec<String>>,
}

impl AnalyserConfig {
    /// Set the strategy used to decide dependencies between rules.
    pub fn strategy(mut self, strategy: DependencyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set whether every unifier of each dependency is collected,
    /// instead of the first one found.
    pub fn with_unifiers(mut self, with_unifiers: bool) -> Self {
        self.with_unifiers = with_unifiers;
        self
    }

    /// Select the properties to evaluate by their labels.
    ///
    /// The label [ALL_PROPERTIES] selects every known property.
    /// Without a selection, every property is evaluated.
    pub fn properties<Label: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = Label>,
    ) -> Self {
        self.properties = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Return the active dependency strategy.
    pub fn active_strategy(&self) -> DependencyStrategy {
        self.strategy
    }

    /// Return whether every unifier of each dependency is collected.
    pub fn collects_unifiers(&self) -> bool {
        self.with_unifiers
    }

    /// Build the hierarchy of the selected properties.
    pub fn hierarchy(&self) -> Result<PropertyHierarchy, AnalysisError> {
        let Some(labels) = &self.properties else {
            return Ok(PropertyHierarchy::standard().clone());
        };

        let mut selected = Vec::new();
        for label in labels {
            if label == ALL_PROPERTIES {
                selected.extend(Property::iter());
                continue;
            }

            match Property::from_label(label) {
                Some(property) => selected.push(property),
                None => return Err(AnalysisError::UnknownProperty(label.clone())),
            }
        }

        Ok(PropertyHierarchy::new(selected))
    }
}

/// Analysis of a rule set
///
/// Holds the graph of rule dependencies, its strongly connected components and
/// the property tables of every rule, every component and the whole rule set.
/// All of them are computed on construction.
#[derive(Debug, Clone)]
pub struct Analyser {
    config: AnalyserConfig,
    rules: RuleSet,
    hierarchy: PropertyHierarchy,
    grd: Grd,
    condensation: Condensation,
    rule_properties: Vec<PropertyTable>,
    component_properties: Vec<PropertyTable>,
    rule_set_properties: PropertyTable,
}

impl Analyser {
    /// Analyse `rules` with the given settings.
    pub fn new(rules: RuleSet, config: AnalyserConfig) -> Result<Self, AnalysisError> {
        let hierarchy = config.hierarchy()?;
        Ok(Self::build(rules, config, hierarchy))
    }

    fn build(rules: RuleSet, config: AnalyserConfig, hierarchy: PropertyHierarchy) -> Self {
        log::info!(
            "analysing {} rules with {} properties",
            rules.len(),
            hierarchy.len()
        );

        let grd = Grd::new(&rules, config.strategy.checker(), config.with_unifiers);
        let condensation = Condensation::from_grd(&grd);
        debug_assert!(condensation.is_acyclic(), "condensation must be acyclic");

        let evaluator = PropertyEvaluator::new(&hierarchy, &rules, &grd, &condensation);
        let rule_properties = evaluator.evaluate_rules();
        let component_properties = (0..condensation.len())
            .map(|component| evaluator.evaluate(Scope::Component(component), &rule_properties))
            .collect();
        let rule_set_properties = evaluator.evaluate(Scope::RuleSet, &rule_properties);

        Self {
            config,
            rules,
            hierarchy,
            grd,
            condensation,
            rule_properties,
            component_properties,
            rule_set_properties,
        }
    }

    /// Analyse the same rules again with a different dependency strategy.
    pub fn with_strategy(self, strategy: DependencyStrategy) -> Self {
        let config = self.config.strategy(strategy);
        Self::build(self.rules, config, self.hierarchy)
    }

    /// Return the settings of this analysis.
    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Return the analysed rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Return the hierarchy of the evaluated properties.
    pub fn hierarchy(&self) -> &PropertyHierarchy {
        &self.hierarchy
    }

    /// Return the graph of rule dependencies.
    pub fn grd(&self) -> &Grd {
        &self.grd
    }

    /// Return the strongly connected components of the graph of rule dependencies.
    pub fn condensation(&self) -> &Condensation {
        &self.condensation
    }

    /// Build the position graph of the analysed rules.
    pub fn position_graph(&self) -> PositionGraph<'_> {
        PositionGraph::new(&self.rules)
    }

    /// Return the property table of each rule.
    pub fn rule_properties(&self) -> &[PropertyTable] {
        &self.rule_properties
    }

    /// Return the property table of each component.
    pub fn component_properties(&self) -> &[PropertyTable] {
        &self.component_properties
    }

    /// Return the property table of the whole rule set.
    pub fn rule_set_properties(&self) -> &PropertyTable {
        &self.rule_set_properties
    }

    /// Return the classes each component is certified for in isolation.
    pub fn component_classes(&self) -> Vec<ClassSet> {
        self.component_properties
            .iter()
            .map(ClassSet::from_table)
            .collect()
    }

    /// Return whether every component is certified for some decidability class.
    ///
    /// This does not take the combination of classes across components into account,
    /// see [Analyser::combine_fes] and [Analyser::combine_fus].
    pub fn is_decidable(&self) -> bool {
        self.component_classes()
            .into_iter()
            .all(|classes| !classes.is_empty())
    }

    /// Combine the classes of the components, preferring forward chaining.
    ///
    /// Returns `None` if no component could be assigned a class.
    pub fn combine_fes(&self) -> Option<Vec<ClassSet>> {
        combine::combine(&self.condensation, &self.component_classes(), Preference::Fes)
    }

    /// Combine the classes of the components, preferring backward chaining.
    ///
    /// Returns `None` if no component could be assigned a class.
    pub fn combine_fus(&self) -> Option<Vec<ClassSet>> {
        combine::combine(&self.condensation, &self.component_classes(), Preference::Fus)
    }

    /// Summarize the analysis.
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport::new(self)
    }
}
