//! Serializable summary of an analysis.

use serde::Serialize;

use crate::{
    analyser::{Analyser, ClassSet},
    dependency::DependencyStrategy,
    graph::ComponentIndex,
    property::PropertyTable,
};

/// A dependency between two rules, given by their labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    /// Label of the triggering rule
    pub source: String,
    /// Label of the triggered rule
    pub target: String,
    /// Whether every witness identifies two existential variables
    pub special: bool,
    /// The witnessing unifiers
    pub unifiers: Vec<String>,
}

/// Summary of an [Analyser]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// The dependency strategy the analysis was performed with
    pub strategy: DependencyStrategy,
    /// Rule labels, in the order of the rule set
    pub rules: Vec<String>,
    /// Edges of the graph of rule dependencies
    pub dependencies: Vec<DependencyReport>,
    /// Rule labels of each component, components in topological order
    pub components: Vec<Vec<String>>,
    /// Edges between components
    pub component_edges: Vec<(ComponentIndex, ComponentIndex)>,
    /// Property table of each rule
    pub rule_properties: Vec<PropertyTable>,
    /// Property table of each component
    pub component_properties: Vec<PropertyTable>,
    /// Property table of the whole rule set
    pub rule_set_properties: PropertyTable,
    /// Whether every component is certified for some class
    pub decidable: bool,
    /// Combination preferring forward chaining
    pub combine_fes: Option<Vec<ClassSet>>,
    /// Combination preferring backward chaining
    pub combine_fus: Option<Vec<ClassSet>>,
}

impl AnalysisReport {
    /// Summarize `analyser`.
    pub fn new(analyser: &Analyser) -> Self {
        let rules = analyser.rules();
        let label = |index| rules.label(index).to_string();

        Self {
            strategy: analyser.config().active_strategy(),
            rules: (0..rules.len()).map(label).collect(),
            dependencies: analyser
                .grd()
                .edges()
                .map(|edge| DependencyReport {
                    source: label(edge.source()),
                    target: label(edge.target()),
                    special: edge.is_special(),
                    unifiers: edge.unifiers().iter().map(ToString::to_string).collect(),
                })
                .collect(),
            components: analyser
                .condensation()
                .components()
                .iter()
                .map(|component| component.iter().map(|&rule| label(rule)).collect())
                .collect(),
            component_edges: analyser.condensation().edges().collect(),
            rule_properties: analyser.rule_properties().to_vec(),
            component_properties: analyser.component_properties().to_vec(),
            rule_set_properties: analyser.rule_set_properties().clone(),
            decidable: analyser.is_decidable(),
            combine_fes: analyser.combine_fes(),
            combine_fus: analyser.combine_fus(),
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{analyser::Analyser, io::parse_rules, rule_model::RuleSet, AnalyserConfig};

    #[test]
    fn json() {
        let input = "[A] q(X, Z) :- p(X). [B] r(X) :- q(X, Y).";
        let rules = RuleSet::new(parse_rules(input).unwrap()).unwrap();
        let config = AnalyserConfig::default().properties(["lin", "fus"]);
        let analyser = Analyser::new(rules, config).unwrap();
        let report = analyser.report();

        assert_eq!(report.rules, vec!["A", "B"]);
        assert_eq!(report.dependencies.len(), 1);
        assert_eq!(report.components, vec![vec!["A"], vec!["B"]]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "productivity");
        assert_eq!(json["dependencies"][0]["source"], "A");
        assert_eq!(json["rule_set_properties"]["lin"], "holds");
        assert_eq!(json["rule_set_properties"]["fus"], "holds");
        assert_eq!(json["combine_fus"][0][0], "FUS");
        assert_eq!(json["decidable"], true);
    }
}
