//! Textual rendering of an analysis.

use kiabora::{
    analyser::ClassSet,
    graph::PositionGraphEdgeType,
    property::{Property, PropertyTable},
    Analyser,
};
use strum::IntoEnumIterator;

/// Width of a cell in the property tables
const CELL_SIZE: usize = 6;

fn center(text: &str) -> String {
    format!("{text:^width$}", width = CELL_SIZE)
}

/// Print every rule in DLGP, one per line.
pub(crate) fn rule_set(analyser: &Analyser) -> String {
    analyser
        .rules()
        .iter()
        .map(|rule| format!("{rule}\n"))
        .collect()
}

/// Print one line per dependency, followed by its unifiers if they were collected.
pub(crate) fn grd(analyser: &Analyser) -> String {
    let rules = analyser.rules();
    let mut out = String::new();

    for edge in analyser.grd().edges() {
        let arrow = if edge.is_special() { "~>" } else { "->" };
        out.push_str(&format!(
            "{} {arrow} {}\n",
            rules.label(edge.source()),
            rules.label(edge.target())
        ));

        if analyser.config().collects_unifiers() {
            for unifier in edge.unifiers() {
                out.push_str(&format!("\t{unifier}\n"));
            }
        }
    }

    out
}

pub(crate) fn scc(analyser: &Analyser) -> String {
    let rules = analyser.rules();
    let mut out = String::new();

    for (index, component) in analyser.condensation().components().iter().enumerate() {
        let labels: Vec<&str> = component.iter().map(|&rule| rules.label(rule)).collect();
        out.push_str(&format!("C{index} = {{{}}}\n", labels.join(", ")));
    }

    out
}

pub(crate) fn scc_graph(analyser: &Analyser) -> String {
    let condensation = analyser.condensation();
    let mut out = String::new();

    for component in 0..condensation.len() {
        out.push_str(&format!("C{component}"));

        let successors: Vec<String> = condensation
            .successors(component)
            .iter()
            .map(|successor| format!("C{successor}"))
            .collect();
        if !successors.is_empty() {
            out.push_str(&format!(" ---> {}", successors.join(", ")));
        }

        out.push('\n');
    }

    out
}

pub(crate) fn position_graph(analyser: &Analyser) -> String {
    let mut out = String::new();

    for (from, to, edge) in analyser.position_graph().edges() {
        let arrow = match edge {
            PositionGraphEdgeType::Common => "->",
            PositionGraphEdgeType::Special => "~>",
        };
        out.push_str(&format!("{from} {arrow} {to}\n"));
    }

    out
}

/// Print a table with one row per entry of `rows`, followed by a header of property labels.
///
/// The columns are taken from the first table.
fn table<'a>(rows: impl IntoIterator<Item = (Option<String>, &'a PropertyTable)>) -> String {
    let rows: Vec<(Option<String>, &PropertyTable)> = rows.into_iter().collect();
    let Some(columns) = rows.first().map(|(_, table)| table.keys().collect::<Vec<_>>()) else {
        return String::new();
    };
    if columns.is_empty() {
        return String::new();
    }

    let border = format!("+{}+\n", "-".repeat((CELL_SIZE + 1) * columns.len() - 1));
    let mut out = border.clone();

    for (label, table) in rows {
        for property in &columns {
            out.push('|');
            out.push_str(&center(table[property].symbol()));
        }
        out.push('|');
        if let Some(label) = label {
            out.push_str(&center(&label));
        }
        out.push('\n');
    }

    out.push_str(&border);
    for property in &columns {
        out.push('|');
        out.push_str(&center(property.label()));
    }
    out.push_str("|\n");
    out.push_str(&border);

    out
}

pub(crate) fn rule_properties(analyser: &Analyser) -> String {
    let rules = analyser.rules();

    table(
        analyser
            .rule_properties()
            .iter()
            .enumerate()
            .map(|(index, table)| (Some(rules.label(index).to_string()), table)),
    )
}

pub(crate) fn scc_properties(analyser: &Analyser) -> String {
    table(
        analyser
            .component_properties()
            .iter()
            .enumerate()
            .map(|(index, table)| (Some(format!("C{index}")), table)),
    )
}

pub(crate) fn rule_set_properties(analyser: &Analyser) -> String {
    table([(None, analyser.rule_set_properties())])
}

pub(crate) fn verdict(analyser: &Analyser) -> String {
    if analyser.is_decidable() {
        "===== ANALYSIS: DECIDABLE =====\n".to_string()
    } else {
        "===== ANALYSIS: no proof of decidability found =====\n".to_string()
    }
}

/// Print the class assigned to each component, or `None!` if no combination was found.
pub(crate) fn combination(assignment: Option<&[ClassSet]>) -> String {
    let Some(assignment) = assignment else {
        return "None!\n".to_string();
    };

    let mut out = String::new();
    for (component, classes) in assignment.iter().enumerate() {
        out.push_str(&format!("C{component}: "));
        if let Some(class) = classes.classes().next() {
            out.push_str(class.name());
        }
        out.push('\n');
    }

    out
}

pub(crate) fn property_list() -> String {
    Property::iter()
        .map(|property| {
            format!(
                "{}: \t{} - {}\n",
                property.label(),
                property.full_name(),
                property.description()
            )
        })
        .collect()
}

#[cfg(test)]
mod test {
    use test_log::test;

    use kiabora::{
        analyser::ClassSet, io::parse_rules, rule_model::RuleSet, Analyser, AnalyserConfig,
    };

    fn analyse(input: &str, config: AnalyserConfig) -> Analyser {
        let rules = RuleSet::new(parse_rules(input).unwrap()).unwrap();
        Analyser::new(rules, config).unwrap()
    }

    #[test]
    fn graphs() {
        let analyser = analyse(
            "[A] q(X, Z) :- p(X). [B] r(X) :- q(X, Y).",
            AnalyserConfig::default(),
        );

        assert_eq!(super::grd(&analyser), "A -> B\n");
        assert_eq!(super::scc(&analyser), "C0 = {A}\nC1 = {B}\n");
        assert_eq!(super::scc_graph(&analyser), "C0 ---> C1\nC1\n");
        assert_eq!(
            super::position_graph(&analyser),
            "p[0] -> q[0]\np[0] ~> q[1]\nq[0] -> r[0]\n"
        );
        assert_eq!(
            super::rule_set(&analyser),
            "[A] q(X, Z) :- p(X).\n[B] r(X) :- q(X, Y).\n"
        );
    }

    #[test]
    fn tables() {
        let analyser = analyse(
            "q(X) :- p(X).",
            AnalyserConfig::default().properties(["lin", "fus"]),
        );

        assert_eq!(
            super::rule_properties(&analyser),
            "+-------------+\n\
             |  X   |  X   |  R0  \n\
             +-------------+\n\
             | fus  | lin  |\n\
             +-------------+\n"
        );
        assert_eq!(
            super::rule_set_properties(&analyser),
            "+-------------+\n\
             |  X   |  X   |\n\
             +-------------+\n\
             | fus  | lin  |\n\
             +-------------+\n"
        );
        assert!(super::scc_properties(&analyser).contains("|  C0  \n"));
    }

    #[test]
    fn empty_tables() {
        let analyser = analyse("", AnalyserConfig::default());

        assert_eq!(super::rule_properties(&analyser), "");
        assert_eq!(super::scc_properties(&analyser), "");
        assert_eq!(super::verdict(&analyser), "===== ANALYSIS: DECIDABLE =====\n");
    }

    #[test]
    fn combinations() {
        assert_eq!(super::combination(None), "None!\n");
        assert_eq!(
            super::combination(Some(&[ClassSet::FUS, ClassSet::EMPTY])),
            "C0: FUS\nC1: \n"
        );
    }

    #[test]
    fn property_list() {
        let list = super::property_list();

        assert_eq!(list.lines().count(), 20);
        assert!(list.starts_with("agrd: \tAcyclic graph of rule dependencies - "));
    }
}
