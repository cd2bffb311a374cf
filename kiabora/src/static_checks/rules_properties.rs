//! Functionality that provides the static checks for a set of rules.

use crate::{
    graph::PositionGraph,
    rule_model::Rule,
    static_checks::{
        acyclicity_graphs::JointAcyclicityGraph,
        positions::{affected_positions, attacked_positions, positions_of, sticky_marking},
        rule_properties::RuleProperties,
    },
};

/// This trait gives some static checks for a set of rules.
pub trait RulesProperties {
    /// Determine whether every rule is joinless.
    fn is_joinless(&self) -> bool;
    /// Determine whether every rule is linear.
    fn is_linear(&self) -> bool;
    /// Determine whether every rule is guarded.
    fn is_guarded(&self) -> bool;
    /// Determine whether no marked variable occurs twice in a body.
    fn is_sticky(&self) -> bool;
    /// Determine whether every rule is domain restricted.
    fn is_domain_restricted(&self) -> bool;
    /// Determine whether every rule has at most one frontier variable.
    fn is_frontier_one(&self) -> bool;
    /// Determine whether no rule has existential variables.
    fn is_datalog(&self) -> bool;
    /// Determine whether every rule is disconnected.
    fn is_disconnected(&self) -> bool;
    /// Determine whether every rule is frontier guarded.
    fn is_frontier_guarded(&self) -> bool;
    /// Determine whether every rule guards its affected body variables.
    fn is_weakly_guarded(&self) -> bool;
    /// Determine whether every rule guards its affected frontier variables.
    fn is_weakly_frontier_guarded(&self) -> bool;
    /// Determine whether every rule guards its attacked body variables.
    fn is_jointly_guarded(&self) -> bool;
    /// Determine whether every rule guards its attacked frontier variables.
    fn is_jointly_frontier_guarded(&self) -> bool;
    /// Determine whether no cycle of the position graph contains a special edge.
    fn is_weakly_acyclic(&self) -> bool;
    /// Determine whether the JointAcyclicityGraph has no cycle.
    fn is_jointly_acyclic(&self) -> bool;
    /// Determine whether every marked join variable occurs at some position of finite rank.
    fn is_weakly_sticky(&self) -> bool;
}

impl<'a> RulesProperties for [&'a Rule] {
    fn is_joinless(&self) -> bool {
        self.iter().all(|rule| rule.is_joinless())
    }

    fn is_linear(&self) -> bool {
        self.iter().all(|rule| rule.is_linear())
    }

    fn is_guarded(&self) -> bool {
        self.iter().all(|rule| rule.is_guarded())
    }

    fn is_sticky(&self) -> bool {
        sticky_marking(self)
            .into_iter()
            .all(|marked| self[marked.rule].body_occurrences(marked.variable) <= 1)
    }

    fn is_domain_restricted(&self) -> bool {
        self.iter().all(|rule| rule.is_domain_restricted())
    }

    fn is_frontier_one(&self) -> bool {
        self.iter().all(|rule| rule.is_frontier_one())
    }

    fn is_datalog(&self) -> bool {
        self.iter().all(|rule| rule.is_datalog())
    }

    fn is_disconnected(&self) -> bool {
        self.iter().all(|rule| rule.is_disconnected())
    }

    fn is_frontier_guarded(&self) -> bool {
        self.iter().all(|rule| rule.is_frontier_guarded())
    }

    fn is_weakly_guarded(&self) -> bool {
        let affected = affected_positions(self);
        self.iter().all(|rule| rule.is_weakly_guarded(&affected))
    }

    fn is_weakly_frontier_guarded(&self) -> bool {
        let affected = affected_positions(self);
        self.iter()
            .all(|rule| rule.is_weakly_frontier_guarded(&affected))
    }

    fn is_jointly_guarded(&self) -> bool {
        let attacked = attacked_positions(self);
        self.iter().all(|rule| rule.is_jointly_guarded(&attacked))
    }

    fn is_jointly_frontier_guarded(&self) -> bool {
        let attacked = attacked_positions(self);
        self.iter()
            .all(|rule| rule.is_jointly_frontier_guarded(&attacked))
    }

    fn is_weakly_acyclic(&self) -> bool {
        PositionGraph::new(self.iter().copied()).is_weakly_acyclic()
    }

    fn is_jointly_acyclic(&self) -> bool {
        !JointAcyclicityGraph::new(self).is_cyclic()
    }

    fn is_weakly_sticky(&self) -> bool {
        let infinite_rank = PositionGraph::new(self.iter().copied()).infinite_rank_positions();

        sticky_marking(self)
            .into_iter()
            .filter(|marked| self[marked.rule].body_occurrences(marked.variable) > 1)
            .all(|marked| {
                !positions_of(self[marked.rule].body(), marked.variable).is_subset(&infinite_rank)
            })
    }
}
