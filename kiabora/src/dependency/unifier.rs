//! Single-piece unifiers between the head of one rule and the body of another.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use crate::rule_model::{Atom, Predicate, Rule, Term, Variable};

/// The rule a variable belongs to, used to rename the two rules of a unifier apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// The rule whose head is unified
    Source,
    /// The rule whose body is unified
    Target,
}

/// A term of a unifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// A variable of one of the two rules
    Variable(Side, Variable),
    /// A constant
    Constant(String),
}

impl Node {
    fn from_term(term: &Term, side: Side) -> Self {
        match term {
            Term::Variable(variable) => Node::Variable(side, variable.clone()),
            Term::Constant(constant) => Node::Constant(constant.clone()),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Variable(Side::Source, variable) => write!(f, "{variable}"),
            Node::Variable(Side::Target, variable) => write!(f, "{variable}'"),
            Node::Constant(constant) => f.write_str(constant),
        }
    }
}

/// An atom after a unifier has been applied to it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageAtom {
    predicate: Predicate,
    terms: Vec<Node>,
}

/// A piece-unifier of the head of a source rule with the body of a target rule
///
/// The unifier is given by a partition of the terms of both rules,
/// where each class is mapped to a single term.
/// The piece is the set of target body atoms that are unified with head atoms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceUnifier {
    piece: Vec<usize>,
    partition: Vec<Vec<Node>>,
    special: bool,
}

impl PieceUnifier {
    /// Return the indices of the target body atoms forming the piece.
    pub fn piece(&self) -> &[usize] {
        &self.piece
    }

    /// Return the non-trivial classes of the partition.
    pub fn partition(&self) -> &[Vec<Node>] {
        &self.partition
    }

    /// Return whether this unifier identifies two existential variables of the source rule.
    pub fn is_special(&self) -> bool {
        self.special
    }

    /// Return the substitution that maps every term to the representative of its class.
    pub fn substitution(&self) -> Substitution {
        let mut mapping = BTreeMap::new();

        for class in &self.partition {
            let representative = class
                .iter()
                .min_by(|left, right| representative_rank(left).cmp(&representative_rank(right)))
                .cloned();

            if let Some(representative) = representative {
                for node in class {
                    mapping.insert(node.clone(), representative.clone());
                }
            }
        }

        Substitution(mapping)
    }
}

/// Class representatives are constants, then source variables, then target variables.
///
/// A class with an existential variable holds neither constants nor frontier variables,
/// so its representative is an existential variable.
fn representative_rank(node: &Node) -> (u8, &Node) {
    let rank = match node {
        Node::Constant(_) => 0,
        Node::Variable(Side::Source, _) => 1,
        Node::Variable(Side::Target, _) => 2,
    };

    (rank, node)
}

impl Display for PieceUnifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let classes = self
            .partition
            .iter()
            .map(|class| {
                class
                    .iter()
                    .map(Node::to_string)
                    .collect::<Vec<_>>()
                    .join("=")
            })
            .collect::<Vec<_>>();
        let piece = self
            .piece
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>();

        write!(f, "{{{}}} on [{}]", classes.join(", "), piece.join(", "))
    }
}

/// Application of a [PieceUnifier] to the atoms of its rules
#[derive(Debug, Clone, Default)]
pub struct Substitution(BTreeMap<Node, Node>);

impl Substitution {
    /// Apply the substitution to an atom of the given rule.
    pub fn apply(&self, atom: &Atom, side: Side) -> ImageAtom {
        let terms = atom
            .terms()
            .iter()
            .map(|term| {
                let node = Node::from_term(term, side);
                self.0.get(&node).cloned().unwrap_or(node)
            })
            .collect();

        ImageAtom {
            predicate: atom.predicate().clone(),
            terms,
        }
    }

    /// Apply the substitution to a conjunction of atoms of the given rule.
    pub fn apply_all<'a>(
        &self,
        atoms: impl IntoIterator<Item = &'a Atom>,
        side: Side,
    ) -> Vec<ImageAtom> {
        atoms
            .into_iter()
            .map(|atom| self.apply(atom, side))
            .collect()
    }
}

/// Return whether there is a homomorphism from `atoms` into `into`
/// that only maps the nodes accepted by `is_free` and leaves every other node fixed.
pub fn maps_into(
    atoms: &[ImageAtom],
    into: &[ImageAtom],
    is_free: impl Fn(&Node) -> bool,
) -> bool {
    fn extend(
        atoms: &[ImageAtom],
        into: &[ImageAtom],
        is_free: &dyn Fn(&Node) -> bool,
        assignment: &mut BTreeMap<Node, Node>,
    ) -> bool {
        let Some((first, rest)) = atoms.split_first() else {
            return true;
        };

        for candidate in into.iter().filter(|atom| atom.predicate == first.predicate) {
            let mut extended = assignment.clone();

            let compatible = first.terms.iter().zip(&candidate.terms).all(|(from, to)| {
                if !is_free(from) {
                    return from == to;
                }

                match extended.get(from) {
                    Some(assigned) => assigned == to,
                    None => {
                        extended.insert(from.clone(), to.clone());
                        true
                    }
                }
            });

            if compatible && extend(rest, into, is_free, &mut extended) {
                *assignment = extended;
                return true;
            }
        }

        false
    }

    extend(atoms, into, &is_free, &mut BTreeMap::new())
}

/// Partition of the terms of both rules, built up while unifying atoms
#[derive(Debug, Clone, Default)]
struct Partition {
    classes: Vec<BTreeSet<Node>>,
}

impl Partition {
    fn class_of(&self, node: &Node) -> Option<usize> {
        self.classes.iter().position(|class| class.contains(node))
    }

    fn union(&mut self, left: Node, right: Node) {
        match (self.class_of(&left), self.class_of(&right)) {
            (Some(left_class), Some(right_class)) if left_class == right_class => {}
            (Some(left_class), Some(right_class)) => {
                let merged = self.classes.swap_remove(left_class.max(right_class));
                self.classes[left_class.min(right_class)].extend(merged);
            }
            (Some(class), None) => {
                self.classes[class].insert(right);
            }
            (None, Some(class)) => {
                self.classes[class].insert(left);
            }
            (None, None) => self.classes.push(BTreeSet::from([left, right])),
        }
    }
}

/// Intermediate state of the piece search
#[derive(Debug, Clone)]
struct PieceSearch<'a> {
    source: &'a Rule,
    target: &'a Rule,
    /// Target body atoms of the piece, with the source head atom they are unified with
    mapping: BTreeMap<usize, usize>,
    partition: Partition,
}

impl<'a> PieceSearch<'a> {
    fn new(source: &'a Rule, target: &'a Rule) -> Self {
        Self {
            source,
            target,
            mapping: BTreeMap::new(),
            partition: Partition::default(),
        }
    }

    fn is_source_existential(&self, node: &Node) -> bool {
        matches!(node, Node::Variable(Side::Source, variable) if self.source.is_existential(variable))
    }

    /// Unify the given target body atom with the given source head atom.
    ///
    /// Returns `false` if the resulting partition is not a valid piece-unifier.
    fn extend(&mut self, body_index: usize, head_index: usize) -> bool {
        let body_atom = &self.target.body()[body_index];
        let head_atom = &self.source.head()[head_index];
        debug_assert_eq!(body_atom.predicate(), head_atom.predicate());

        self.mapping.insert(body_index, head_index);
        for (body_term, head_term) in body_atom.terms().iter().zip(head_atom.terms()) {
            self.partition.union(
                Node::from_term(body_term, Side::Target),
                Node::from_term(head_term, Side::Source),
            );
        }

        self.is_valid()
    }

    /// A class may contain at most one constant,
    /// and a class with an existential variable may contain neither constants nor frontier variables.
    fn is_valid(&self) -> bool {
        self.partition.classes.iter().all(|class| {
            let constants = class
                .iter()
                .filter(|node| matches!(node, Node::Constant(_)))
                .count();
            let existentials = class
                .iter()
                .filter(|node| self.is_source_existential(node))
                .count();
            let frontier = class
                .iter()
                .filter(|node| {
                    matches!(node, Node::Variable(Side::Source, _))
                        && !self.is_source_existential(node)
                })
                .count();

            constants <= 1 && (existentials == 0 || (constants == 0 && frontier == 0))
        })
    }

    /// Return a target body atom outside the piece that shares a variable
    /// with a class containing an existential variable.
    fn pending_atom(&self) -> Option<usize> {
        let sticky: BTreeSet<&Variable> = self
            .partition
            .classes
            .iter()
            .filter(|class| class.iter().any(|node| self.is_source_existential(node)))
            .flatten()
            .filter_map(|node| match node {
                Node::Variable(Side::Target, variable) => Some(variable),
                _ => None,
            })
            .collect();

        self.target
            .body()
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.mapping.contains_key(index))
            .find(|(_, atom)| atom.variables().any(|variable| sticky.contains(&variable)))
            .map(|(index, _)| index)
    }

    fn close(self, results: &mut BTreeSet<PieceUnifier>) {
        let Some(pending) = self.pending_atom() else {
            results.insert(self.finish());
            return;
        };

        let predicate = self.target.body()[pending].predicate();
        for (head_index, head_atom) in self.source.head().iter().enumerate() {
            if head_atom.predicate() != predicate {
                continue;
            }

            let mut next = self.clone();
            if next.extend(pending, head_index) {
                next.close(results);
            }
        }
    }

    fn finish(self) -> PieceUnifier {
        let special = self.partition.classes.iter().any(|class| {
            class
                .iter()
                .filter(|node| self.is_source_existential(node))
                .count()
                > 1
        });

        let mut partition: Vec<Vec<Node>> = self
            .partition
            .classes
            .into_iter()
            .filter(|class| class.len() > 1)
            .map(|class| class.into_iter().collect())
            .collect();
        partition.sort();

        PieceUnifier {
            piece: self.mapping.into_keys().collect(),
            partition,
            special,
        }
    }
}

/// Compute all single-piece unifiers of the head of `source` with the body of `target`.
///
/// The result is sorted and free of duplicates.
pub fn piece_unifiers(source: &Rule, target: &Rule) -> Vec<PieceUnifier> {
    let mut results = BTreeSet::new();

    for (body_index, body_atom) in target.body().iter().enumerate() {
        for (head_index, head_atom) in source.head().iter().enumerate() {
            if body_atom.predicate() != head_atom.predicate() {
                continue;
            }

            let mut search = PieceSearch::new(source, target);
            if search.extend(body_index, head_index) {
                search.close(&mut results);
            }
        }
    }

    log::trace!(
        "found {} piece-unifiers from {} to {}",
        results.len(),
        source.label().unwrap_or("<unlabelled>"),
        target.label().unwrap_or("<unlabelled>")
    );

    results.into_iter().collect()
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::rule_model::{Atom, Rule, Term};

    fn rule(body: Vec<Atom>, head: Vec<Atom>) -> Rule {
        Rule::new(None, body, head).unwrap()
    }

    fn atom(predicate: &str, terms: &[&str]) -> Atom {
        let terms = terms
            .iter()
            .map(|name| {
                if name.starts_with(char::is_uppercase) {
                    Term::variable(*name)
                } else {
                    Term::constant(*name)
                }
            })
            .collect();

        Atom::new(predicate, terms)
    }

    #[test]
    fn frontier_unifier() {
        let source = rule(vec![atom("p", &["X"])], vec![atom("q", &["X"])]);
        let target = rule(vec![atom("q", &["Y"])], vec![atom("r", &["Y"])]);

        let unifiers = piece_unifiers(&source, &target);

        assert_eq!(unifiers.len(), 1);
        assert_eq!(unifiers[0].piece(), &[0]);
        assert!(!unifiers[0].is_special());
        assert_eq!(unifiers[0].to_string(), "{X=Y'} on [0]");
    }

    #[test]
    fn different_predicates_do_not_unify() {
        let source = rule(vec![atom("p", &["X"])], vec![atom("q", &["X"])]);
        let target = rule(vec![atom("p", &["Y"])], vec![atom("r", &["Y"])]);

        assert!(piece_unifiers(&source, &target).is_empty());
    }

    #[test]
    fn clashing_constants() {
        let source = rule(vec![atom("p", &["X"])], vec![atom("q", &["X", "a"])]);
        let target = rule(vec![atom("q", &["Y", "b"])], vec![atom("r", &["Y"])]);

        assert!(piece_unifiers(&source, &target).is_empty());
    }

    #[test]
    fn existential_cannot_meet_constant() {
        let source = rule(vec![atom("p", &["X"])], vec![atom("q", &["X", "Z"])]);
        let target = rule(vec![atom("q", &["Y", "c"])], vec![atom("r", &["Y"])]);

        assert!(piece_unifiers(&source, &target).is_empty());
    }

    #[test]
    fn existential_cannot_meet_frontier() {
        let source = rule(vec![atom("p", &["X"])], vec![atom("q", &["X", "Z"])]);
        let target = rule(vec![atom("q", &["Y", "Y"])], vec![atom("r", &["Y"])]);

        assert!(piece_unifiers(&source, &target).is_empty());
    }

    #[test]
    fn piece_grows_along_existentials() {
        // Y is unified with the existential Z and also occurs in s(Y),
        // which no head atom can cover
        let source = rule(vec![atom("p", &["X"])], vec![atom("q", &["X", "Z"])]);
        let target = rule(
            vec![atom("q", &["W", "Y"]), atom("s", &["Y"])],
            vec![atom("r", &["W"])],
        );

        assert!(piece_unifiers(&source, &target).is_empty());

        let source = rule(
            vec![atom("p", &["X"])],
            vec![atom("q", &["X", "Z"]), atom("s", &["Z"])],
        );
        let unifiers = piece_unifiers(&source, &target);

        assert_eq!(unifiers.len(), 1);
        assert_eq!(unifiers[0].piece(), &[0, 1]);
    }

    #[test]
    fn special_unifier() {
        let source = rule(
            vec![atom("p", &["X"])],
            vec![atom("q", &["X", "Z1"]), atom("q", &["X", "Z2"])],
        );
        let target = rule(
            vec![atom("q", &["Y", "W"]), atom("q", &["V", "W"])],
            vec![atom("r", &["Y", "V"])],
        );

        let unifiers = piece_unifiers(&source, &target);

        assert!(unifiers.iter().any(PieceUnifier::is_special));
        assert!(unifiers.iter().any(|unifier| !unifier.is_special()));
    }

    #[test]
    fn substitution_prefers_source_terms() {
        let source = rule(vec![atom("p", &["X"])], vec![atom("q", &["X", "a"])]);
        let target = rule(vec![atom("q", &["Y", "W"])], vec![atom("r", &["Y", "W"])]);

        let unifier = piece_unifiers(&source, &target).remove(0);
        let substitution = unifier.substitution();

        assert_eq!(
            substitution.apply(&target.head()[0], Side::Target),
            substitution.apply(&atom("r", &["X", "a"]), Side::Source)
        );
    }

    #[test]
    fn homomorphism() {
        let substitution = Substitution::default();
        let into = substitution.apply_all(
            &[atom("p", &["X", "a"]), atom("q", &["a"])],
            Side::Source,
        );

        let free = |node: &Node| matches!(node, Node::Variable(Side::Target, _));
        let atoms = substitution.apply_all(
            &[atom("p", &["X", "Z"]), atom("q", &["Z"])],
            Side::Target,
        );
        assert!(maps_into(&atoms, &into, free));

        let atoms = substitution.apply_all(&[atom("p", &["Z", "Z"])], Side::Target);
        assert!(!maps_into(&atoms, &into, free));
    }
}
