//! Graphs built over a rule set.
//!
//! The [graph of rule dependencies][grd::Grd], its [condensation][scc::Condensation]
//! into strongly connected components and the
//! [predicate position graph][position_graph::PositionGraph].

pub mod grd;
pub mod position_graph;
pub mod scc;

pub use grd::{DependencyEdge, Grd};
pub use position_graph::{Position, PositionGraph, PositionGraphEdgeType};
pub use scc::{ComponentIndex, Condensation};
