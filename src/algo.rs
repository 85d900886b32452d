//! Building blocks for fast routing algorithms.

use crate::datastr::graph::*;

pub mod customizable_contraction_hierarchy;
pub mod dijkstra;
pub mod transit_node_routing;

/// Simply a source-target pair
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub from: NodeId,
    pub to: NodeId,
}
