//! A bidirectional mapping between node ids and their rank in a contraction order.

use crate::datastr::graph::*;

pub type Rank = NodeId;

/// A type for node orders which allows efficiently retrieving both the rank of a node
/// and the node for a given rank. Mostly useful because this type makes it always clear
/// in which direction the mapping goes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOrder {
    // node ids ordered by their ranks - ascending in importance
    node_order: Vec<NodeId>,
    // the rank of each node - 0 is the lowest importance, n-1 the highest
    ranks: Vec<Rank>,
}

impl NodeOrder {
    /// Create a `NodeOrder` where the id is equal to the rank.
    pub fn identity(n: usize) -> NodeOrder {
        NodeOrder {
            node_order: (0..n as NodeId).collect(),
            ranks: (0..n as Rank).collect(),
        }
    }

    /// Create a `NodeOrder` from an order vector, that is a vector containing the node ids ordered by their rank.
    pub fn from_node_order(node_order: Vec<NodeId>) -> NodeOrder {
        let n = node_order.len();
        assert!(n < NodeId::MAX as usize);
        let mut ranks = vec![n as Rank; n];

        for (rank, &node) in node_order.iter().enumerate() {
            ranks[node as usize] = rank as Rank;
        }

        debug_assert_eq!(ranks.iter().position(|&rank| rank == n as Rank), None, "order is not a permutation");

        NodeOrder { node_order, ranks }
    }

    /// Create a `NodeOrder` from a rank vector, that is a vector where `ranks[id]` contains the rank of node `id`.
    pub fn from_ranks(ranks: Vec<Rank>) -> NodeOrder {
        let n = ranks.len();
        assert!(n < NodeId::MAX as usize);
        let mut node_order = vec![n as NodeId; n];

        for (node, &rank) in ranks.iter().enumerate() {
            node_order[rank as usize] = node as NodeId;
        }

        debug_assert_eq!(node_order.iter().position(|&node| node == n as NodeId), None, "ranks are not a permutation");

        NodeOrder { node_order, ranks }
    }

    /// Get node order (rank -> node) as a slice
    pub fn order(&self) -> &[NodeId] {
        &self.node_order
    }

    /// Get node ranks (node -> rank) as a slice
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// Get rank for a given node
    pub fn rank(&self, node: NodeId) -> Rank {
        self.ranks[node as usize]
    }

    /// Get node for a given rank
    pub fn node(&self, rank: Rank) -> NodeId {
        self.node_order[rank as usize]
    }

    /// Number of nodes in the order
    pub fn len(&self) -> usize {
        self.node_order.len()
    }

    /// Are there no nodes in the order?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
