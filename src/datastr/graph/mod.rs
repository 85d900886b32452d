//! Traits and structs for working with weighted directed graphs.

use std::ops::Range;

pub mod first_out_graph;

pub use self::first_out_graph::{degrees_to_first_out, BorrowedGraph, FirstOutGraph, OwnedGraph};

/// Node ids are 32bit unsigned ints
pub type NodeId = u32;
/// Edge ids are 32bit unsigned ints
pub type EdgeId = u32;
/// Basic weights are 32bit unsigned ints
pub type Weight = u32;
/// A sufficiently large infinity constant.
/// Set to `u32::MAX / 2` so that `INFINITY + x` for `x <= INFINITY` does not overflow.
pub const INFINITY: Weight = u32::MAX / 2;

/// Simple struct for weighted links.
/// No behaviour, just a pure data struct.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Link {
    pub node: NodeId,
    pub weight: Weight,
}

/// Base trait for graphs.
/// Interesting behaviour will be added through subtraits.
pub trait Graph {
    fn num_nodes(&self) -> usize;
    fn num_arcs(&self) -> usize;
    fn degree(&self, node: NodeId) -> usize;
}

/// Trait for graph data structures which allow iterating over outgoing links of a node.
pub trait LinkIterGraph: Graph {
    /// Get an iterator over the outgoing links of the given node.
    fn link_iter(&self, node: NodeId) -> impl Iterator<Item = Link> + '_;

    /// Create a new graph with all edges reversed.
    fn reverse(&self) -> OwnedGraph {
        let mut reversed: Vec<Vec<Link>> = (0..self.num_nodes()).map(|_| Vec::<Link>::new()).collect();

        for node in 0..(self.num_nodes() as NodeId) {
            for Link { node: neighbor, weight } in self.link_iter(node) {
                reversed[neighbor as usize].push(Link { node, weight });
            }
        }

        OwnedGraph::from_adjacency_lists(reversed)
    }
}

/// Trait for graph types which allow random access to links based on edge ids.
pub trait RandomLinkAccessGraph: Graph {
    /// Get the link with the given id.
    fn link(&self, edge_id: EdgeId) -> Link;
    /// Get the range of edge ids which make up the outgoing edges of `node`.
    fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId>;

    /// The same range as `neighbor_edge_indices` but as a `Range<usize>`.
    fn neighbor_edge_indices_usize(&self, node: NodeId) -> Range<usize> {
        let range = self.neighbor_edge_indices(node);
        Range {
            start: range.start as usize,
            end: range.end as usize,
        }
    }
}
