//! Implementation of Customizable Contraction Hierarchies.

use crate::datastr::{graph::*, node_order::NodeOrder};
use crate::report::benchmark::*;
use crate::util::in_range_option::InRangeOption;
use std::ops::Range;

mod contraction;
use contraction::*;
mod customization;
pub use customization::customize;
pub mod query;

/// Execute first phase, that is metric independent preprocessing.
pub fn contract<Graph: LinkIterGraph + RandomLinkAccessGraph>(graph: &Graph, node_order: NodeOrder) -> CCH {
    report_time("CCH contraction", || CCH::new(ContractionGraph::new(graph, node_order).contract()))
}

/// A struct containing all metric independent preprocessing data of CCHs.
/// This includes on top of the chordal supergraph (the "contracted" graph)
/// the elimination tree and a mapping from original arcs to chordal arcs.
pub struct CCH {
    first_out: Vec<EdgeId>,
    head: Vec<NodeId>,
    node_order: NodeOrder,
    elimination_tree: Vec<InRangeOption<NodeId>>,
    // the chordal arc each original arc maps to, split by arc direction relative to the order.
    // Loops map to neither.
    orig_arc_to_upward_arc: Vec<InRangeOption<EdgeId>>,
    orig_arc_to_downward_arc: Vec<InRangeOption<EdgeId>>,
}

impl CCH {
    fn new<Graph: LinkIterGraph + RandomLinkAccessGraph>(contracted_graph: ContractedGraph<Graph>) -> CCH {
        let (first_out, head, node_order, original_graph) = contracted_graph.decompose();

        let n = (first_out.len() - 1) as NodeId;
        let elimination_tree = (0..n)
            .map(|rank| {
                let range = (first_out[rank as usize] as usize)..(first_out[rank as usize + 1] as usize);
                InRangeOption::new(head[range].iter().copied().min())
            })
            .collect();

        let mut cch = CCH {
            first_out,
            head,
            node_order,
            elimination_tree,
            orig_arc_to_upward_arc: vec![InRangeOption::new(None); original_graph.num_arcs()],
            orig_arc_to_downward_arc: vec![InRangeOption::new(None); original_graph.num_arcs()],
        };

        for node in 0..n {
            for (edge_id, link) in original_graph
                .neighbor_edge_indices(node)
                .zip(original_graph.link_iter(node))
            {
                if link.node == node {
                    continue;
                }
                let rank = cch.node_order.rank(node);
                let head_rank = cch.node_order.rank(link.node);
                if rank < head_rank {
                    let arc = cch.edge_index(rank, head_rank);
                    cch.orig_arc_to_upward_arc[edge_id as usize] = InRangeOption::new(arc);
                } else {
                    let arc = cch.edge_index(head_rank, rank);
                    cch.orig_arc_to_downward_arc[edge_id as usize] = InRangeOption::new(arc);
                }
            }
        }

        cch
    }

    /// Find the id of the chordal arc from `from` to `to` if it exists.
    /// Both parameters are ranks and `from` has to be the smaller one.
    pub fn edge_index(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        let range = self.neighbor_edge_indices_usize(from);
        // upward neighborhoods are sorted by rank
        self.head[range.clone()]
            .binary_search(&to)
            .ok()
            .map(|position| (range.start + position) as EdgeId)
    }

    /// Borrow the elimination tree.
    /// The entry at index `x` contains the parent of node `x`, `None` for roots.
    pub fn elimination_tree(&self) -> &[InRangeOption<NodeId>] {
        &self.elimination_tree[..]
    }

    /// Borrow node order
    pub fn node_order(&self) -> &NodeOrder {
        &self.node_order
    }

    /// Number of arcs of the original graph this CCH was built for.
    pub fn num_original_arcs(&self) -> usize {
        self.orig_arc_to_upward_arc.len()
    }

    #[inline]
    pub fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId> {
        (self.first_out[node as usize])..(self.first_out[(node + 1) as usize])
    }

    #[inline]
    pub fn neighbor_edge_indices_usize(&self, node: NodeId) -> Range<usize> {
        let range = self.neighbor_edge_indices(node);
        Range {
            start: range.start as usize,
            end: range.end as usize,
        }
    }

    /// Iterator over the upward neighbors of a node, sorted by rank ascending.
    #[inline]
    pub fn neighbor_iter(&self, node: NodeId) -> std::iter::Copied<std::slice::Iter<NodeId>> {
        let range = self.neighbor_edge_indices_usize(node);
        self.head[range].iter().copied()
    }
}

impl Graph for CCH {
    fn num_nodes(&self) -> usize {
        self.first_out.len() - 1
    }

    fn num_arcs(&self) -> usize {
        self.head.len()
    }

    fn degree(&self, node: NodeId) -> usize {
        let node = node as usize;
        (self.first_out[node + 1] - self.first_out[node]) as usize
    }
}

/// A struct containing the results of the second preprocessing phase.
pub struct Customized<'c> {
    cch: &'c CCH,
    upward: Vec<Weight>,
    downward: Vec<Weight>,
}

impl<'c> Customized<'c> {
    pub fn cch(&self) -> &'c CCH {
        self.cch
    }

    /// The chordal supergraph with customized upward weights.
    pub fn forward_graph(&self) -> BorrowedGraph {
        FirstOutGraph::new(&self.cch.first_out[..], &self.cch.head[..], &self.upward[..])
    }

    /// The chordal supergraph with customized downward weights.
    /// An arc `(x, y)` of this graph represents the downward arc `y -> x`.
    pub fn backward_graph(&self) -> BorrowedGraph {
        FirstOutGraph::new(&self.cch.first_out[..], &self.cch.head[..], &self.downward[..])
    }

    /// Customized upward weights by chordal arc id.
    pub fn upward(&self) -> &[Weight] {
        &self.upward
    }

    /// Customized downward weights by chordal arc id.
    pub fn downward(&self) -> &[Weight] {
        &self.downward
    }
}
