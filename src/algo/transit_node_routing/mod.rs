//! Customizable transit node routing.
//!
//! Long range queries in road networks almost always pass through a small set
//! of important vertices. A nested dissection separator decomposition makes
//! that set explicit: every vertex in a separator node of depth at most the
//! configured threshold becomes a transit node. Metric independent
//! preprocessing selects the transit nodes and derives the locality hierarchy;
//! customization computes per-vertex access nodes, the pairwise transit node
//! distance table and prunes dominated access nodes. Queries whose lowest
//! common separator ancestor is at most as deep as the threshold are answered
//! with three table lookups per access node pair, everything else falls back
//! to the elimination tree search of the underlying CCH.

use crate::algo::customizable_contraction_hierarchy::{Customized, CCH};
use crate::datastr::{graph::*, separator_decomposition::SeparatorDecomposition};
use crate::io::*;
use crate::report::*;
use crate::util::in_range_option::InRangeOption;

pub mod access_nodes;
pub mod distance_table;
pub mod hierarchy;
pub mod query;

pub use access_nodes::{AccessNode, AccessNodes};
pub use distance_table::TransitNodeDistances;
pub use hierarchy::SeparatorHierarchy;
pub use query::Server;

use access_nodes::{compute_access_nodes, prune_dominated};
use distance_table::compute_distance_table;

/// Version tag of the serialized index format.
const FILE_FORMAT_VERSION: u64 = 1;

/// All metric independent data of the index: the locality hierarchy,
/// the transit node sequence and its inverse mapping.
/// The separator decomposition and the CCH are borrowed read only.
pub struct TransitNodeRouting<'a> {
    cch: &'a CCH,
    decomp: &'a SeparatorDecomposition,
    hierarchy: SeparatorHierarchy,
    transit_node_threshold: u32,
    // original ids, sorted by level ascending, ties in tree walk order
    transit_nodes: Vec<NodeId>,
    // original id -> position in `transit_nodes`
    transit_node_index: Vec<InRangeOption<u32>>,
}

impl<'a> TransitNodeRouting<'a> {
    /// Metric independent preprocessing.
    /// Transit nodes are all vertices whose separator node has depth at most
    /// `transit_node_threshold`. The result is a pure function of the
    /// decomposition and the threshold.
    pub fn new(cch: &'a CCH, decomp: &'a SeparatorDecomposition, transit_node_threshold: u32) -> Self {
        assert_eq!(cch.num_nodes(), decomp.num_vertices(), "graph and separator decomposition sizes mismatch");
        assert_eq!(
            cch.node_order().order(),
            decomp.order().order(),
            "CCH contraction order and separator decomposition order disagree"
        );

        let hierarchy = SeparatorHierarchy::new(decomp);

        let transit_nodes = report_time_with_key("transit node selection", "selection_ms", || {
            // preorder walk, collecting the vertices of all tree nodes down to the threshold
            let mut collected: Vec<(u32, NodeId)> = Vec::new();
            let mut stack = vec![(0u32, 0u32)];
            while let Some((node, depth)) = stack.pop() {
                for vertex in decomp.separator_vertices(node) {
                    collected.push((depth, vertex));
                }
                if depth < transit_node_threshold {
                    // children are pushed in reverse to keep the walk a preorder traversal
                    let children: Vec<u32> = decomp.children(node).collect();
                    for &child in children.iter().rev() {
                        stack.push((child, depth + 1));
                    }
                }
            }
            // stable, so vertices of equal level stay in walk order
            collected.sort_by_key(|&(level, _)| level);
            collected.into_iter().map(|(_, vertex)| vertex).collect::<Vec<NodeId>>()
        });
        report!("num_transit_nodes", transit_nodes.len());

        let mut transit_node_index = vec![InRangeOption::new(None); decomp.num_vertices()];
        for (position, &node) in transit_nodes.iter().enumerate() {
            transit_node_index[node as usize] = InRangeOption::new(Some(position as u32));
        }

        TransitNodeRouting {
            cch,
            decomp,
            hierarchy,
            transit_node_threshold,
            transit_nodes,
            transit_node_index,
        }
    }

    /// Metric dependent preprocessing: build access nodes and the transit node
    /// distance table for the given customization, then prune dominated
    /// access nodes. Each call produces a fresh set of tables.
    pub fn customize<'s>(&'s self, metric: &'s Customized<'s>) -> CustomizedTransitNodes<'s> {
        assert!(
            std::ptr::eq(metric.cch(), self.cch),
            "customization belongs to a different hierarchy"
        );

        let (mut forward_lists, mut backward_lists) =
            report_time_with_key("access node computation", "access_nodes_ms", || compute_access_nodes(self, metric));
        let table = report_time_with_key("transit node distance table", "distance_table_ms", || {
            compute_distance_table(self, metric)
        });
        report_time_with_key("dominance pruning", "pruning_ms", || {
            prune_dominated(&mut forward_lists, &table, true);
            prune_dominated(&mut backward_lists, &table, false);
        });

        let forward_access = AccessNodes::from_lists(&forward_lists);
        let backward_access = AccessNodes::from_lists(&backward_lists);
        report!("forward_access_node_entries", forward_access.num_entries());
        report!("backward_access_node_entries", backward_access.num_entries());
        report!("table_size_bytes", table.size_in_bytes());

        CustomizedTransitNodes {
            index: self,
            metric,
            forward_access,
            backward_access,
            table,
        }
    }

    /// The transit node sequence: original vertex ids,
    /// sorted by level ascending with deterministic tie breaking.
    pub fn transit_nodes(&self) -> &[NodeId] {
        &self.transit_nodes
    }

    /// Position of a vertex (original id) in the transit node sequence.
    pub fn transit_node_index(&self, node: NodeId) -> Option<u32> {
        self.transit_node_index[node as usize].value()
    }

    /// Position of a vertex (rank id) in the transit node sequence.
    pub fn transit_node_position_of_rank(&self, rank: NodeId) -> Option<u32> {
        self.transit_node_index(self.cch.node_order().node(rank))
    }

    pub fn transit_node_threshold(&self) -> u32 {
        self.transit_node_threshold
    }

    pub fn hierarchy(&self) -> &SeparatorHierarchy {
        &self.hierarchy
    }

    pub fn cch(&self) -> &'a CCH {
        self.cch
    }

    pub fn decomposition(&self) -> &'a SeparatorDecomposition {
        self.decomp
    }

    pub fn size_in_bytes(&self) -> usize {
        use std::mem::size_of;
        self.hierarchy.size_in_bytes()
            + self.transit_nodes.len() * size_of::<NodeId>()
            + self.transit_node_index.len() * size_of::<InRangeOption<u32>>()
    }
}

/// The metric dependent tables: access nodes of both directions and the
/// transit node distance table. Owned by this struct, immutable once built.
pub struct CustomizedTransitNodes<'a> {
    index: &'a TransitNodeRouting<'a>,
    metric: &'a Customized<'a>,
    forward_access: AccessNodes,
    backward_access: AccessNodes,
    table: TransitNodeDistances,
}

impl<'a> CustomizedTransitNodes<'a> {
    pub fn index(&self) -> &'a TransitNodeRouting<'a> {
        self.index
    }

    pub fn metric(&self) -> &'a Customized<'a> {
        self.metric
    }

    pub fn forward_access_nodes(&self) -> &AccessNodes {
        &self.forward_access
    }

    pub fn backward_access_nodes(&self) -> &AccessNodes {
        &self.backward_access
    }

    pub fn transit_node_distances(&self) -> &TransitNodeDistances {
        &self.table
    }

    pub fn size_in_bytes(&self) -> usize {
        self.index.size_in_bytes() + self.forward_access.size_in_bytes() + self.backward_access.size_in_bytes() + self.table.size_in_bytes()
    }
}

impl Deconstruct for CustomizedTransitNodes<'_> {
    fn store_each(&self, store: &dyn Fn(&str, &dyn Store) -> std::io::Result<()>) -> std::io::Result<()> {
        let index = self.index;
        let meta: Vec<u64> = vec![
            FILE_FORMAT_VERSION,
            index.cch.num_nodes() as u64,
            index.transit_nodes.len() as u64,
            index.transit_node_threshold as u64,
            index.decomp.fingerprint(),
        ];
        let transit_node_index: Vec<u32> = index
            .transit_node_index
            .iter()
            .map(|position| position.value().unwrap_or(u32::MAX))
            .collect();

        store("meta", &meta)?;
        store("transit_nodes", &index.transit_nodes)?;
        store("transit_node_index", &transit_node_index)?;
        store("forward_access_first_out", self.forward_access.first_out())?;
        store("forward_access_transit_nodes", self.forward_access.transit_nodes())?;
        store("forward_access_distances", self.forward_access.distances())?;
        store("backward_access_first_out", self.backward_access.first_out())?;
        store("backward_access_transit_nodes", self.backward_access.transit_nodes())?;
        store("backward_access_distances", self.backward_access.distances())?;
        store("transit_node_distances", self.table.distances())?;
        Ok(())
    }
}

/// Reconstructs a serialized customized index on top of live preprocessed
/// structures. Validates that the file was written for exactly these
/// structures before anything is rebuilt.
pub struct CustomizedTransitNodesReconstructor<'a> {
    pub index: &'a TransitNodeRouting<'a>,
    pub metric: &'a Customized<'a>,
}

impl<'a> ReconstructPrepared<CustomizedTransitNodes<'a>> for CustomizedTransitNodesReconstructor<'a> {
    fn reconstruct_with(self, loader: Loader) -> std::io::Result<CustomizedTransitNodes<'a>> {
        let invalid = |message: &'static str| std::io::Error::new(std::io::ErrorKind::InvalidData, message);
        let index = self.index;

        let meta: Vec<u64> = loader.load("meta")?;
        if meta.len() != 5 || meta[0] != FILE_FORMAT_VERSION {
            return Err(invalid("unsupported index file version"));
        }
        if meta[1] != index.cch.num_nodes() as u64
            || meta[2] != index.transit_nodes.len() as u64
            || meta[3] != index.transit_node_threshold as u64
        {
            return Err(invalid("index file does not match the preprocessed index"));
        }
        if meta[4] != index.decomp.fingerprint() {
            return Err(invalid("index file belongs to a different separator decomposition"));
        }
        let transit_nodes: Vec<NodeId> = loader.load("transit_nodes")?;
        if transit_nodes != index.transit_nodes {
            return Err(invalid("transit node sequence mismatch"));
        }
        let transit_node_index: Vec<u32> = loader.load("transit_node_index")?;
        let expected: Vec<u32> = index
            .transit_node_index
            .iter()
            .map(|position| position.value().unwrap_or(u32::MAX))
            .collect();
        if transit_node_index != expected {
            return Err(invalid("transit node mapping mismatch"));
        }

        let forward_access = AccessNodes::from_parts(
            loader.load("forward_access_first_out")?,
            loader.load("forward_access_transit_nodes")?,
            loader.load("forward_access_distances")?,
        );
        let backward_access = AccessNodes::from_parts(
            loader.load("backward_access_first_out")?,
            loader.load("backward_access_transit_nodes")?,
            loader.load("backward_access_distances")?,
        );
        let table = TransitNodeDistances::from_parts(index.transit_nodes.len(), loader.load("transit_node_distances")?);

        Ok(CustomizedTransitNodes {
            index,
            metric: self.metric,
            forward_access,
            backward_access,
            table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::customizable_contraction_hierarchy::contract;
    use crate::datastr::{node_order::NodeOrder, separator_decomposition::SeparatorTreeNode};

    fn path_graph() -> OwnedGraph {
        // path 0 - 1 - 2 - 3 - 4 with unit weights in both directions
        OwnedGraph::new(vec![0, 1, 3, 5, 7, 8], vec![1, 0, 2, 1, 3, 2, 4, 3], vec![1; 8])
    }

    fn path_decomposition() -> SeparatorDecomposition {
        SeparatorDecomposition::new(
            vec![
                SeparatorTreeNode {
                    left_child: 1,
                    right_sibling: 0,
                    first_separator_vertex: 4,
                    last_separator_vertex: 5,
                },
                SeparatorTreeNode {
                    left_child: 0,
                    right_sibling: 2,
                    first_separator_vertex: 0,
                    last_separator_vertex: 2,
                },
                SeparatorTreeNode {
                    left_child: 0,
                    right_sibling: 0,
                    first_separator_vertex: 2,
                    last_separator_vertex: 4,
                },
            ],
            NodeOrder::from_node_order(vec![0, 1, 3, 4, 2]),
        )
    }

    #[test]
    fn transit_nodes_of_the_root_separator() {
        let graph = path_graph();
        let decomp = path_decomposition();
        let cch = contract(&graph, decomp.order().clone());
        let tnr = TransitNodeRouting::new(&cch, &decomp, 0);

        assert_eq!(tnr.transit_nodes(), &[2]);
        assert_eq!(tnr.transit_node_index(2), Some(0));
        assert_eq!(tnr.transit_node_index(0), None);
        // rank of vertex 2 is 4
        assert_eq!(tnr.transit_node_position_of_rank(4), Some(0));
    }

    #[test]
    fn transit_nodes_are_level_sorted_with_walk_order_ties() {
        let graph = path_graph();
        let decomp = path_decomposition();
        let cch = contract(&graph, decomp.order().clone());
        let tnr = TransitNodeRouting::new(&cch, &decomp, 10);

        // root separator first, then the cells left to right
        assert_eq!(tnr.transit_nodes(), &[2, 0, 1, 3, 4]);
    }

    #[test]
    fn selection_is_deterministic() {
        let graph = path_graph();
        let decomp = path_decomposition();
        let cch = contract(&graph, decomp.order().clone());

        let first = TransitNodeRouting::new(&cch, &decomp, 1);
        let second = TransitNodeRouting::new(&cch, &decomp, 1);
        assert_eq!(first.transit_nodes(), second.transit_nodes());
    }
}
