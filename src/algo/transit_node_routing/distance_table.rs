//! The pairwise transit node distance table.
//!
//! One contiguous `M x M` buffer of exact shortest path distances between all
//! ordered pairs of transit nodes under the current metric. Rows are
//! independent and computed in parallel; every worker runs elimination tree
//! queries with its own scratch, the customized hierarchy is shared read only.

use super::*;
use crate::algo::customizable_contraction_hierarchy::query::{combine_on_common_ancestors, relax_root_path};
use rayon::prelude::*;

#[derive(Debug, PartialEq)]
pub struct TransitNodeDistances {
    num_transit_nodes: usize,
    distances: Vec<Weight>,
}

impl TransitNodeDistances {
    pub(super) fn from_parts(num_transit_nodes: usize, distances: Vec<Weight>) -> Self {
        assert_eq!(distances.len(), num_transit_nodes * num_transit_nodes);
        TransitNodeDistances {
            num_transit_nodes,
            distances,
        }
    }

    /// Exact distance from one transit node to another,
    /// both given as positions in the transit node sequence.
    #[inline]
    pub fn get(&self, from: u32, to: u32) -> Weight {
        self.distances[from as usize * self.num_transit_nodes + to as usize]
    }

    pub fn num_transit_nodes(&self) -> usize {
        self.num_transit_nodes
    }

    pub(super) fn distances(&self) -> &Vec<Weight> {
        &self.distances
    }

    pub fn size_in_bytes(&self) -> usize {
        self.distances.len() * std::mem::size_of::<Weight>()
    }
}

pub(super) fn compute_distance_table(index: &TransitNodeRouting, metric: &Customized) -> TransitNodeDistances {
    let cch = metric.cch();
    let n = cch.num_nodes();
    let order = cch.node_order();
    let elimination_tree = cch.elimination_tree();

    let ranks: Vec<NodeId> = index.transit_nodes().iter().map(|&node| order.rank(node)).collect();
    let num_transit_nodes = ranks.len();

    if num_transit_nodes == 0 {
        return TransitNodeDistances::from_parts(0, Vec::new());
    }

    let mut distances = vec![INFINITY; num_transit_nodes * num_transit_nodes];

    distances
        .par_chunks_mut(num_transit_nodes)
        .enumerate()
        .for_each_init(
            || (vec![INFINITY; n], vec![INFINITY; n]),
            |(fw_distances, bw_distances), (row, row_distances)| {
                let source = ranks[row];
                // one forward search per row, shared by all targets
                relax_root_path(metric.forward_graph(), elimination_tree, fw_distances, source);

                for (column, slot) in row_distances.iter_mut().enumerate() {
                    if row == column {
                        *slot = 0;
                        continue;
                    }
                    let target = ranks[column];
                    relax_root_path(metric.backward_graph(), elimination_tree, bw_distances, target);
                    *slot = combine_on_common_ancestors(elimination_tree, fw_distances, bw_distances, source, target);
                }
            },
        );

    TransitNodeDistances::from_parts(num_transit_nodes, distances)
}
