//! The two mode query engine.
//!
//! The lowest common ancestor of the separator nodes of source and target
//! decides the mode: if it is at most as deep as the transit node threshold,
//! every connecting path crosses a separator made up entirely of transit
//! nodes, and the distance is the best three hop combination of a forward
//! access node, a table entry and a backward access node. Deeper pairs are
//! local and answered exactly by the elimination tree search.

use super::*;
use crate::algo::customizable_contraction_hierarchy::query::rank_distance;

/// Query server on top of a customized index.
/// Keeps the elimination tree scratch for local queries.
pub struct Server<'a> {
    customized: CustomizedTransitNodes<'a>,
    fw_distances: Vec<Weight>,
    bw_distances: Vec<Weight>,
}

impl<'a> Server<'a> {
    pub fn new(customized: CustomizedTransitNodes<'a>) -> Self {
        let n = customized.metric().cch().num_nodes();
        Server {
            customized,
            fw_distances: vec![INFINITY; n],
            bw_distances: vec![INFINITY; n],
        }
    }

    pub fn customized(&self) -> &CustomizedTransitNodes<'a> {
        &self.customized
    }

    /// Replace the customized tables, for example after a metric change.
    /// Queries issued after this call observe the new metric.
    pub fn update(&mut self, customized: CustomizedTransitNodes<'a>) {
        self.customized = customized;
    }

    /// Shortest distance between two vertices given by rank.
    /// Returns `INFINITY` if the target is unreachable.
    pub fn query(&mut self, from: NodeId, to: NodeId) -> Weight {
        let index = self.customized.index();
        let n = self.customized.metric().cch().num_nodes() as NodeId;
        assert!(from < n, "invalid source vertex");
        assert!(to < n, "invalid target vertex");

        let hierarchy = index.hierarchy();
        let lca = hierarchy.lowest_common_separator_ancestor(from, to);

        if hierarchy.node_depth(lca) > index.transit_node_threshold() {
            // local query - both endpoints live in a cell below every transit
            // separator, the elimination tree search is exact on all of it
            rank_distance(self.customized.metric(), &mut self.fw_distances, &mut self.bw_distances, from, to)
        } else {
            self.transit_query(from, to)
        }
    }

    /// Like `query`, with the unreachable case as `None`.
    pub fn distance(&mut self, from: NodeId, to: NodeId) -> Option<Weight> {
        match self.query(from, to) {
            INFINITY => None,
            dist => Some(dist),
        }
    }

    fn transit_query(&self, from: NodeId, to: NodeId) -> Weight {
        let table = self.customized.transit_node_distances();
        let mut best = INFINITY;

        for forward_access in self.customized.forward_access_nodes().of(from) {
            if forward_access.distance >= best {
                continue;
            }
            for backward_access in self.customized.backward_access_nodes().of(to) {
                if backward_access.distance >= best {
                    continue;
                }
                let between = table.get(forward_access.transit_node, backward_access.transit_node);
                if between >= best {
                    continue;
                }
                let to_second_hop = forward_access.distance + between;
                if to_second_hop >= best {
                    continue;
                }
                let total = to_second_hop + backward_access.distance;
                if total < best {
                    best = total;
                }
            }
        }

        best
    }
}
