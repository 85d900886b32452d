//! CCH query based on elimination trees.
//!
//! The search space of a node is exactly its path to the root of the
//! elimination tree. Both search spaces are relaxed bottom up and the
//! tentative distance is the minimum over the common ancestors.

use super::*;

/// Elimination tree path to root traversal while relaxing edges.
#[derive(Debug)]
pub struct EliminationTreeWalk<'a> {
    graph: BorrowedGraph<'a>,
    elimination_tree: &'a [InRangeOption<NodeId>],
    distances: &'a mut [Weight],
    next: Option<NodeId>,
}

impl<'a> EliminationTreeWalk<'a> {
    pub fn query(graph: BorrowedGraph<'a>, elimination_tree: &'a [InRangeOption<NodeId>], distances: &'a mut [Weight], from: NodeId) -> Self {
        // the walk only ever writes to nodes on the path to the root,
        // so resetting that path makes the scratch data valid, no matter
        // what older queries left behind
        let mut node = from;
        while let Some(parent) = elimination_tree[node as usize].value() {
            distances[parent as usize] = INFINITY;
            node = parent;
        }
        distances[from as usize] = 0;

        Self {
            graph,
            elimination_tree,
            distances,
            next: Some(from),
        }
    }

    fn settle_next_node(&mut self) -> Option<NodeId> {
        // examine the next node on the path to the root
        let node = self.next?;
        let distance = self.distances[node as usize];
        self.next = self.elimination_tree[node as usize].value();

        // relax all outgoing arcs - their heads are ancestors of the node
        for Link { node: head, weight } in self.graph.link_iter(node) {
            if distance + weight < self.distances[head as usize] {
                self.distances[head as usize] = distance + weight;
            }
        }

        Some(node)
    }

    pub fn peek(&self) -> Option<NodeId> {
        self.next
    }

    pub fn tentative_distance(&self, node: NodeId) -> Weight {
        self.distances[node as usize]
    }
}

impl Iterator for EliminationTreeWalk<'_> {
    type Item = NodeId;
    fn next(&mut self) -> Option<Self::Item> {
        self.settle_next_node()
    }
}

/// Run an elimination tree walk to completion,
/// leaving valid tentative distances on the whole path to the root.
pub(crate) fn relax_root_path(graph: BorrowedGraph, elimination_tree: &[InRangeOption<NodeId>], distances: &mut [Weight], from: NodeId) {
    let mut walk = EliminationTreeWalk::query(graph, elimination_tree, distances, from);
    while walk.next().is_some() {}
}

/// Combine forward and backward tentative distances over the common ancestors of two nodes.
/// Only distances of common ancestors may be combined: each array is only
/// valid on the root path of its own source.
pub(crate) fn combine_on_common_ancestors(
    elimination_tree: &[InRangeOption<NodeId>],
    fw_distances: &[Weight],
    bw_distances: &[Weight],
    from: NodeId,
    to: NodeId,
) -> Weight {
    // ascend to the lowest common ancestor - parents always have higher ranks
    let mut fw_cur = from;
    let mut bw_cur = to;
    while fw_cur != bw_cur {
        let lower = if fw_cur < bw_cur { &mut fw_cur } else { &mut bw_cur };
        match elimination_tree[*lower as usize].value() {
            Some(parent) => *lower = parent,
            // different trees of the elimination forest - not connected
            None => return INFINITY,
        }
    }

    let mut tentative_distance = INFINITY;
    let mut meeting_node = Some(fw_cur);
    while let Some(node) = meeting_node {
        let distance = fw_distances[node as usize] + bw_distances[node as usize];
        if distance < tentative_distance {
            tentative_distance = distance;
        }
        meeting_node = elimination_tree[node as usize].value();
    }

    tentative_distance
}

/// Distance between two nodes given by rank, `INFINITY` if not connected.
pub(crate) fn rank_distance(customized: &Customized, fw_distances: &mut [Weight], bw_distances: &mut [Weight], from: NodeId, to: NodeId) -> Weight {
    let elimination_tree = customized.cch().elimination_tree();
    relax_root_path(customized.forward_graph(), elimination_tree, fw_distances, from);
    relax_root_path(customized.backward_graph(), elimination_tree, bw_distances, to);
    combine_on_common_ancestors(elimination_tree, fw_distances, bw_distances, from, to)
}

/// CCH query server. Takes node ids of the original graph.
pub struct Server<'a> {
    customized: Customized<'a>,
    fw_distances: Vec<Weight>,
    bw_distances: Vec<Weight>,
}

impl<'a> Server<'a> {
    pub fn new(customized: Customized<'a>) -> Self {
        let n = customized.cch().num_nodes();
        Server {
            customized,
            fw_distances: vec![INFINITY; n],
            bw_distances: vec![INFINITY; n],
        }
    }

    /// Update the metric using a new customization result
    pub fn update(&mut self, customized: Customized<'a>) {
        self.customized = customized;
    }

    pub fn customized(&self) -> &Customized<'a> {
        &self.customized
    }

    /// Shortest distance from `from` to `to`, `None` if they are not connected.
    pub fn distance(&mut self, from: NodeId, to: NodeId) -> Option<Weight> {
        let from = self.customized.cch().node_order().rank(from);
        let to = self.customized.cch().node_order().rank(to);

        match rank_distance(&self.customized, &mut self.fw_distances, &mut self.bw_distances, from, to) {
            INFINITY => None,
            dist => Some(dist),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::customizable_contraction_hierarchy::{contract, customize};

    #[test]
    fn elimination_tree_query_on_directed_fixture() {
        //
        //                  7
        //          +-----------------+
        //          |                 |
        //          v   1        2    |  2
        //          0 -----> 1 -----> 3 ---> 4
        //          |        ^        ^      ^
        //          |        | 1      |      |
        //          |        |        | 3    | 1
        //          +------> 2 -------+      |
        //           10      |               |
        //                   +---------------+
        //
        let graph = OwnedGraph::new(vec![0, 2, 3, 6, 8, 8, 8], vec![2, 1, 3, 1, 3, 4, 0, 4], vec![10, 1, 2, 1, 3, 1, 7, 2]);
        let cch = contract(&graph, NodeOrder::identity(6));
        let mut server = Server::new(customize(&cch, graph.weight()));

        assert_eq!(server.distance(0, 1), Some(1));
        assert_eq!(server.distance(0, 3), Some(3));
        assert_eq!(server.distance(3, 0), Some(7));
        assert_eq!(server.distance(0, 4), Some(5));
        assert_eq!(server.distance(4, 0), None);
        assert_eq!(server.distance(5, 5), Some(0));
    }

    #[test]
    fn path_distances_with_separator_order() {
        let graph = OwnedGraph::new(vec![0, 1, 3, 5, 7, 8], vec![1, 0, 2, 1, 3, 2, 4, 3], vec![1; 8]);
        let cch = contract(&graph, NodeOrder::from_node_order(vec![0, 1, 3, 4, 2]));
        let mut server = Server::new(customize(&cch, graph.weight()));

        for from in 0..5 {
            for to in 0..5 {
                let expected = (from as i64 - to as i64).unsigned_abs() as Weight;
                assert_eq!(server.distance(from, to), Some(expected));
            }
        }
    }
}
