//! Access node computation and dominance pruning.
//!
//! The forward access nodes of a vertex are the transit nodes reachable from it
//! through upward arcs only, each with the minimal distance over such paths.
//! Backward access nodes are the analogue for downward paths towards the vertex.
//! Both sets are computed in one sweep over the ranks from the top of the
//! hierarchy downwards: when a vertex is processed, the sets of all its upward
//! neighbors are final, and its own set is the minimum over first-arc
//! decompositions, seeded with the vertex itself if it is a transit node.

use super::*;
use crate::datastr::timestamped_vector::TimestampedVector;

/// One access node: a transit node (as position in the level sorted transit
/// node sequence) and the distance to or from the vertex it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessNode {
    pub transit_node: u32,
    pub distance: Weight,
}

/// Flattened level sorted access node lists of all vertices, indexed by rank.
#[derive(Debug, PartialEq)]
pub struct AccessNodes {
    first_out: Vec<u32>,
    transit_nodes: Vec<u32>,
    distances: Vec<Weight>,
}

impl AccessNodes {
    pub(super) fn from_lists(lists: &[Vec<AccessNode>]) -> Self {
        let mut first_out = Vec::with_capacity(lists.len() + 1);
        first_out.push(0);
        let mut transit_nodes = Vec::new();
        let mut distances = Vec::new();

        for list in lists {
            for access_node in list {
                transit_nodes.push(access_node.transit_node);
                distances.push(access_node.distance);
            }
            first_out.push(transit_nodes.len() as u32);
        }

        AccessNodes {
            first_out,
            transit_nodes,
            distances,
        }
    }

    pub(super) fn from_parts(first_out: Vec<u32>, transit_nodes: Vec<u32>, distances: Vec<Weight>) -> Self {
        assert_eq!(transit_nodes.len(), distances.len());
        assert_eq!(*first_out.last().unwrap() as usize, transit_nodes.len());
        AccessNodes {
            first_out,
            transit_nodes,
            distances,
        }
    }

    /// Access nodes of the vertex with the given rank, sorted by transit node
    /// position, that is by level with deterministic tie breaking.
    pub fn of(&self, rank: NodeId) -> impl Iterator<Item = AccessNode> + '_ {
        let range = (self.first_out[rank as usize] as usize)..(self.first_out[rank as usize + 1] as usize);
        self.transit_nodes[range.clone()]
            .iter()
            .zip(self.distances[range].iter())
            .map(|(&transit_node, &distance)| AccessNode { transit_node, distance })
    }

    pub fn num_entries(&self) -> usize {
        self.transit_nodes.len()
    }

    pub(super) fn first_out(&self) -> &Vec<u32> {
        &self.first_out
    }

    pub(super) fn transit_nodes(&self) -> &Vec<u32> {
        &self.transit_nodes
    }

    pub(super) fn distances(&self) -> &Vec<Weight> {
        &self.distances
    }

    pub fn size_in_bytes(&self) -> usize {
        use std::mem::size_of;
        self.first_out.len() * size_of::<u32>() + self.transit_nodes.len() * size_of::<u32>() + self.distances.len() * size_of::<Weight>()
    }
}

/// Compute unpruned forward and backward access node lists for all vertices.
pub(super) fn compute_access_nodes(index: &TransitNodeRouting, metric: &Customized) -> (Vec<Vec<AccessNode>>, Vec<Vec<AccessNode>>) {
    let cch = metric.cch();
    let n = cch.num_nodes();
    let num_transit_nodes = index.transit_nodes().len();

    let mut forward: Vec<Vec<AccessNode>> = (0..n).map(|_| Vec::new()).collect();
    let mut backward: Vec<Vec<AccessNode>> = (0..n).map(|_| Vec::new()).collect();

    // scratch mapping transit node position -> best distance seen so far.
    // Dense because the transit node set is small, timestamped so resets are O(1).
    let mut forward_scratch = Scratch::new(num_transit_nodes);
    let mut backward_scratch = Scratch::new(num_transit_nodes);

    // top of the hierarchy first - upward neighbors always have higher ranks,
    // so their access nodes are final when a vertex is processed
    for rank in (0..n as NodeId).rev() {
        forward_scratch.clear();
        backward_scratch.clear();

        // a transit node is an access node of itself on both sides
        if let Some(position) = index.transit_node_position_of_rank(rank) {
            forward_scratch.relax(position, 0);
            backward_scratch.relax(position, 0);
        }

        for (head, arc) in cch.neighbor_iter(rank).zip(cch.neighbor_edge_indices_usize(rank)) {
            let up_weight = metric.upward()[arc];
            if up_weight < INFINITY {
                for access_node in &forward[head as usize] {
                    forward_scratch.relax(access_node.transit_node, access_node.distance + up_weight);
                }
            }

            let down_weight = metric.downward()[arc];
            if down_weight < INFINITY {
                for access_node in &backward[head as usize] {
                    backward_scratch.relax(access_node.transit_node, access_node.distance + down_weight);
                }
            }
        }

        forward[rank as usize] = forward_scratch.to_sorted_list();
        backward[rank as usize] = backward_scratch.to_sorted_list();
    }

    (forward, backward)
}

struct Scratch {
    distances: TimestampedVector<Weight>,
    touched: Vec<u32>,
}

impl Scratch {
    fn new(num_transit_nodes: usize) -> Self {
        Scratch {
            distances: TimestampedVector::new(num_transit_nodes, INFINITY),
            touched: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.distances.reset();
        self.touched.clear();
    }

    fn relax(&mut self, transit_node: u32, distance: Weight) {
        // saturating: never record an unreachable combination as finite
        if distance >= INFINITY {
            return;
        }
        let current = self.distances[transit_node as usize];
        if distance < current {
            if current == INFINITY {
                self.touched.push(transit_node);
            }
            self.distances.set(transit_node as usize, distance);
        }
    }

    fn to_sorted_list(&mut self) -> Vec<AccessNode> {
        self.touched.sort_unstable();
        self.touched
            .iter()
            .map(|&transit_node| AccessNode {
                transit_node,
                distance: self.distances[transit_node as usize],
            })
            .collect()
    }
}

/// Remove dominated access nodes.
///
/// An access node is dominated if routing through another access node of the
/// same list is never worse. For forward lists the replacement path is
/// `v -> a_i -> a_j`, for backward lists `a_j -> a_i -> v`, so the sides probe
/// the transit node table in opposite directions. Ties keep the entry closer
/// to the root, which makes the surviving set a deterministic function of the
/// level sorted input.
pub(super) fn prune_dominated(lists: &mut [Vec<AccessNode>], table: &TransitNodeDistances, forward: bool) {
    let mut keep = Vec::new();

    for list in lists.iter_mut() {
        keep.clear();
        keep.resize(list.len(), true);

        for i in 0..list.len() {
            if !keep[i] {
                continue;
            }
            for j in 0..list.len() {
                if i == j || !keep[j] {
                    continue;
                }
                let between = if forward {
                    table.get(list[i].transit_node, list[j].transit_node)
                } else {
                    table.get(list[j].transit_node, list[i].transit_node)
                };
                if between < INFINITY && list[i].distance + between <= list[j].distance {
                    keep[j] = false;
                }
            }
        }

        let mut index = 0;
        list.retain(|_| {
            let keep_entry = keep[index];
            index += 1;
            keep_entry
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(num: usize, entries: &[(u32, u32, Weight)]) -> TransitNodeDistances {
        let mut distances = vec![INFINITY; num * num];
        for i in 0..num {
            distances[i * num + i] = 0;
        }
        for &(from, to, weight) in entries {
            distances[from as usize * num + to as usize] = weight;
        }
        TransitNodeDistances::from_parts(num, distances)
    }

    #[test]
    fn forward_pruning_uses_table_in_list_order() {
        let table = make_table(2, &[(0, 1, 3)]);
        let mut lists = vec![vec![
            AccessNode { transit_node: 0, distance: 2 },
            AccessNode { transit_node: 1, distance: 5 },
        ]];

        // 2 + D[0][1] = 5 <= 5 dominates the second entry
        prune_dominated(&mut lists, &table, true);
        assert_eq!(lists[0], vec![AccessNode { transit_node: 0, distance: 2 }]);
    }

    #[test]
    fn backward_pruning_uses_reversed_table_direction() {
        // distances towards the vertex: a_j -> a_i -> v needs D[j][i]
        let table = make_table(2, &[(1, 0, 3)]);
        let mut lists = vec![vec![
            AccessNode { transit_node: 0, distance: 2 },
            AccessNode { transit_node: 1, distance: 5 },
        ]];

        prune_dominated(&mut lists, &table, false);
        assert_eq!(lists[0], vec![AccessNode { transit_node: 0, distance: 2 }]);

        // with the opposite direction present nothing may be pruned
        let table = make_table(2, &[(0, 1, 3)]);
        let mut lists = vec![vec![
            AccessNode { transit_node: 0, distance: 2 },
            AccessNode { transit_node: 1, distance: 5 },
        ]];
        prune_dominated(&mut lists, &table, false);
        assert_eq!(lists[0].len(), 2);
    }

    #[test]
    fn equi_dominant_entries_keep_the_earlier_one() {
        // both entries dominate each other through zero cost table entries
        let table = TransitNodeDistances::from_parts(2, vec![0; 4]);
        let mut lists = vec![vec![
            AccessNode { transit_node: 0, distance: 4 },
            AccessNode { transit_node: 1, distance: 4 },
        ]];

        prune_dominated(&mut lists, &table, true);
        assert_eq!(lists[0], vec![AccessNode { transit_node: 0, distance: 4 }]);
    }
}
