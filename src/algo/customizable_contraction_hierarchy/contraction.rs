//! First phase of CCH preprocessing: chordal completion of the input graph.
//!
//! Chordal completion for a fixed elimination order only needs neighborhood
//! merging: when a node is contracted, its remaining neighborhood is merged
//! into the neighborhood of its lowest ranked upward neighbor.

use super::*;
use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

// During contraction, nodes are represented as sorted Vecs of higher ranked neighbors.
#[derive(Debug)]
pub(super) struct Node {
    pub(super) edges: Vec<NodeId>,
}

impl Node {
    // Merges the neighborhood of another node into this node.
    // Efficient because neighborhoods are stored sorted.
    fn merge_neighbors(&mut self, others: &[NodeId]) {
        let mut new_edges = Vec::with_capacity(self.edges.len() + others.len());

        // coordinated linear sweep over both sorted neighborhoods
        let mut self_iter = self.edges.iter().peekable();
        let mut other_iter = others.iter().peekable();

        loop {
            match (self_iter.peek(), other_iter.peek()) {
                (Some(&&self_neighbor), Some(&&other_neighbor)) => match self_neighbor.cmp(&other_neighbor) {
                    Ordering::Less => {
                        new_edges.push(self_neighbor);
                        self_iter.next();
                    }
                    Ordering::Greater => {
                        new_edges.push(other_neighbor);
                        other_iter.next();
                    }
                    Ordering::Equal => {
                        new_edges.push(self_neighbor);
                        self_iter.next();
                        other_iter.next();
                    }
                },
                (Some(&&neighbor), None) => {
                    new_edges.push(neighbor);
                    self_iter.next();
                }
                (None, Some(&&neighbor)) => {
                    new_edges.push(neighbor);
                    other_iter.next();
                }
                _ => break,
            }
        }

        self.edges = new_edges;
    }
}

#[derive(Debug)]
pub struct ContractionGraph<'a, Graph> {
    pub(super) nodes: Vec<Node>,
    pub(super) node_order: NodeOrder,
    pub(super) original_graph: &'a Graph,
}

impl<'a, Graph: LinkIterGraph> ContractionGraph<'a, Graph> {
    /// Preprocessing preparation: translate node ids to ranks, drop loops,
    /// make the graph undirected and keep only upward arcs.
    pub fn new(graph: &'a Graph, node_order: NodeOrder) -> ContractionGraph<'a, Graph> {
        let n = graph.num_nodes() as NodeId;

        let mut neighborhoods: Vec<Vec<NodeId>> = (0..n).map(|_| Vec::new()).collect();
        for rank in 0..n {
            let node = node_order.node(rank);
            for link in graph.link_iter(node) {
                if link.node == node {
                    continue;
                }
                let head_rank = node_order.rank(link.node);
                neighborhoods[rank as usize].push(head_rank);
                neighborhoods[head_rank as usize].push(rank);
            }
        }

        let nodes = neighborhoods
            .into_iter()
            .enumerate()
            .map(|(rank, mut edges)| {
                edges.retain(|&neighbor| neighbor > rank as NodeId); // remove down arcs
                edges.sort_unstable();
                edges.dedup();
                Node { edges }
            })
            .collect();

        ContractionGraph {
            nodes,
            node_order,
            original_graph: graph,
        }
    }

    /// Main preprocessing work: chordal completion.
    pub fn contract(mut self) -> ContractedGraph<'a, Graph> {
        // We utilize split borrows to make node contraction work well with rusts borrowing rules.
        // The nodes are stored in order of increasing rank.
        // We iteratively split off the lowest ranked node - the one contracted next.
        // Contraction does not mutate the current node,
        // but inserts shortcuts between nodes of higher rank.
        let mut graph = self.partial_graph();

        while let Some((node, mut subgraph)) = graph.remove_lowest() {
            // the lowest ranked neighbor is always the first, since neighborhoods are sorted
            if let Some((&lowest_neighbor, other_neighbors)) = node.edges.split_first() {
                // merging the remaining neighborhood into the neighborhood of the lowest
                // ranked neighbor is all it takes to complete the graph chordally
                subgraph[lowest_neighbor as usize].merge_neighbors(other_neighbors);
            }

            graph = subgraph;
        }

        ContractedGraph(self)
    }

    fn partial_graph(&mut self) -> PartialContractionGraph {
        PartialContractionGraph {
            nodes: &mut self.nodes[..],
            id_offset: 0,
        }
    }
}

// a struct to keep track of the partial graphs during contraction
#[derive(Debug)]
struct PartialContractionGraph<'a> {
    // the nodes in the partial graph
    nodes: &'a mut [Node],
    // slice indices always start at zero, but we need to index by rank,
    // so we remember the number of nodes already contracted
    id_offset: NodeId,
}

impl<'a> PartialContractionGraph<'a> {
    fn remove_lowest(self) -> Option<(&'a Node, PartialContractionGraph<'a>)> {
        let (node, other_nodes) = self.nodes.split_first_mut()?;
        let subgraph = PartialContractionGraph {
            nodes: other_nodes,
            id_offset: self.id_offset + 1,
        };
        Some((node, subgraph))
    }
}

impl<'a> Index<usize> for PartialContractionGraph<'a> {
    type Output = Node;

    fn index(&self, idx: usize) -> &Node {
        &self.nodes[idx - self.id_offset as usize]
    }
}

impl<'a> IndexMut<usize> for PartialContractionGraph<'a> {
    fn index_mut(&mut self, idx: usize) -> &mut Node {
        &mut self.nodes[idx - self.id_offset as usize]
    }
}

/// Phase one result: the chordal supergraph as upward adjacency lists.
#[derive(Debug)]
pub struct ContractedGraph<'a, Graph>(ContractionGraph<'a, Graph>);

impl<'a, Graph> ContractedGraph<'a, Graph> {
    pub(super) fn decompose(self) -> (Vec<EdgeId>, Vec<NodeId>, NodeOrder, &'a Graph) {
        let ContractedGraph(ContractionGraph {
            nodes,
            node_order,
            original_graph,
        }) = self;

        let first_out = degrees_to_first_out(nodes.iter().map(|node| node.edges.len() as EdgeId)).collect();
        let head = nodes.into_iter().flat_map(|node| node.edges.into_iter()).collect();

        (first_out, head, node_order, original_graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contracting_a_path_with_separator_order() {
        // path 0 - 1 - 2 - 3 - 4, nested dissection order [0, 1, 3, 4, 2]
        let graph = OwnedGraph::new(
            vec![0, 1, 3, 5, 7, 8],
            vec![1, 0, 2, 1, 3, 2, 4, 3],
            vec![1; 8],
        );
        let order = NodeOrder::from_node_order(vec![0, 1, 3, 4, 2]);

        let (first_out, head, _, _) = ContractionGraph::new(&graph, order).contract().decompose();

        // ranks:  0 -> vertex 0, 1 -> vertex 1, 2 -> vertex 3, 3 -> vertex 4, 4 -> vertex 2
        // upward arcs: 0 -> 1, 1 -> 4, 2 -> { 3, 4 }, plus shortcut 3 -> 4
        assert_eq!(first_out, vec![0, 1, 2, 4, 5, 5]);
        assert_eq!(head, vec![1, 4, 3, 4, 4]);
    }
}
