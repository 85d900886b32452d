//! Goto static graph representation for route planning algorithms.
//!
//! Nodes and edges are identified by consecutive ids starting at `0`.
//! The graph is stored as an adjacency array using three collections:
//! `first_out` with `n + 1` elements, `head` and `weight` with `m` elements each.
//! `head[first_out[x]..first_out[x+1]]` contains the neighbors of node `x`.

use super::*;

/// Container struct for the three collections of a graph.
/// Generic over the types of the three data collections.
/// Anything that can be dereferenced to a slice works,
/// so both owned (`Vec<T>`, `Box<[T]>`) and borrowed (slices) data is possible.
#[derive(Debug, Clone)]
pub struct FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer> {
    // index of first edge of each node +1 entry in the end
    first_out: FirstOutContainer,
    // the node ids to which each edge points
    head: HeadContainer,
    // the weight of each edge
    weight: WeightContainer,
}

pub type OwnedGraph = FirstOutGraph<Vec<EdgeId>, Vec<NodeId>, Vec<Weight>>;
pub type BorrowedGraph<'a> = FirstOutGraph<&'a [EdgeId], &'a [NodeId], &'a [Weight]>;

impl<FirstOutContainer, HeadContainer, WeightContainer> FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    /// Create a new `FirstOutGraph` from the three containers.
    pub fn new(first_out: FirstOutContainer, head: HeadContainer, weight: WeightContainer) -> Self {
        assert!(first_out.as_ref().len() < NodeId::MAX as usize);
        assert!(head.as_ref().len() < EdgeId::MAX as usize);
        assert_eq!(*first_out.as_ref().first().unwrap(), 0);
        assert_eq!(*first_out.as_ref().last().unwrap() as usize, head.as_ref().len());
        assert_eq!(weight.as_ref().len(), head.as_ref().len());

        Self { first_out, head, weight }
    }

    /// Borrow a slice of the first_out data
    pub fn first_out(&self) -> &[EdgeId] {
        self.first_out.as_ref()
    }
    /// Borrow a slice of the head data
    pub fn head(&self) -> &[NodeId] {
        self.head.as_ref()
    }
    /// Borrow a slice of the weight data
    pub fn weight(&self) -> &[Weight] {
        self.weight.as_ref()
    }

    pub fn borrowed(&self) -> BorrowedGraph {
        FirstOutGraph {
            first_out: self.first_out(),
            head: self.head(),
            weight: self.weight(),
        }
    }
}

impl OwnedGraph {
    pub fn from_adjacency_lists(adjacency_lists: Vec<Vec<Link>>) -> OwnedGraph {
        // create first_out array by doing a prefix sum over the adjacency list sizes
        let first_out = {
            let degrees = adjacency_lists.iter().map(|neighbors| neighbors.len() as EdgeId);
            degrees_to_first_out(degrees).collect()
        };

        // append all adjacency lists and split the pairs into two separate vectors
        let (head, weight) = adjacency_lists
            .into_iter()
            .flat_map(|neighbors| neighbors.into_iter().map(|Link { node, weight }| (node, weight)))
            .unzip();

        OwnedGraph::new(first_out, head, weight)
    }
}

/// Turn an iterator of node degrees into an iterator over the entries of a `first_out` array.
pub fn degrees_to_first_out(degrees: impl Iterator<Item = EdgeId>) -> impl Iterator<Item = EdgeId> {
    std::iter::once(0).chain(degrees.scan(0, |state, degree| {
        *state += degree;
        Some(*state)
    }))
}

impl<FirstOutContainer, HeadContainer, WeightContainer> Graph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    fn num_nodes(&self) -> usize {
        self.first_out().len() - 1
    }

    fn num_arcs(&self) -> usize {
        self.head().len()
    }

    fn degree(&self, node: NodeId) -> usize {
        let node = node as usize;
        (self.first_out()[node + 1] - self.first_out()[node]) as usize
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> LinkIterGraph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    #[inline]
    fn link_iter(&self, node: NodeId) -> impl Iterator<Item = Link> + '_ {
        let range = self.neighbor_edge_indices_usize(node);
        self.head()[range.clone()]
            .iter()
            .zip(self.weight()[range].iter())
            .map(|(&neighbor, &weight)| Link { node: neighbor, weight })
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> RandomLinkAccessGraph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    fn link(&self, edge_id: EdgeId) -> Link {
        Link {
            node: self.head()[edge_id as usize],
            weight: self.weight()[edge_id as usize],
        }
    }

    fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId> {
        (self.first_out()[node as usize])..(self.first_out()[(node + 1) as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversal() {
        let graph = OwnedGraph::new(vec![0, 2, 3, 6, 8, 8, 8], vec![2, 1, 3, 1, 3, 4, 0, 4], vec![10, 1, 2, 1, 3, 1, 7, 2]);

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
        let expected = OwnedGraph::new(vec![0, 1, 3, 4, 6, 8, 8], vec![3, 0, 2, 0, 1, 2, 2, 3], vec![7, 1, 1, 10, 2, 3, 1, 2]);
        let reversed = graph.reverse();

        assert_eq!(reversed.first_out(), expected.first_out());
        assert_eq!(reversed.head(), expected.head());
        assert_eq!(reversed.weight(), expected.weight());
    }
}
