//! Nested dissection separator decompositions.
//!
//! A separator decomposition is a rooted tree whose nodes carry disjoint vertex
//! sets covering the whole graph: each node holds a separator which recursively
//! splits the cell it was computed for, leaves hold the remaining cell vertices.
//! The companion order lays the vertices out so that the subtree of every tree
//! node occupies a consecutive range of positions with the node's own separator
//! vertices at the top. That makes the order a valid nested dissection
//! contraction order, so position in the order doubles as CCH rank.

use crate::datastr::{graph::NodeId, node_order::NodeOrder};

/// A node of the separator tree.
/// Child and sibling ids of `0` denote absence - node `0` is always the root.
/// `[first_separator_vertex, last_separator_vertex)` is a half open range of
/// positions in the companion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorTreeNode {
    pub left_child: u32,
    pub right_sibling: u32,
    pub first_separator_vertex: u32,
    pub last_separator_vertex: u32,
}

/// A rooted separator tree together with the vertex order it was computed with.
#[derive(Debug, Clone)]
pub struct SeparatorDecomposition {
    tree: Vec<SeparatorTreeNode>,
    order: NodeOrder,
}

impl SeparatorDecomposition {
    pub fn new(tree: Vec<SeparatorTreeNode>, order: NodeOrder) -> Self {
        assert!(!tree.is_empty());
        let n = order.len() as u32;
        for node in &tree {
            assert!(node.first_separator_vertex <= node.last_separator_vertex);
            assert!(node.last_separator_vertex <= n);
            assert!((node.left_child as usize) < tree.len());
            assert!((node.right_sibling as usize) < tree.len());
        }
        SeparatorDecomposition { tree, order }
    }

    pub fn num_tree_nodes(&self) -> usize {
        self.tree.len()
    }

    pub fn num_vertices(&self) -> usize {
        self.order.len()
    }

    pub fn order(&self) -> &NodeOrder {
        &self.order
    }

    /// Positions in the order covered by the separator of the given tree node.
    pub fn separator_range(&self, node: u32) -> std::ops::Range<usize> {
        let node = &self.tree[node as usize];
        (node.first_separator_vertex as usize)..(node.last_separator_vertex as usize)
    }

    /// Original ids of the separator vertices of the given tree node.
    pub fn separator_vertices(&self, node: u32) -> impl Iterator<Item = NodeId> + '_ {
        self.separator_range(node).map(move |position| self.order.node(position as NodeId))
    }

    /// Iterator over the children of a tree node, in left to right order.
    pub fn children(&self, node: u32) -> impl Iterator<Item = u32> + '_ {
        let first = self.tree[node as usize].left_child;
        std::iter::successors(if first == 0 { None } else { Some(first) }, move |&child| {
            let sibling = self.tree[child as usize].right_sibling;
            if sibling == 0 {
                None
            } else {
                Some(sibling)
            }
        })
    }

    /// A 64bit fingerprint over the tree shape and the order.
    /// Stored with serialized indices to validate that a loaded index
    /// belongs to this decomposition.
    pub fn fingerprint(&self) -> u64 {
        // FNV-1a
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |value: u32| {
            for byte in value.to_le_bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x100_0000_01b3);
            }
        };

        mix(self.order.len() as u32);
        mix(self.tree.len() as u32);
        for node in &self.tree {
            mix(node.left_child);
            mix(node.right_sibling);
            mix(node.first_separator_vertex);
            mix(node.last_separator_vertex);
        }
        for &node in self.order.order() {
            mix(node);
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_decomposition() -> SeparatorDecomposition {
        // path 0 - 1 - 2 - 3 - 4, root separator { 2 }, cells { 0, 1 } and { 3, 4 }
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
    fn children_and_separators() {
        let decomp = path_decomposition();
        assert_eq!(decomp.children(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(decomp.children(1).count(), 0);
        assert_eq!(decomp.separator_vertices(0).collect::<Vec<_>>(), vec![2]);
        assert_eq!(decomp.separator_vertices(1).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(decomp.separator_vertices(2).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn fingerprint_is_stable_and_discriminates() {
        let decomp = path_decomposition();
        assert_eq!(decomp.fingerprint(), path_decomposition().fingerprint());

        let other = SeparatorDecomposition::new(
            vec![SeparatorTreeNode {
                left_child: 0,
                right_sibling: 0,
                first_separator_vertex: 0,
                last_separator_vertex: 5,
            }],
            NodeOrder::identity(5),
        );
        assert_ne!(decomp.fingerprint(), other.fingerprint());
    }
}
