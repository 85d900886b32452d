//! Derived view of the separator tree used for locality classification.
//!
//! One walk over the decomposition assigns each vertex (by rank) the tree node
//! whose separator contains it, and each tree node its depth and parent.
//! The depth of a vertex's node is its level: smaller means closer to the root.

use crate::datastr::{graph::NodeId, separator_decomposition::SeparatorDecomposition};

#[derive(Debug)]
pub struct SeparatorHierarchy {
    // rank -> tree node whose separator contains the vertex
    separator_node: Vec<u32>,
    // tree node -> parent. The root is its own parent.
    parent: Vec<u32>,
    // tree node -> depth, root has depth 0
    depth: Vec<u32>,
    // rank -> depth of the containing tree node
    level: Vec<u32>,
}

impl SeparatorHierarchy {
    pub fn new(decomp: &SeparatorDecomposition) -> Self {
        let n = decomp.num_vertices();
        let num_tree_nodes = decomp.num_tree_nodes();

        let unassigned = num_tree_nodes as u32;
        let mut separator_node = vec![unassigned; n];
        let mut parent = vec![0; num_tree_nodes];
        let mut depth = vec![0; num_tree_nodes];
        let mut level = vec![0; n];

        let mut stack = vec![(0u32, 0u32)];
        while let Some((node, node_depth)) = stack.pop() {
            depth[node as usize] = node_depth;
            for position in decomp.separator_range(node) {
                debug_assert_eq!(separator_node[position], unassigned, "separator ranges overlap");
                separator_node[position] = node;
                level[position] = node_depth;
            }
            for child in decomp.children(node) {
                parent[child as usize] = node;
                stack.push((child, node_depth + 1));
            }
        }

        assert!(
            separator_node.iter().all(|&node| node < unassigned),
            "separator ranges do not cover all vertices"
        );

        SeparatorHierarchy {
            separator_node,
            parent,
            depth,
            level,
        }
    }

    /// Tree node whose separator contains the vertex with the given rank.
    pub fn separator_node(&self, rank: NodeId) -> u32 {
        self.separator_node[rank as usize]
    }

    pub fn node_depth(&self, node: u32) -> u32 {
        self.depth[node as usize]
    }

    /// Depth of the separator node containing the vertex with the given rank.
    pub fn level(&self, rank: NodeId) -> u32 {
        self.level[rank as usize]
    }

    pub fn levels(&self) -> &[u32] {
        &self.level
    }

    /// Lowest common ancestor of the separator nodes of two vertices given by rank.
    pub fn lowest_common_separator_ancestor(&self, a: NodeId, b: NodeId) -> u32 {
        let mut a = self.separator_node(a);
        let mut b = self.separator_node(b);

        while a != b {
            if self.depth[a as usize] >= self.depth[b as usize] {
                a = self.parent[a as usize];
            } else {
                b = self.parent[b as usize];
            }
        }

        a
    }

    pub fn size_in_bytes(&self) -> usize {
        use std::mem::size_of;
        self.separator_node.len() * size_of::<u32>()
            + self.parent.len() * size_of::<u32>()
            + self.depth.len() * size_of::<u32>()
            + self.level.len() * size_of::<u32>()
    }
}
