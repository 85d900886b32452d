//! Second phase of CCH preprocessing: metric dependent customization.

use super::*;

/// Customize the CCH with a new metric.
/// `metric` contains one weight for each arc of the original graph, keyed by original arc id.
pub fn customize<'c>(cch: &'c CCH, metric: &[Weight]) -> Customized<'c> {
    assert_eq!(metric.len(), cch.num_original_arcs());

    let n = cch.num_nodes();
    let m = cch.num_arcs();

    let mut upward_weights = vec![INFINITY; m];
    let mut downward_weights = vec![INFINITY; m];

    // respecting phase: copy metric weights to their respective chordal arcs.
    // Parallel original arcs map to the same chordal arc, so take the minimum.
    report_time("CCH apply weights", || {
        for (edge, &weight) in metric.iter().enumerate() {
            if let Some(up_arc) = cch.orig_arc_to_upward_arc[edge].value() {
                let up = &mut upward_weights[up_arc as usize];
                *up = std::cmp::min(*up, weight);
            }
            if let Some(down_arc) = cch.orig_arc_to_downward_arc[edge].value() {
                let down = &mut downward_weights[down_arc as usize];
                *down = std::cmp::min(*down, weight);
            }
        }
    });

    // relax lower triangles bottom up.
    // When node `c` is processed, all arcs out of `c` are final: every triangle
    // below them has a lower vertex smaller than `c` and was already handled.
    report_time("CCH customization", || {
        // workspace mapping upward neighbor -> weight of the connecting arcs of the current node
        let mut node_outgoing_weights = vec![INFINITY; n];
        let mut node_incoming_weights = vec![INFINITY; n];

        for current_node in 0..n as NodeId {
            let edges = cch.neighbor_edge_indices_usize(current_node);
            for (node, edge) in cch.neighbor_iter(current_node).zip(edges.clone()) {
                node_outgoing_weights[node as usize] = upward_weights[edge];
                node_incoming_weights[node as usize] = downward_weights[edge];
            }

            // for each pair of upward neighbors `a`, `b` of the current node with an arc `a -> b`,
            // the triangle offers the paths a -> current -> b and b -> current -> a
            for (a, edge_to_a) in cch.neighbor_iter(current_node).zip(edges.clone()) {
                let down_from_a = downward_weights[edge_to_a];
                let up_to_a = upward_weights[edge_to_a];

                for (b, arc_a_b) in cch.neighbor_iter(a).zip(cch.neighbor_edge_indices_usize(a)) {
                    // no arc current -> b leaves the workspace at INFINITY and the relaxation without effect
                    let up = &mut upward_weights[arc_a_b];
                    *up = std::cmp::min(*up, down_from_a + node_outgoing_weights[b as usize]);
                    let down = &mut downward_weights[arc_a_b];
                    *down = std::cmp::min(*down, node_incoming_weights[b as usize] + up_to_a);
                }
            }

            for node in cch.neighbor_iter(current_node) {
                node_outgoing_weights[node as usize] = INFINITY;
                node_incoming_weights[node as usize] = INFINITY;
            }
        }
    });

    Customized {
        cch,
        upward: upward_weights,
        downward: downward_weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::customizable_contraction_hierarchy::contract;

    #[test]
    fn customizing_a_path_fills_the_shortcut() {
        // path 0 - 1 - 2 - 3 - 4 with unit weights in both directions
        let graph = OwnedGraph::new(vec![0, 1, 3, 5, 7, 8], vec![1, 0, 2, 1, 3, 2, 4, 3], vec![1; 8]);
        let cch = contract(&graph, NodeOrder::from_node_order(vec![0, 1, 3, 4, 2]));
        let customized = customize(&cch, graph.weight());

        // orig arcs map onto the chordal arcs 0->1, 1->4, 2->3, 2->4 with weight 1 in both directions
        for (rank, neighbor) in [(0, 1), (1, 4), (2, 3), (2, 4)] {
            let arc = cch.edge_index(rank, neighbor).unwrap() as usize;
            assert_eq!(customized.upward()[arc], 1);
            assert_eq!(customized.downward()[arc], 1);
        }

        // the shortcut 3->4 (vertex 4 to vertex 2) goes over vertex 3 in both directions
        let shortcut = cch.edge_index(3, 4).unwrap() as usize;
        assert_eq!(customized.upward()[shortcut], 2);
        assert_eq!(customized.downward()[shortcut], 2);
    }

    #[test]
    fn infinity_weights_saturate() {
        let graph = OwnedGraph::new(vec![0, 1, 3, 5, 7, 8], vec![1, 0, 2, 1, 3, 2, 4, 3], vec![1; 8]);
        let cch = contract(&graph, NodeOrder::from_node_order(vec![0, 1, 3, 4, 2]));

        // cut the path between 3 and 4 in both directions
        let mut metric = vec![1; 8];
        metric[6] = INFINITY; // 3 -> 4
        metric[7] = INFINITY; // 4 -> 3
        let customized = customize(&cch, &metric);

        let shortcut = cch.edge_index(3, 4).unwrap() as usize;
        assert!(customized.upward()[shortcut] >= INFINITY);
        assert!(customized.downward()[shortcut] >= INFINITY);
    }
}
