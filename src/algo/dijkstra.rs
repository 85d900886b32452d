//! Basic variant of Dijkstra's algorithm.

use super::*;
use crate::datastr::{index_heap::*, timestamped_vector::*};

/// Priority queue entries
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct State {
    pub key: Weight,
    pub node: NodeId,
}

// slightly optimized version of derived
impl std::cmp::PartialOrd for State {
    #[inline]
    fn partial_cmp(&self, rhs: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(rhs))
    }
}

// slightly optimized version of derived
impl std::cmp::Ord for State {
    #[inline]
    fn cmp(&self, rhs: &Self) -> std::cmp::Ordering {
        self.key.cmp(&rhs.key)
    }
}

impl Indexing for State {
    #[inline]
    fn as_index(&self) -> usize {
        self.node as usize
    }
}

/// Dijkstra query server on a static graph.
/// Scratch state is kept between queries to avoid allocations.
pub struct Server {
    graph: OwnedGraph,
    distances: TimestampedVector<Weight>,
    queue: IndexedMinHeap<State>,
}

impl Server {
    pub fn new(graph: OwnedGraph) -> Server {
        let n = graph.num_nodes();
        Server {
            graph,
            distances: TimestampedVector::new(n, INFINITY),
            queue: IndexedMinHeap::new(n),
        }
    }

    /// Shortest distance from `from` to `to`, `None` if they are not connected.
    pub fn distance(&mut self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.queue.clear();
        self.distances.reset();
        self.distances.set(from as usize, 0);
        self.queue.push(State { key: 0, node: from });

        while let Some(State { key, node }) = self.queue.pop() {
            if node == to {
                return Some(key);
            }

            for Link { node: head, weight } in self.graph.link_iter(node) {
                if weight >= INFINITY {
                    continue;
                }
                let next = key + weight;

                if next < self.distances[head as usize] {
                    self.distances.set(head as usize, next);

                    let next = State { key: next, node: head };
                    if self.queue.contains_index(next.as_index()) {
                        self.queue.decrease_key(next);
                    } else {
                        self.queue.push(next);
                    }
                }
            }
        }

        None
    }
}
