//! Shortest Route Search
//!
//! Dijkstra over a [`TrackNetwork`]. The unsettled node with the smallest
//! `(distance, id)` is settled next, so equal-cost routes resolve the same
//! way on every run.
//!
//! Invariant at termination, for every settled node `u` and successor `v`:
//! `distance[v] <= distance[u] + weight_into(v)`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::network::{NodeId, TrackNetwork};

/// A route through the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Nodes from source to destination, inclusive
    pub nodes: Vec<NodeId>,
    /// Summed weight of the tracks taken
    pub cost: u64,
}

impl Route {
    /// Number of tracks taken
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

impl TrackNetwork {
    /// Cheapest route from `source` to `dest`
    ///
    /// `None` when either node is unknown or `dest` is unreachable.
    pub fn shortest_path(&self, source: NodeId, dest: NodeId) -> Option<Route> {
        if !self.contains(source) || !self.contains(dest) {
            return None;
        }

        let mut settled: BTreeSet<NodeId> = BTreeSet::new();
        let mut unsettled: BTreeSet<(u64, NodeId)> = BTreeSet::new();
        let mut distance: BTreeMap<NodeId, u64> = BTreeMap::new();
        let mut predecessor: BTreeMap<NodeId, NodeId> = BTreeMap::new();

        distance.insert(source, 0);
        unsettled.insert((0, source));

        while let Some((dist, node)) = unsettled.pop_first() {
            if !settled.insert(node) {
                continue;
            }
            if node == dest {
                break;
            }
            for next in self.successors(node) {
                if settled.contains(&next) {
                    continue;
                }
                let Some(weight) = self.weight_into(next) else {
                    continue;
                };
                let candidate = dist.saturating_add(weight);
                let known = distance.get(&next).copied();
                if known.is_some_and(|known| known <= candidate) {
                    continue;
                }
                if let Some(old) = known {
                    unsettled.remove(&(old, next));
                }
                distance.insert(next, candidate);
                predecessor.insert(next, node);
                unsettled.insert((candidate, next));
            }
        }

        let cost = *distance.get(&dest)?;
        let mut nodes = vec![dest];
        let mut cursor = dest;
        while let Some(&prev) = predecessor.get(&cursor) {
            nodes.push(prev);
            cursor = prev;
        }
        nodes.reverse();
        Some(Route { nodes, cost })
    }
}
