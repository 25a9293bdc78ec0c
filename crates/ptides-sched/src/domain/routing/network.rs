//! Track Network
//!
//! Directed graph of track nodes. Each node carries two flags that make
//! entering it more expensive; the cost of a track is charged to the node
//! it leads into.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::SchedulingError;

/// Base cost of entering a node
pub const BASE_WEIGHT: u64 = 1;

/// Extra cost of entering an occupied node
pub const OCCUPIED_PENALTY: u64 = 5;

/// Extra cost of entering a stormy (blocked) node
pub const STORMY_PENALTY: u64 = 5;

/// Track node identifier, dense in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

#[derive(Debug, Clone)]
struct TrackNode {
    name: String,
    occupied: bool,
    stormy: bool,
    successors: BTreeSet<NodeId>,
}

/// Directed track graph
#[derive(Debug, Clone, Default)]
pub struct TrackNetwork {
    nodes: Vec<TrackNode>,
    names: BTreeMap<String, NodeId>,
}

impl TrackNetwork {
    /// Create an empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with a unique name
    ///
    /// # Errors
    /// `InvalidScenario` on a duplicate name.
    pub fn add_node(&mut self, name: &str) -> Result<NodeId, SchedulingError> {
        if self.names.contains_key(name) {
            return Err(SchedulingError::InvalidScenario(format!(
                "duplicate track node '{name}'"
            )));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(TrackNode {
            name: name.to_string(),
            occupied: false,
            stormy: false,
            successors: BTreeSet::new(),
        });
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Add a directed track `from -> to`
    pub fn add_track(&mut self, from: NodeId, to: NodeId) -> Result<(), SchedulingError> {
        self.check(to)?;
        self.node_mut(from)?.successors.insert(to);
        Ok(())
    }

    /// Mark `node` occupied or free
    pub fn set_occupied(&mut self, node: NodeId, occupied: bool) -> Result<(), SchedulingError> {
        self.node_mut(node)?.occupied = occupied;
        Ok(())
    }

    /// Mark `node` stormy or clear
    pub fn set_stormy(&mut self, node: NodeId, stormy: bool) -> Result<(), SchedulingError> {
        self.node_mut(node)?.stormy = stormy;
        Ok(())
    }

    /// Node id for `name`
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Name of `node`
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check for an empty network
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` exists
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Cost of a track leading into `node`
    pub fn weight_into(&self, node: NodeId) -> Option<u64> {
        self.nodes.get(node.0).map(|n| {
            let mut weight = BASE_WEIGHT;
            if n.occupied {
                weight += OCCUPIED_PENALTY;
            }
            if n.stormy {
                weight += STORMY_PENALTY;
            }
            weight
        })
    }

    /// Successors of `node` in id order
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(node.0)
            .into_iter()
            .flat_map(|n| n.successors.iter().copied())
    }

    fn check(&self, node: NodeId) -> Result<(), SchedulingError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(SchedulingError::InvalidScenario(format!("unknown track node {node}")))
        }
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut TrackNode, SchedulingError> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| SchedulingError::InvalidScenario(format!("unknown track node {node}")))
    }
}
