//! Routing Module
//!
//! Rerouting support for in-transit tokens rejected by a node: a weighted
//! track network and a cheapest-route search over it.

mod dijkstra;
mod network;

pub use dijkstra::Route;
pub use network::{NodeId, TrackNetwork, BASE_WEIGHT, OCCUPIED_PENALTY, STORMY_PENALTY};
