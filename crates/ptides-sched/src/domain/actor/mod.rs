//! Actor Module
//!
//! The scheduler's view of the actor graph: identifiers, event targets,
//! timing properties, and the two collaborator contracts
//! (`TimingPropertyProvider`, `CausalityOracle`) with in-memory
//! implementations.

mod causality;
mod provider;
mod registry;
mod types;

pub use causality::{ContainerGraph, DepthTable};
pub use provider::{CausalityOracle, TimingPropertyProvider};
pub use registry::ActorRegistry;
pub use types::{ActorId, EventTarget, PortId, PortTiming, TimingProperties};
