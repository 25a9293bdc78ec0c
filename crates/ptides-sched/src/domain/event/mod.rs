//! Event Module
//!
//! Time-stamped firing requests and the two collections the scheduler
//! reads: the safe-to-fire set and the stack of actors in execution.

mod collections;
mod deadline;
mod types;

pub use collections::{ActorsFiring, EventSet};
pub use deadline::next_real_time_deadline;
pub use types::{EventId, EventIdGenerator, TimedEvent};
