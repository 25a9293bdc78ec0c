//! Time Module
//!
//! ```text
//! Time            integer nanosecond ticks, exact equality
//! PhysicalClock   read-only view used by the scheduler
//! SharedClock     monotonic clock owned by the platform host
//! WakeupQueue     future instants the host must revisit
//! ```

mod backend;
mod shared_clock;
mod types;
mod wakeup;

pub use backend::PhysicalClock;
pub use shared_clock::SharedClock;
pub use types::Time;
pub use wakeup::{Wakeup, WakeupQueue, WakeupReason};
