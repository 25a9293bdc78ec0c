//! Event Types

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::actor::{ActorId, EventTarget};
use crate::domain::time::Time;

/// Unique event identifier
///
/// Ids are allocated in creation order and double as the last tie-break
/// when ordering events, the same way the clock queue falls back on
/// event ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl EventId {
    /// Create a new EventId
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

/// Allocates event ids in increasing order
#[derive(Debug, Default)]
pub struct EventIdGenerator {
    next: Cell<u64>,
}

impl EventIdGenerator {
    /// Start at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused id
    pub fn next_id(&self) -> EventId {
        let id = self.next.get();
        self.next.set(id + 1);
        EventId::new(id)
    }
}

/// One pending firing request
///
/// The timestamp is fixed at creation. An event maps to exactly one firing
/// of its target actor; once selected it is removed from the pending set
/// and cannot be selected again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimedEvent {
    id: EventId,
    timestamp: Time,
    target: EventTarget,
}

impl TimedEvent {
    /// Create an event
    pub const fn new(id: EventId, timestamp: Time, target: EventTarget) -> Self {
        Self {
            id,
            timestamp,
            target,
        }
    }

    /// Event id
    #[inline(always)]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Model timestamp
    #[inline(always)]
    pub const fn timestamp(&self) -> Time {
        self.timestamp
    }

    /// Actor or port addressed
    #[inline(always)]
    pub const fn target(&self) -> EventTarget {
        self.target
    }

    /// Actor that fires for this event
    #[inline(always)]
    pub const fn actor(&self) -> ActorId {
        self.target.actor()
    }
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} -> {}", self.id, self.timestamp, self.target)
    }
}
