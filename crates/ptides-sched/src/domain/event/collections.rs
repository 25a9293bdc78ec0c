//! Event Collections
//!
//! `EventSet` holds the events currently known to be safe to fire;
//! `ActorsFiring` holds the events whose actors occupy the processor.
//! Both are owned by the platform host and lent to the scheduler for one
//! decision at a time.

use super::types::{EventId, TimedEvent};

/// Events that are safe to fire, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSet {
    events: Vec<TimedEvent>,
}

impl EventSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event. Returns `false` (and leaves the set unchanged) if an
    /// event with the same id is already present.
    pub fn insert(&mut self, event: TimedEvent) -> bool {
        if self.contains(event.id()) {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Remove and return the event with `id`
    pub fn remove(&mut self, id: EventId) -> Option<TimedEvent> {
        let index = self.events.iter().position(|e| e.id() == id)?;
        Some(self.events.remove(index))
    }

    /// Check for an event id
    pub fn contains(&self, id: EventId) -> bool {
        self.events.iter().any(|e| e.id() == id)
    }

    /// Events in insertion order
    pub fn as_slice(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, TimedEvent> {
        self.events.iter()
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<TimedEvent> for EventSet {
    fn from_iter<I: IntoIterator<Item = TimedEvent>>(iter: I) -> Self {
        let mut set = Self::new();
        for event in iter {
            set.insert(event);
        }
        set
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = &'a TimedEvent;
    type IntoIter = std::slice::Iter<'a, TimedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Events in execution on the single platform processor
///
/// Stack discipline: the last entry is the running actor, entries below it
/// are suspended (preemptive platform only).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorsFiring {
    stack: Vec<TimedEvent>,
}

impl ActorsFiring {
    /// Create an idle processor
    pub fn new() -> Self {
        Self::default()
    }

    /// Start executing `event`, suspending the current one
    pub fn push(&mut self, event: TimedEvent) {
        self.stack.push(event);
    }

    /// Finish the running event
    pub fn pop(&mut self) -> Option<TimedEvent> {
        self.stack.pop()
    }

    /// The running event
    pub fn running(&self) -> Option<&TimedEvent> {
        self.stack.last()
    }

    /// The earliest-started event still in execution
    pub fn first(&self) -> Option<&TimedEvent> {
        self.stack.first()
    }

    /// Iterate from bottom (earliest started) to top (running)
    pub fn iter(&self) -> std::slice::Iter<'_, TimedEvent> {
        self.stack.iter()
    }

    /// Number of events in execution
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Check if the processor is idle
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl FromIterator<TimedEvent> for ActorsFiring {
    fn from_iter<I: IntoIterator<Item = TimedEvent>>(iter: I) -> Self {
        Self {
            stack: iter.into_iter().collect(),
        }
    }
}
