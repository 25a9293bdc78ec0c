//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::time::Duration;

use ptides_sched::domain::actor::{ActorId, ActorRegistry, DepthTable, EventTarget, TimingProperties};
use ptides_sched::domain::event::{EventId, TimedEvent};
use ptides_sched::domain::time::Time;

/// A registry plus explicit depths, built actor by actor
#[derive(Default)]
pub struct Platform {
    pub registry: ActorRegistry,
    pub depths: DepthTable,
    next_event: u64,
}

impl Platform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(&mut self, name: &str, properties: TimingProperties, depth: usize) -> ActorId {
        let id = self.registry.register(name, properties).unwrap();
        self.depths.set(id, depth);
        id
    }

    pub fn event(&mut self, timestamp: f64, actor: ActorId) -> TimedEvent {
        let id = EventId::new(self.next_event);
        self.next_event += 1;
        TimedEvent::new(id, secs(timestamp), EventTarget::Actor(actor))
    }
}

pub fn secs(s: f64) -> Time {
    Time::from_secs_f64(s)
}

pub fn wcet_ms(ms: u64) -> TimingProperties {
    TimingProperties::with_wcet(Duration::from_millis(ms))
}
