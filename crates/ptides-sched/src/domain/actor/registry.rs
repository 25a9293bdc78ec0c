//! Actor Registry
//!
//! In-memory `TimingPropertyProvider` for a platform's actors.
//!
//! # Storage
//!
//! ```text
//! ActorRegistry
//!   ├─ actors: DashMap<ActorId, ActorEntry>   (properties + port timing)
//!   ├─ names:  DashMap<String, ActorId>       (name lookup)
//!   └─ ports:  DashMap<PortId, ActorId>       (port ownership)
//! ```
//!
//! Lookups never iterate the maps, so hash order cannot leak into a
//! scheduling decision.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::provider::TimingPropertyProvider;
use super::types::{ActorId, EventTarget, PortId, PortTiming, TimingProperties};
use crate::domain::error::SchedulingError;

#[derive(Debug, Clone)]
struct ActorEntry {
    name: String,
    properties: TimingProperties,
    ports: HashMap<PortId, PortTiming>,
}

/// Registry of actors and their timing properties
///
/// # Example
///
/// ```rust
/// use ptides_sched::domain::actor::{ActorRegistry, TimingProperties, TimingPropertyProvider};
/// use std::time::Duration;
///
/// let registry = ActorRegistry::new();
/// let filter = registry
///     .register("filter", TimingProperties::with_wcet(Duration::from_millis(2)))
///     .unwrap();
/// assert_eq!(registry.lookup("filter"), Some(filter));
/// assert_eq!(registry.properties(filter).unwrap().wcet, Duration::from_millis(2));
/// ```
#[derive(Debug, Default)]
pub struct ActorRegistry {
    actors: DashMap<ActorId, ActorEntry>,
    names: DashMap<String, ActorId>,
    ports: DashMap<PortId, ActorId>,
    next_actor: AtomicUsize,
    next_port: AtomicUsize,
}

impl ActorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new actor under a unique name
    ///
    /// # Errors
    /// `InvalidScenario` if the name is already taken.
    pub fn register(
        &self,
        name: &str,
        properties: TimingProperties,
    ) -> Result<ActorId, SchedulingError> {
        // The name shard stays locked until the actor entry exists.
        match self.names.entry(name.to_string()) {
            Entry::Occupied(_) => Err(SchedulingError::InvalidScenario(format!(
                "duplicate actor name '{name}'"
            ))),
            Entry::Vacant(slot) => {
                let id = ActorId::new(self.next_actor.fetch_add(1, Ordering::Relaxed));
                self.actors.insert(
                    id,
                    ActorEntry {
                        name: name.to_string(),
                        properties,
                        ports: HashMap::new(),
                    },
                );
                slot.insert(id);
                Ok(id)
            }
        }
    }

    /// Add an input port to `actor`
    ///
    /// `real_time` overrides the actor's real-time binding for events that
    /// arrive on this port; `None` inherits the actor's setting.
    pub fn add_port(
        &self,
        actor: ActorId,
        real_time: Option<bool>,
    ) -> Result<PortId, SchedulingError> {
        self.add_port_with(actor, PortTiming::real_time(real_time))
    }

    /// Add an input port to `actor` with full port timing
    pub fn add_port_with(
        &self,
        actor: ActorId,
        timing: PortTiming,
    ) -> Result<PortId, SchedulingError> {
        let mut entry = self
            .actors
            .get_mut(&actor)
            .ok_or(SchedulingError::UnknownActor(actor))?;
        let port = PortId::new(self.next_port.fetch_add(1, Ordering::Relaxed));
        entry.ports.insert(port, timing);
        self.ports.insert(port, actor);
        Ok(port)
    }

    /// Replace the timing properties of `actor`
    pub fn update(
        &self,
        actor: ActorId,
        properties: TimingProperties,
    ) -> Result<(), SchedulingError> {
        let mut entry = self
            .actors
            .get_mut(&actor)
            .ok_or(SchedulingError::UnknownActor(actor))?;
        entry.properties = properties;
        Ok(())
    }

    /// Find an actor by name
    pub fn lookup(&self, name: &str) -> Option<ActorId> {
        self.names.get(name).map(|id| *id)
    }

    /// Name of `actor`
    pub fn name(&self, actor: ActorId) -> Option<String> {
        self.actors.get(&actor).map(|entry| entry.name.clone())
    }

    /// Actor owning `port`
    pub fn port_owner(&self, port: PortId) -> Option<ActorId> {
        self.ports.get(&port).map(|owner| *owner)
    }

    /// Number of registered actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Check if no actor is registered
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl TimingPropertyProvider for ActorRegistry {
    fn properties(&self, actor: ActorId) -> Result<TimingProperties, SchedulingError> {
        self.actors
            .get(&actor)
            .map(|entry| entry.properties)
            .ok_or(SchedulingError::UnknownActor(actor))
    }

    fn must_fire_at_real_time(&self, target: EventTarget) -> Result<bool, SchedulingError> {
        let actor = target.actor();
        let entry = self
            .actors
            .get(&actor)
            .ok_or(SchedulingError::UnknownActor(actor))?;
        let port_override = target
            .port()
            .and_then(|port| entry.ports.get(&port))
            .and_then(|timing| timing.real_time);
        Ok(port_override.unwrap_or(entry.properties.fires_at_real_time))
    }

    fn relative_deadline(&self, target: EventTarget) -> Result<Option<Duration>, SchedulingError> {
        let actor = target.actor();
        let entry = self
            .actors
            .get(&actor)
            .ok_or(SchedulingError::UnknownActor(actor))?;
        Ok(target
            .port()
            .and_then(|port| entry.ports.get(&port))
            .and_then(|timing| timing.relative_deadline))
    }
}
