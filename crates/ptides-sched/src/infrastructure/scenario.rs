//! Scenario and Network Files
//!
//! JSON descriptions of a platform run and of a track network.
//!
//! ```json
//! {
//!   "platform": { "strategy": "basic_preemptive" },
//!   "actors": [
//!     { "name": "sensor", "wcet": 0.0, "sensor_or_actuator": true },
//!     { "name": "ctrl", "wcet": 0.004, "priority": 1,
//!       "ports": [ { "name": "in", "real_time": true, "relative_deadline": 0.01 } ] }
//!   ],
//!   "connections": [ ["sensor", "ctrl"] ],
//!   "events": [ { "actor": "ctrl", "port": "in", "timestamp": 1.0, "safe_at": 0.8 } ]
//! }
//! ```
//!
//! Times are seconds. An event without `safe_at` is safe from time zero.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::PlatformConfig;
use crate::domain::actor::{
    ActorId, ActorRegistry, ContainerGraph, EventTarget, PortId, PortTiming, TimingProperties,
};
use crate::domain::error::SchedulingError;
use crate::domain::event::{EventIdGenerator, TimedEvent};
use crate::domain::listener::ScheduleListener;
use crate::domain::routing::TrackNetwork;
use crate::domain::scheduler::PlatformScheduler;
use crate::domain::simulation::PlatformSimulator;
use crate::domain::time::Time;

const DEFAULT_CONTAINER: &str = "platform";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// File formats
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Scenario file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Platform configuration
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Actors on the platform
    #[serde(default)]
    pub actors: Vec<ActorSpec>,
    /// Dependencies `[from, to]` by actor name
    #[serde(default)]
    pub connections: Vec<(String, String)>,
    /// Events to release
    #[serde(default)]
    pub events: Vec<EventSpec>,
}

/// One actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSpec {
    /// Unique name
    pub name: String,
    /// Immediate container
    #[serde(default = "default_container")]
    pub container: String,
    /// WCET in seconds
    #[serde(default)]
    pub wcet: f64,
    /// Fires at real time equal to the event timestamp
    #[serde(default)]
    pub real_time: bool,
    /// Preemption priority
    #[serde(default)]
    pub priority: i32,
    /// Sensor or actuator
    #[serde(default)]
    pub sensor_or_actuator: bool,
    /// WCET may be reconfigured at run time
    #[serde(default)]
    pub reconfigurable_wcet: bool,
    /// Input ports
    #[serde(default)]
    pub ports: Vec<PortSpec>,
}

/// One input port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortSpec {
    /// Name, unique per actor
    pub name: String,
    /// Real-time override; inherits the actor's setting if absent
    #[serde(default)]
    pub real_time: Option<bool>,
    /// Deadline in seconds after the event timestamp
    #[serde(default)]
    pub relative_deadline: Option<f64>,
}

/// One event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSpec {
    /// Target actor name
    pub actor: String,
    /// Target port name
    #[serde(default)]
    pub port: Option<String>,
    /// Timestamp in seconds
    pub timestamp: Time,
    /// Physical time the event becomes safe to process
    #[serde(default)]
    pub safe_at: Time,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

/// Network file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Track nodes
    pub nodes: Vec<NodeSpec>,
    /// Directed tracks `[from, to]` by node name
    #[serde(default)]
    pub tracks: Vec<(String, String)>,
}

/// One track node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique name
    pub name: String,
    /// Occupied by a token
    #[serde(default)]
    pub occupied: bool,
    /// Stormy or blocked
    #[serde(default)]
    pub stormy: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Loading
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn read(path: &Path) -> Result<String, SchedulingError> {
    std::fs::read_to_string(path)
        .map_err(|e| SchedulingError::InvalidScenario(format!("cannot read {}: {e}", path.display())))
}

fn invalid(message: impl Into<String>) -> SchedulingError {
    SchedulingError::InvalidScenario(message.into())
}

/// A scenario resolved into domain objects
#[derive(Debug)]
pub struct Scenario {
    /// Platform configuration
    pub platform: PlatformConfig,
    /// Actor timing properties
    pub registry: ActorRegistry,
    /// Container causality
    pub graph: ContainerGraph,
    /// Events with the physical time they become safe to process
    pub releases: Vec<(TimedEvent, Time)>,
}

impl Scenario {
    /// Load a scenario file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchedulingError> {
        Self::from_json(&read(path.as_ref())?)
    }

    /// Parse a scenario from JSON text
    pub fn from_json(text: &str) -> Result<Self, SchedulingError> {
        let spec: ScenarioSpec =
            serde_json::from_str(text).map_err(|e| invalid(format!("scenario: {e}")))?;
        Self::build(spec)
    }

    /// Resolve names and validate a parsed scenario
    pub fn build(spec: ScenarioSpec) -> Result<Self, SchedulingError> {
        let registry = ActorRegistry::new();
        let mut graph = ContainerGraph::new();
        let mut ports: HashMap<(ActorId, String), PortId> = HashMap::new();

        for actor in &spec.actors {
            let wcet = Duration::try_from_secs_f64(actor.wcet)
                .map_err(|e| invalid(format!("actor '{}': wcet {}: {e}", actor.name, actor.wcet)))?;
            let mut properties = TimingProperties::with_wcet(wcet).priority(actor.priority);
            if actor.real_time {
                properties = properties.real_time();
            }
            if actor.sensor_or_actuator {
                properties = properties.sensor_or_actuator();
            }
            if actor.reconfigurable_wcet {
                properties = properties.reconfigurable_wcet();
            }

            let id = registry.register(&actor.name, properties)?;
            graph.add_actor(&actor.container, id);
            for port in &actor.ports {
                let mut timing = PortTiming::real_time(port.real_time);
                if let Some(secs) = port.relative_deadline {
                    let deadline = Duration::try_from_secs_f64(secs).map_err(|e| {
                        invalid(format!(
                            "port '{}.{}': relative_deadline {secs}: {e}",
                            actor.name, port.name
                        ))
                    })?;
                    timing = timing.deadline(deadline);
                }
                let port_id = registry.add_port_with(id, timing)?;
                if ports.insert((id, port.name.clone()), port_id).is_some() {
                    return Err(invalid(format!(
                        "actor '{}': duplicate port '{}'",
                        actor.name, port.name
                    )));
                }
            }
        }

        let actor_named = |name: &str| {
            registry
                .lookup(name)
                .ok_or_else(|| invalid(format!("unknown actor '{name}'")))
        };

        for (from, to) in &spec.connections {
            graph.connect(actor_named(from)?, actor_named(to)?)?;
        }

        let ids = EventIdGenerator::new();
        let mut releases = Vec::with_capacity(spec.events.len());
        for event in &spec.events {
            let actor = actor_named(&event.actor)?;
            let target = match &event.port {
                None => EventTarget::Actor(actor),
                Some(name) => {
                    let port = ports.get(&(actor, name.clone())).ok_or_else(|| {
                        invalid(format!("actor '{}' has no port '{name}'", event.actor))
                    })?;
                    EventTarget::Port(actor, *port)
                }
            };
            if event.timestamp.is_infinite() {
                return Err(invalid(format!("event for '{}' has no finite timestamp", event.actor)));
            }
            releases.push((TimedEvent::new(ids.next_id(), event.timestamp, target), event.safe_at));
        }

        debug!(
            actors = registry.len(),
            events = releases.len(),
            "scenario loaded"
        );
        Ok(Self {
            platform: spec.platform,
            registry,
            graph,
            releases,
        })
    }

    /// Build a simulator with every event scheduled
    pub fn into_simulator<L: ScheduleListener>(
        self,
        listener: L,
    ) -> PlatformSimulator<ActorRegistry, ContainerGraph, L> {
        let scheduler = PlatformScheduler::new(
            self.platform.execution_strategy(),
            self.registry,
            self.graph,
            listener,
        );
        let mut simulator = PlatformSimulator::new(scheduler, self.platform.limits());
        for (event, safe_at) in self.releases {
            simulator.schedule(event, safe_at);
        }
        simulator
    }
}

/// Load a track network file
pub fn load_network(path: impl AsRef<Path>) -> Result<TrackNetwork, SchedulingError> {
    parse_network(&read(path.as_ref())?)
}

/// Parse a track network from JSON text
pub fn parse_network(text: &str) -> Result<TrackNetwork, SchedulingError> {
    let spec: NetworkSpec =
        serde_json::from_str(text).map_err(|e| invalid(format!("network: {e}")))?;

    let mut network = TrackNetwork::new();
    for node in &spec.nodes {
        let id = network.add_node(&node.name)?;
        network.set_occupied(id, node.occupied)?;
        network.set_stormy(id, node.stormy)?;
    }
    for (from, to) in &spec.tracks {
        let lookup = |name: &str| {
            network
                .lookup(name)
                .ok_or_else(|| invalid(format!("unknown track node '{name}'")))
        };
        let (from, to) = (lookup(from)?, lookup(to)?);
        network.add_track(from, to)?;
    }
    Ok(network)
}
