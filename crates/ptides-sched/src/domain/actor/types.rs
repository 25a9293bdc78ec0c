//! Actor Types
//!
//! Identifiers for the actors and ports the scheduler reasons about, the
//! target of an event, and the timing properties attached to an actor.
//! Events target either an actor (pure events) or one of its input ports;
//! every downstream comparison works on the canonical `ActorId`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Actor identifier
///
/// # Example
///
/// ```rust
/// use ptides_sched::domain::actor::ActorId;
///
/// let a = ActorId::new(0);
/// let b = ActorId::new(1);
/// assert_ne!(a, b);
/// assert_eq!(a.to_string(), "Actor(0)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub usize);

impl ActorId {
    /// Create a new ActorId
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw numeric ID
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

/// Port identifier, unique within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortId(pub usize);

impl PortId {
    /// Create a new PortId
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Port({})", self.0)
    }
}

/// What an event asks to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// A pure event addressed to the actor itself
    Actor(ActorId),
    /// A token waiting on one of the actor's input ports
    Port(ActorId, PortId),
}

impl EventTarget {
    /// The actor that fires when this event is processed
    #[inline(always)]
    pub const fn actor(self) -> ActorId {
        match self {
            Self::Actor(actor) | Self::Port(actor, _) => actor,
        }
    }

    /// The port, for port-addressed events
    #[inline(always)]
    pub const fn port(self) -> Option<PortId> {
        match self {
            Self::Actor(_) => None,
            Self::Port(_, port) => Some(port),
        }
    }
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor(actor) => write!(f, "{actor}"),
            Self::Port(actor, port) => write!(f, "{actor}.{port}"),
        }
    }
}

/// Timing properties of one actor on the platform
///
/// # Invariant
/// `wcet >= 0` holds by construction (`Duration` is unsigned). A WCET of
/// zero means the actor executes instantaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingProperties {
    /// Worst-case execution time
    pub wcet: Duration,
    /// Must fire exactly when physical time equals the event timestamp
    pub fires_at_real_time: bool,
    /// Preemption priority, higher wins
    pub priority: i32,
    /// Sensor or actuator interface actor
    pub sensor_or_actuator: bool,
    /// WCET is fixed (as opposed to reconfigured at run time, e.g. by a
    /// variable-rate down-sampler)
    pub fixed_wcet: bool,
}

impl Default for TimingProperties {
    fn default() -> Self {
        Self {
            wcet: Duration::ZERO,
            fires_at_real_time: false,
            priority: 0,
            sensor_or_actuator: false,
            fixed_wcet: true,
        }
    }
}

impl TimingProperties {
    /// Properties of an actor with the given WCET, everything else default
    pub fn with_wcet(wcet: Duration) -> Self {
        Self {
            wcet,
            ..Self::default()
        }
    }

    /// Bind the actor to real time
    pub fn real_time(mut self) -> Self {
        self.fires_at_real_time = true;
        self
    }

    /// Set the preemption priority
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark as a sensor/actuator actor
    pub fn sensor_or_actuator(mut self) -> Self {
        self.sensor_or_actuator = true;
        self
    }

    /// Mark the WCET as reconfigurable at run time
    pub fn reconfigurable_wcet(mut self) -> Self {
        self.fixed_wcet = false;
        self
    }

    /// Check for an instantaneous actor
    #[inline(always)]
    pub fn is_instantaneous(&self) -> bool {
        self.wcet.is_zero()
    }
}

/// Per-port settings that refine the owning actor's timing properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortTiming {
    /// `Some(flag)` overrides the actor's real-time binding, `None` inherits it
    pub real_time: Option<bool>,
    /// Deadline of an event arriving here, relative to its timestamp
    pub relative_deadline: Option<Duration>,
}

impl PortTiming {
    /// Port with a real-time override and no deadline
    pub fn real_time(real_time: Option<bool>) -> Self {
        Self {
            real_time,
            ..Self::default()
        }
    }

    /// Set the relative deadline
    pub fn deadline(mut self, relative_deadline: Duration) -> Self {
        self.relative_deadline = Some(relative_deadline);
        self
    }
}
