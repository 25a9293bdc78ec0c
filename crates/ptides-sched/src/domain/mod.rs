//! Domain Layer
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Time Module                   Actor Module                 │
//! │  ├─ Time (ns ticks)            ├─ ActorRegistry (DashMap)   │
//! │  ├─ SharedClock                ├─ ContainerGraph            │
//! │  └─ WakeupQueue                └─ Provider / Oracle traits  │
//! │                                                             │
//! │  Event Module                  Strategy Module              │
//! │  ├─ TimedEvent, EventSet       ├─ non_preemptive            │
//! │  ├─ ActorsFiring               ├─ preemptive                │
//! │  └─ next_real_time_deadline    ├─ edf                       │
//! │                                └─ ExecutionStrategy         │
//! │                                                             │
//! │            PlatformScheduler<P, O, L>                       │
//! │            PlatformSimulator<P, O, L>                       │
//! │                                                             │
//! │  Routing Module: TrackNetwork + shortest_path               │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collaborators (`P`: timing properties, `O`: causality, `L`: listener)
//! are generic parameters, so the scheduler is monomorphized for each host.

pub mod actor;
pub mod error;
pub mod event;
pub mod listener;
pub mod routing;
pub mod scheduler;
pub mod simulation;
pub mod strategy;
pub mod time;

pub use actor::{
    ActorId, ActorRegistry, CausalityOracle, ContainerGraph, DepthTable, EventTarget, PortId,
    PortTiming, TimingProperties, TimingPropertyProvider,
};
pub use error::SchedulingError;
pub use event::{next_real_time_deadline, ActorsFiring, EventId, EventSet, TimedEvent};
pub use listener::{NullListener, ScheduleEventType, ScheduleListener};
pub use routing::{NodeId, Route, TrackNetwork};
pub use scheduler::PlatformScheduler;
pub use simulation::{FiringRecord, PlatformSimulator, SimulationLimits, SimulationReport};
pub use strategy::{DeadlineConflictPolicy, EventProfile, ExecutionStrategy, StrategyKind};
pub use time::{PhysicalClock, SharedClock, Time};
