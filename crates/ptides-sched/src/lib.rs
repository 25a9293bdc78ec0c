//! PTIDES Platform Scheduling Core
//!
//! # Overview
//!
//! `ptides-sched` decides which safe-to-process event a single platform
//! processor fires next. Events carry a model-time timestamp; actors carry
//! a worst-case execution time (WCET), a real-time binding, a priority and
//! a topological position in their container. A real-time-bound event
//! must start exactly at physical time equal to its timestamp, and being
//! late is a fatal `MissedExecution`.
//!
//! # Trinity Architecture
//!
//! - **Domain**: time, actors, events, strategies, scheduler, simulator,
//!   routing
//! - **Infrastructure**: JSON configuration and scenario loading
//! - **Adapters**: schedule listeners (tracing, recording)
//!
//! # Usage
//!
//! ```rust
//! use ptides_sched::adapters::RecordingListener;
//! use ptides_sched::domain::ScheduleEventType;
//! use ptides_sched::infrastructure::Scenario;
//!
//! let scenario = Scenario::from_json(r#"{
//!     "actors": [{ "name": "act", "wcet": 0.001, "real_time": true }],
//!     "events": [{ "actor": "act", "timestamp": 2.0 }]
//! }"#).unwrap();
//!
//! let recorder = RecordingListener::new();
//! let report = scenario.into_simulator(recorder.clone()).run().unwrap();
//!
//! assert_eq!(report.firings.len(), 1);
//! assert_eq!(recorder.of_kind(ScheduleEventType::Start).len(), 1);
//! ```
//!
//! # Feature Flags
//!
//! - `cfg(kani)`: bounded proofs of the comparator properties

#![warn(missing_docs)]
#![warn(clippy::all)]

// Trinity Architecture Layers
pub mod adapters;
pub mod domain;
pub mod infrastructure;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use domain::{
    ActorId, ActorsFiring, EventId, EventSet, EventTarget, ExecutionStrategy, PlatformScheduler,
    PlatformSimulator, SchedulingError, StrategyKind, Time, TimedEvent, TimingProperties,
};
pub use infrastructure::{PlatformConfig, Scenario};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_strategy_is_non_preemptive() {
        assert_eq!(PlatformConfig::default().strategy, StrategyKind::NonPreemptive);
        assert_eq!(ExecutionStrategy::default().kind(), StrategyKind::NonPreemptive);
    }
}
