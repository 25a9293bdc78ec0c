//! Scheduling Error Types
//!
//! Every failure the scheduling core can report. A missed real-time
//! execution is fatal to the current run and is never retried or skipped;
//! collaborator failures (unknown actors, causality lookups) propagate as
//! internal errors so that a timing decision is never made on partial data.

use super::actor::ActorId;
use super::time::Time;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scheduling Error
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors raised by the platform scheduler and its collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Timing violations
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// A real-time-bound event was considered after its timestamp had passed
    #[error("{actor} should have been fired at {timestamp} but physical time is already {physical_time}")]
    MissedExecution {
        /// Actor targeted by the late event
        actor: ActorId,
        /// Timestamp the actor had to fire at
        timestamp: Time,
        /// Physical time when the miss was detected
        physical_time: Time,
    },

    /// Two real-time-bound events with non-zero WCET are due at the same
    /// physical time on a single processor
    #[error("{first} and {second} both require firing at physical time {timestamp}")]
    SimultaneousDeadlines {
        /// Actor of the event ordered first
        first: ActorId,
        /// Actor of the conflicting event
        second: ActorId,
        /// Shared timestamp
        timestamp: Time,
    },

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Collaborator failures
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// The timing property provider has no entry for this actor
    #[error("Unknown actor: {0}")]
    UnknownActor(ActorId),

    /// The actor's container cannot answer causality queries
    #[error("{0} is not contained in a composite with a causality interface")]
    NoCausalityInterface(ActorId),

    /// The actor's container has a dependency cycle, so no depth exists
    #[error("Causality loop in container {container} involving {actor}")]
    CausalityLoop {
        /// Container name
        container: String,
        /// One actor on the cycle
        actor: ActorId,
    },

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Host / configuration errors
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Physical time was asked to move backwards
    #[error("Physical time cannot decrease: {requested} < {current}")]
    ClockRegression {
        /// Current physical time
        current: Time,
        /// Requested (earlier) time
        requested: Time,
    },

    /// Strategy name did not match any execution strategy
    #[error("Unknown execution strategy: {0}")]
    UnknownStrategy(String),

    /// Scenario or network description is inconsistent
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

impl SchedulingError {
    /// `true` for violations of the modeled system's timing, as opposed to
    /// lookup or configuration failures
    pub fn is_timing_violation(&self) -> bool {
        matches!(
            self,
            Self::MissedExecution { .. } | Self::SimultaneousDeadlines { .. }
        )
    }
}
