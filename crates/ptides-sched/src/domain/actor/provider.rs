//! Collaborator Contracts
//!
//! The two questions the scheduler asks about actors it does not own:
//! how long and how urgently does this actor run, and where does it sit
//! in its container's causal order.

use std::time::Duration;

use super::types::{ActorId, EventTarget, TimingProperties};
use crate::domain::error::SchedulingError;

/// Source of per-actor timing properties
pub trait TimingPropertyProvider {
    /// Timing properties of `actor`
    ///
    /// # Errors
    /// `UnknownActor` if the provider has no entry for `actor`.
    fn properties(&self, actor: ActorId) -> Result<TimingProperties, SchedulingError>;

    /// Whether an event for `target` must fire at real time equal to its
    /// timestamp. Port-level settings may override the actor's.
    fn must_fire_at_real_time(&self, target: EventTarget) -> Result<bool, SchedulingError> {
        self.properties(target.actor()).map(|p| p.fires_at_real_time)
    }

    /// Deadline of an event for `target`, relative to its timestamp
    ///
    /// `None` when the target carries no deadline.
    fn relative_deadline(&self, target: EventTarget) -> Result<Option<Duration>, SchedulingError> {
        self.properties(target.actor()).map(|_| None)
    }
}

/// Topological depth of an actor within its immediate composite container
pub trait CausalityOracle {
    /// Total-order index of `actor` in its container (0 = first)
    ///
    /// # Errors
    /// `NoCausalityInterface` or `CausalityLoop` when no depth exists.
    fn topological_depth(&self, actor: ActorId) -> Result<usize, SchedulingError>;
}

impl<T: TimingPropertyProvider + ?Sized> TimingPropertyProvider for &T {
    fn properties(&self, actor: ActorId) -> Result<TimingProperties, SchedulingError> {
        (**self).properties(actor)
    }

    fn must_fire_at_real_time(&self, target: EventTarget) -> Result<bool, SchedulingError> {
        (**self).must_fire_at_real_time(target)
    }

    fn relative_deadline(&self, target: EventTarget) -> Result<Option<Duration>, SchedulingError> {
        (**self).relative_deadline(target)
    }
}

impl<T: CausalityOracle + ?Sized> CausalityOracle for &T {
    fn topological_depth(&self, actor: ActorId) -> Result<usize, SchedulingError> {
        (**self).topological_depth(actor)
    }
}
