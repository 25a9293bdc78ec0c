//! Execution Strategy Module
//!
//! Decides which safe-to-process event the platform fires next.
//!
//! ```text
//!   EventSet ──resolve──▶ [Candidate] ──order──▶ [Candidate] ──select──▶ Option<index>
//!                 │                        │                       │
//!        provider + oracle         strategy comparator     admission rules
//!        (may fail here)           (infallible)            (MissedExecution,
//!                                                           SimultaneousDeadlines)
//! ```
//!
//! Three strategies are provided, dispatched statically through
//! [`ExecutionStrategy`]: [`non_preemptive`], [`preemptive`] and [`edf`].
//! The deadline-driven strategy reuses the non-preemptive admission rules.

mod profile;
mod sort;

pub mod edf;
pub mod non_preemptive;
pub mod preemptive;

#[cfg(kani)]
mod proofs;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::SchedulingError;
use crate::domain::time::Time;

pub use profile::{resolve_candidates, Candidate, EventProfile};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which execution strategy a platform uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Run-to-completion
    #[default]
    #[serde(rename = "basic_non_preemptive", alias = "non_preemptive")]
    NonPreemptive,
    /// Priority-based preemption
    #[serde(rename = "basic_preemptive", alias = "preemptive")]
    Preemptive,
    /// Earliest absolute deadline first, run-to-completion
    #[serde(rename = "edf", alias = "earliest_deadline_first")]
    Edf,
}

impl StrategyKind {
    /// All strategies, in presentation order
    pub const ALL: [StrategyKind; 3] =
        [StrategyKind::NonPreemptive, StrategyKind::Preemptive, StrategyKind::Edf];

    /// Canonical configuration name
    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::NonPreemptive => "basic_non_preemptive",
            StrategyKind::Preemptive => "basic_preemptive",
            StrategyKind::Edf => "edf",
        }
    }

    /// One-line description for listings
    pub const fn summary(self) -> &'static str {
        match self {
            StrategyKind::NonPreemptive => "run-to-completion, real-time events fire at their timestamp",
            StrategyKind::Preemptive => "higher priority preempts the running actor",
            StrategyKind::Edf => "earliest absolute deadline first, run-to-completion",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "basic_non_preemptive" | "non_preemptive" | "nonpreemptive" => {
                Ok(StrategyKind::NonPreemptive)
            }
            "basic_preemptive" | "preemptive" => Ok(StrategyKind::Preemptive),
            "edf" | "earliest_deadline_first" => Ok(StrategyKind::Edf),
            _ => Err(SchedulingError::UnknownStrategy(s.to_string())),
        }
    }
}

/// What to do when two real-time events with non-zero WCET are due at the
/// same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineConflictPolicy {
    /// Report `SimultaneousDeadlines`
    #[default]
    Fail,
    /// Fire the first in order and log a warning; the other will be
    /// reported as a missed execution
    FirstInOrder,
}

/// Check the candidate at `position` against every other candidate for a
/// simultaneous real-time deadline
pub(crate) fn check_deadline_conflict(
    candidates: &[Candidate],
    position: usize,
    policy: DeadlineConflictPolicy,
    same_priority_only: bool,
) -> Result<(), SchedulingError> {
    let chosen = &candidates[position];
    let conflict = candidates.iter().enumerate().find(|(i, other)| {
        *i != position
            && chosen.profile.conflicts_with(&other.profile)
            && (!same_priority_only || other.profile.priority == chosen.profile.priority)
    });

    let Some((_, other)) = conflict else {
        return Ok(());
    };
    match policy {
        DeadlineConflictPolicy::Fail => Err(SchedulingError::SimultaneousDeadlines {
            first: chosen.event.actor(),
            second: other.event.actor(),
            timestamp: chosen.profile.timestamp,
        }),
        DeadlineConflictPolicy::FirstInOrder => {
            warn!(
                first = %chosen.event,
                second = %other.event,
                "simultaneous real-time deadlines, firing first in order"
            );
            Ok(())
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Execution Strategy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A configured execution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionStrategy {
    kind: StrategyKind,
    on_conflict: DeadlineConflictPolicy,
}

impl ExecutionStrategy {
    /// Create a strategy of `kind`
    pub const fn new(kind: StrategyKind, on_conflict: DeadlineConflictPolicy) -> Self {
        Self { kind, on_conflict }
    }

    /// Non-preemptive strategy failing on deadline conflicts
    pub const fn non_preemptive() -> Self {
        Self::new(StrategyKind::NonPreemptive, DeadlineConflictPolicy::Fail)
    }

    /// Preemptive strategy failing on deadline conflicts
    pub const fn preemptive() -> Self {
        Self::new(StrategyKind::Preemptive, DeadlineConflictPolicy::Fail)
    }

    /// Earliest-deadline-first strategy failing on deadline conflicts
    pub const fn edf() -> Self {
        Self::new(StrategyKind::Edf, DeadlineConflictPolicy::Fail)
    }

    /// Strategy kind
    pub const fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Conflict policy
    pub const fn on_conflict(&self) -> DeadlineConflictPolicy {
        self.on_conflict
    }

    /// Compare two event profiles at physical time `now`
    pub fn compare(&self, e1: &EventProfile, e2: &EventProfile, now: Time) -> Ordering {
        match self.kind {
            StrategyKind::NonPreemptive => non_preemptive::compare(e1, e2, now),
            StrategyKind::Preemptive => preemptive::compare(e1, e2, now),
            StrategyKind::Edf => edf::compare(e1, e2),
        }
    }

    /// Sort `candidates` into firing preference order
    pub fn order(&self, candidates: &mut [Candidate], now: Time) {
        sort::order_candidates(candidates, |a, b| self.compare(a, b, now));
    }

    /// Position of the candidate to fire among ordered `candidates`
    ///
    /// `running` is the profile of the actor currently executing.
    ///
    /// # Errors
    /// `MissedExecution` and `SimultaneousDeadlines`.
    pub fn select(
        &self,
        candidates: &[Candidate],
        running: Option<&EventProfile>,
        next_real_time_deadline: Time,
        now: Time,
    ) -> Result<Option<usize>, SchedulingError> {
        match self.kind {
            StrategyKind::NonPreemptive | StrategyKind::Edf => non_preemptive::select(
                candidates,
                running.is_some(),
                next_real_time_deadline,
                now,
                self.on_conflict,
            ),
            StrategyKind::Preemptive => {
                preemptive::select(candidates, running, now, self.on_conflict)
            }
        }
    }
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        Self::non_preemptive()
    }
}

impl From<StrategyKind> for ExecutionStrategy {
    fn from(kind: StrategyKind) -> Self {
        Self::new(kind, DeadlineConflictPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::profile::fixtures::*;
    use super::*;
    use crate::domain::actor::{ActorId, EventTarget};
    use crate::domain::event::{EventId, TimedEvent};

    fn candidate(id: u64, profile: EventProfile) -> Candidate {
        Candidate {
            event: TimedEvent::new(
                EventId::new(id),
                profile.timestamp,
                EventTarget::Actor(ActorId::new(id as usize)),
            ),
            profile,
        }
    }

    fn order(strategy: ExecutionStrategy, mut list: Vec<Candidate>, now: f64) -> Vec<u64> {
        strategy.order(&mut list, Time::from_secs_f64(now));
        list.iter().map(|c| c.event.id().0).collect()
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("basic_non_preemptive".parse::<StrategyKind>(), Ok(StrategyKind::NonPreemptive));
        assert_eq!("Basic-Preemptive".parse::<StrategyKind>(), Ok(StrategyKind::Preemptive));
        assert_eq!(
            "round_robin".parse::<StrategyKind>(),
            Err(SchedulingError::UnknownStrategy("round_robin".into()))
        );
        assert_eq!("Earliest-Deadline-First".parse::<StrategyKind>(), Ok(StrategyKind::Edf));
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_strategy_serde() {
        let json = serde_json::to_string(&StrategyKind::Preemptive).unwrap();
        assert_eq!(json, "\"basic_preemptive\"");
        let kind: StrategyKind = serde_json::from_str("\"non_preemptive\"").unwrap();
        assert_eq!(kind, StrategyKind::NonPreemptive);
        let kind: StrategyKind = serde_json::from_str("\"edf\"").unwrap();
        assert_eq!(kind, StrategyKind::Edf);
        let policy: DeadlineConflictPolicy = serde_json::from_str("\"first_in_order\"").unwrap();
        assert_eq!(policy, DeadlineConflictPolicy::FirstInOrder);
    }

    #[test]
    fn test_non_preemptive_reverse_topological_tie_break() {
        // Two zero-WCET non-real-time events at the same timestamp: the
        // actor at depth 5 is ordered before the actor at depth 2.
        let list = vec![
            candidate(0, at_index(profile(1.0, 0), 2)),
            candidate(1, at_index(profile(1.0, 0), 5)),
        ];
        assert_eq!(order(ExecutionStrategy::non_preemptive(), list, 0.0), vec![1, 0]);
    }

    #[test]
    fn test_preemptive_forward_topological_tie_break() {
        let list = vec![
            candidate(0, at_index(profile(1.0, 0), 5)),
            candidate(1, at_index(profile(1.0, 0), 2)),
        ];
        assert_eq!(order(ExecutionStrategy::preemptive(), list, 0.0), vec![1, 0]);
    }

    #[test]
    fn test_order_mixed_set() {
        let list = vec![
            candidate(0, profile(0.5, 10)),
            candidate(1, real_time(profile(1.0, 10))),
            candidate(2, profile(3.0, 0)),
            candidate(3, real_time(profile(2.0, 0))),
        ];
        // now = 1.0: zero-WCET free event, then the due real-time event
        // (the 10 ms non-RT event cannot finish by 1.0).
        let ids = order(ExecutionStrategy::non_preemptive(), list, 1.0);
        assert_eq!(ids[0], 2);
        assert_eq!(&ids[1..3], &[1, 0]);
    }

    #[test]
    fn test_priority_order_under_preemption() {
        let list = vec![
            candidate(0, profile(0.0, 10)),
            candidate(1, with_priority(profile(5.0, 10), 9)),
            candidate(2, with_priority(profile(1.0, 0), 4)),
        ];
        assert_eq!(order(ExecutionStrategy::preemptive(), list, 0.0), vec![1, 2, 0]);
    }

    #[test]
    fn test_select_dispatch() {
        let list = vec![candidate(0, profile(0.0, 10))];
        let now = Time::ZERO;
        let running = profile(0.0, 10);

        let np = ExecutionStrategy::non_preemptive();
        assert_eq!(np.select(&list, Some(&running), Time::POSITIVE_INFINITY, now), Ok(None));
        assert_eq!(np.select(&list, None, Time::POSITIVE_INFINITY, now), Ok(Some(0)));

        let p = ExecutionStrategy::preemptive();
        assert_eq!(p.select(&list, Some(&running), Time::POSITIVE_INFINITY, now), Ok(None));
        // The preemptive strategy ignores the deadline-overrun rule.
        assert_eq!(p.select(&list, None, Time::ZERO, now), Ok(Some(0)));
    }

    #[test]
    fn test_conflict_first_in_order_policy() {
        let list = vec![
            candidate(0, real_time(profile(1.0, 3))),
            candidate(1, real_time(profile(1.0, 3))),
        ];
        let strategy =
            ExecutionStrategy::new(StrategyKind::NonPreemptive, DeadlineConflictPolicy::FirstInOrder);
        let now = Time::from_secs_f64(1.0);
        assert_eq!(strategy.select(&list, None, Time::POSITIVE_INFINITY, now), Ok(Some(0)));
    }

    #[test]
    fn test_edf_order_ignores_real_time_binding() {
        let list = vec![
            candidate(0, real_time(profile(1.0, 10))),
            candidate(1, with_deadline(profile(3.0, 10), 100)),
            candidate(2, with_deadline(profile(2.0, 10), 2_000)),
        ];
        assert_eq!(order(ExecutionStrategy::edf(), list, 0.0), vec![1, 2, 0]);
    }

    #[test]
    fn test_edf_uses_non_preemptive_admission() {
        let list = vec![
            candidate(0, with_deadline(profile(0.0, 10), 50)),
            candidate(1, with_deadline(profile(0.0, 0), 500)),
        ];
        let running = profile(0.0, 10);
        let strategy = ExecutionStrategy::edf();
        let now = Time::ZERO;

        // Busy processor: the timed head of the order blocks the scan.
        assert_eq!(strategy.select(&list, Some(&running), Time::POSITIVE_INFINITY, now), Ok(None));
        // Deadline-overrun rule: the 10 ms event cannot finish by 5 ms.
        let mut list = list;
        strategy.order(&mut list, now);
        assert_eq!(list[0].event.id().0, 0);
        assert_eq!(
            strategy.select(&list, None, Time::from_nanos(5_000_000), now),
            Ok(Some(1))
        );
    }
}
