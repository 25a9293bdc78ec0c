//! Basic Preemptive Execution
//!
//! A ready event may start while another actor is executing if it has
//! zero WCET and is real-time-bound, if it is due now and the running
//! actor is not real-time-bound, or if its actor has strictly higher
//! priority.

use std::cmp::Ordering;

use tracing::debug;

use super::profile::{Candidate, EventProfile};
use super::{check_deadline_conflict, DeadlineConflictPolicy};
use crate::domain::error::SchedulingError;
use crate::domain::time::Time;

/// Order `e1` against `e2` at physical time `now`
///
/// Priority dominates. Within a priority, zero-WCET events that are free
/// now come first; two zero-WCET events prefer fixed WCET, then ascending
/// topological index. Everything else orders by timestamp.
pub fn compare(e1: &EventProfile, e2: &EventProfile, now: Time) -> Ordering {
    if e1.priority != e2.priority {
        return e2.priority.cmp(&e1.priority);
    }

    let (zero1, zero2) = (e1.is_instantaneous(), e2.is_instantaneous());
    if e1.is_free_now(now) && !zero2 {
        return Ordering::Less;
    }
    if e2.is_free_now(now) && !zero1 {
        return Ordering::Greater;
    }

    if zero1 && zero2 {
        return match (e1.fixed_wcet, e2.fixed_wcet) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => e1.topological_index.cmp(&e2.topological_index),
        };
    }

    match (e1.real_time, e2.real_time) {
        (true, true) => e1.timestamp.cmp(&e2.timestamp),
        (false, false) => e1
            .timestamp
            .cmp(&e2.timestamp)
            .then_with(|| e1.topological_index.cmp(&e2.topological_index)),
        // Mixed: timestamp, then the real-time event, then depth.
        _ => e1
            .timestamp
            .cmp(&e2.timestamp)
            .then_with(|| e2.real_time.cmp(&e1.real_time))
            .then_with(|| e1.topological_index.cmp(&e2.topological_index)),
    }
}

/// Whether `candidate` may start while `running` is executing
pub fn preempts(candidate: &EventProfile, running: &EventProfile, now: Time) -> bool {
    (candidate.real_time && candidate.is_instantaneous())
        || (!running.real_time && candidate.real_time && candidate.timestamp == now)
        || candidate.priority > running.priority
}

/// Walk the ordered `candidates` and return the position of the event to
/// fire, if any
///
/// `running` is the profile of the actor currently executing, if any.
///
/// # Errors
/// `MissedExecution` for the first real-time candidate whose timestamp has
/// passed; `SimultaneousDeadlines` under [`DeadlineConflictPolicy::Fail`].
pub fn select(
    candidates: &[Candidate],
    running: Option<&EventProfile>,
    now: Time,
    on_conflict: DeadlineConflictPolicy,
) -> Result<Option<usize>, SchedulingError> {
    for (position, candidate) in candidates.iter().enumerate() {
        let profile = &candidate.profile;

        if profile.real_time {
            if now > profile.timestamp {
                return Err(SchedulingError::MissedExecution {
                    actor: candidate.event.actor(),
                    timestamp: profile.timestamp,
                    physical_time: now,
                });
            }
            if now < profile.timestamp {
                debug!(event = %candidate.event, "real-time event not yet due");
                continue;
            }
        }

        if let Some(running) = running {
            if !preempts(profile, running, now) {
                debug!(event = %candidate.event, "cannot preempt running actor");
                continue;
            }
        }

        check_deadline_conflict(candidates, position, on_conflict, true)?;
        return Ok(Some(position));
    }
    Ok(None)
}
