//! Basic Non-Preemptive Execution
//!
//! Once an actor with non-zero WCET starts it runs to completion. Only
//! zero-WCET sensors and actuators may start while another actor is
//! executing.
//!
//! ## Ordering (first matching rule wins)
//!
//! ```text
//! 1/2  zero-WCET event that is free now  <  non-zero-WCET event
//! 3    both zero WCET:
//!        RT due now  < non-RT  < RT not yet due
//!        both RT due now         -> equal
//!        otherwise               -> timestamp asc, topological index DESC
//! 4    both non-zero WCET (or the rules above did not apply):
//!        RT vs non-RT            -> non-RT first iff it finishes by the
//!                                   RT timestamp, else RT first
//!        both RT                 -> timestamp asc
//!        both non-RT             -> timestamp asc, topological index asc
//! ```

use std::cmp::Ordering;

use tracing::debug;

use super::profile::{Candidate, EventProfile};
use super::{check_deadline_conflict, DeadlineConflictPolicy};
use crate::domain::error::SchedulingError;
use crate::domain::time::Time;

/// Order `e1` against `e2` at physical time `now`
pub fn compare(e1: &EventProfile, e2: &EventProfile, now: Time) -> Ordering {
    let (zero1, zero2) = (e1.is_instantaneous(), e2.is_instantaneous());

    if e1.is_free_now(now) && !zero2 {
        return Ordering::Less;
    }
    if e2.is_free_now(now) && !zero1 {
        return Ordering::Greater;
    }
    if zero1 && zero2 {
        return compare_instantaneous(e1, e2, now);
    }
    compare_timed(e1, e2, now)
}

fn compare_instantaneous(e1: &EventProfile, e2: &EventProfile, now: Time) -> Ordering {
    match (e1.real_time, e2.real_time) {
        (true, false) if e1.timestamp == now => Ordering::Less,
        (true, false) if e1.timestamp > now => Ordering::Greater,
        (false, true) if e2.timestamp == now => Ordering::Greater,
        (false, true) if e2.timestamp > now => Ordering::Less,
        (true, true) if e1.timestamp == now && e2.timestamp == now => Ordering::Equal,
        // Deeper actors first among simultaneous instantaneous events.
        _ => e1
            .timestamp
            .cmp(&e2.timestamp)
            .then_with(|| e2.topological_index.cmp(&e1.topological_index)),
    }
}

fn compare_timed(e1: &EventProfile, e2: &EventProfile, now: Time) -> Ordering {
    match (e1.real_time, e2.real_time) {
        (true, false) => {
            if now.saturating_add(e2.wcet) <= e1.timestamp {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (false, true) => {
            if now.saturating_add(e1.wcet) <= e2.timestamp {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (true, true) => e1.timestamp.cmp(&e2.timestamp),
        (false, false) => e1
            .timestamp
            .cmp(&e2.timestamp)
            .then_with(|| e1.topological_index.cmp(&e2.topological_index)),
    }
}

/// Walk the ordered `candidates` and return the position of the event to
/// fire, if any
///
/// `processor_busy` is true while some actor is in execution.
///
/// # Errors
/// `MissedExecution` for the first real-time candidate whose timestamp has
/// passed; `SimultaneousDeadlines` under [`DeadlineConflictPolicy::Fail`].
pub fn select(
    candidates: &[Candidate],
    processor_busy: bool,
    next_real_time_deadline: Time,
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
        } else if now.saturating_add(profile.wcet) > next_real_time_deadline {
            debug!(
                event = %candidate.event,
                deadline = %next_real_time_deadline,
                "would overrun next real-time deadline"
            );
            continue;
        }

        if processor_busy && !(profile.is_instantaneous() && profile.sensor_or_actuator) {
            debug!(event = %candidate.event, "processor busy");
            return Ok(None);
        }

        check_deadline_conflict(candidates, position, on_conflict, false)?;
        return Ok(Some(position));
    }
    Ok(None)
}
