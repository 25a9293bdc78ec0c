//! Next Real-Time Deadline
//!
//! Non-real-time work must not start if it would still be running when
//! the next hard deadline arrives. The deadline is the earliest timestamp
//! among pending real-time-bound events, bounded by the finishing time of
//! the earliest-started actor still in execution.

use super::collections::EventSet;
use crate::domain::actor::TimingPropertyProvider;
use crate::domain::error::SchedulingError;
use crate::domain::time::Time;

/// Earliest upcoming hard deadline, `POSITIVE_INFINITY` if there is none
///
/// # Errors
/// Propagates provider lookup failures.
pub fn next_real_time_deadline<P: TimingPropertyProvider + ?Sized>(
    events: &EventSet,
    provider: &P,
    first_finishing_time: Option<Time>,
) -> Result<Time, SchedulingError> {
    let mut deadline = Time::POSITIVE_INFINITY;
    for event in events {
        if provider.must_fire_at_real_time(event.target())? && event.timestamp() < deadline {
            deadline = event.timestamp();
        }
    }
    if let Some(finishing) = first_finishing_time {
        deadline = deadline.min(finishing);
    }
    Ok(deadline)
}
