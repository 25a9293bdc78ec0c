//! Shared Clock
//!
//! A physical clock owned by the platform host and readable from anywhere.
//!
//! # Design
//! - `parking_lot::RwLock` so readers (scheduler, listeners) do not contend
//! - Monotonic by construction: `advance_to` refuses to go backwards

use std::sync::Arc;

use parking_lot::RwLock;

use super::backend::PhysicalClock;
use super::types::Time;
use crate::domain::error::SchedulingError;

/// Monotonic, cloneable physical clock handle
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct SharedClock {
    now: Arc<RwLock<Time>>,
}

impl SharedClock {
    /// Create a clock starting at `ZERO`
    pub fn new() -> Self {
        Self::starting_at(Time::ZERO)
    }

    /// Create a clock starting at `start`
    pub fn starting_at(start: Time) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Move physical time forward to `time`
    ///
    /// Advancing to the current time is a no-op.
    ///
    /// # Errors
    /// `ClockRegression` if `time` is earlier than the current time.
    pub fn advance_to(&self, time: Time) -> Result<(), SchedulingError> {
        let mut now = self.now.write();
        if time < *now {
            return Err(SchedulingError::ClockRegression {
                current: *now,
                requested: time,
            });
        }
        *now = time;
        Ok(())
    }
}

impl PhysicalClock for SharedClock {
    fn now(&self) -> Time {
        *self.now.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        assert_eq!(SharedClock::new().now(), Time::ZERO);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = SharedClock::new();
        let reader = clock.clone();
        clock.advance_to(Time::from_secs_f64(3.0)).unwrap();
        assert_eq!(reader.now(), Time::from_secs_f64(3.0));
    }

    #[test]
    fn test_monotonicity_enforced() {
        let clock = SharedClock::starting_at(Time::from_secs_f64(5.0));
        clock.advance_to(Time::from_secs_f64(5.0)).unwrap();
        let err = clock.advance_to(Time::from_secs_f64(4.0)).unwrap_err();
        assert!(matches!(err, SchedulingError::ClockRegression { .. }));
        assert_eq!(clock.now(), Time::from_secs_f64(5.0));
    }
}
