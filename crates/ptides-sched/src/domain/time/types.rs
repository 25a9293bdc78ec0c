//! Time Types
//!
//! Model and physical time share one representation: signed integer ticks
//! at a fixed resolution of one nanosecond. Integer ticks make equality
//! exact, which the ordering rules depend on ("due exactly now"), and make
//! `timestamp + wcet` associative.

use std::fmt;
use std::ops::Add;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in model or physical time
///
/// # Invariants
/// - Totally ordered, exact equality
/// - `POSITIVE_INFINITY` absorbs additions
///
/// # Example
///
/// ```rust
/// use ptides_sched::domain::time::Time;
/// use std::time::Duration;
///
/// let t = Time::from_secs_f64(10.0);
/// assert_eq!(t + Duration::from_millis(500), Time::from_secs_f64(10.5));
/// assert!(Time::POSITIVE_INFINITY > t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Time(i64);

impl Time {
    /// Time origin
    pub const ZERO: Self = Self(0);

    /// Later than every finite time
    pub const POSITIVE_INFINITY: Self = Self(i64::MAX);

    /// Ticks per second
    pub const NANOS_PER_SEC: i64 = 1_000_000_000;

    /// Create from raw nanosecond ticks
    #[inline(always)]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Create from seconds, rounded to the nearest nanosecond
    ///
    /// NaN maps to `ZERO`; values beyond the representable range saturate,
    /// so `f64::INFINITY` maps to `POSITIVE_INFINITY`.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() {
            return Self::ZERO;
        }
        // `as` saturates at the i64 bounds
        Self((secs * Self::NANOS_PER_SEC as f64).round() as i64)
    }

    /// Raw nanosecond ticks
    #[inline(always)]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Seconds as a float, `f64::INFINITY` for `POSITIVE_INFINITY`
    pub fn as_secs_f64(self) -> f64 {
        if self.is_infinite() {
            f64::INFINITY
        } else {
            self.0 as f64 / Self::NANOS_PER_SEC as f64
        }
    }

    /// Check for `POSITIVE_INFINITY`
    #[inline(always)]
    pub const fn is_infinite(self) -> bool {
        self.0 == i64::MAX
    }

    /// Add a duration, saturating at `POSITIVE_INFINITY`
    pub fn saturating_add(self, duration: Duration) -> Self {
        if self.is_infinite() {
            return self;
        }
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(nanos))
    }

    /// Elapsed duration since `earlier`, zero if `earlier` is later
    pub fn duration_since(self, earlier: Self) -> Duration {
        let delta = self.0.saturating_sub(earlier.0);
        Duration::from_nanos(u64::try_from(delta).unwrap_or(0))
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        self.saturating_add(rhs)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "+inf")
        } else {
            write!(f, "{}", self.as_secs_f64())
        }
    }
}

// Serialized as seconds so scenario files stay readable
impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::from_secs_f64)
    }
}
