//! Physical Clock Abstraction
//!
//! The scheduler never advances physical time; it only reads it. Whoever
//! hosts the platform (a simulation loop, a real-time executive) owns the
//! clock and decides when time moves.

use super::types::Time;

/// Read-only view of the platform's physical time
///
/// # Invariant
/// Successive calls to `now()` never return a smaller value.
pub trait PhysicalClock {
    /// Current physical time
    fn now(&self) -> Time;
}

impl<C: PhysicalClock + ?Sized> PhysicalClock for &C {
    #[inline(always)]
    fn now(&self) -> Time {
        (**self).now()
    }
}

impl<C: PhysicalClock + ?Sized> PhysicalClock for std::sync::Arc<C> {
    #[inline(always)]
    fn now(&self) -> Time {
        (**self).now()
    }
}
