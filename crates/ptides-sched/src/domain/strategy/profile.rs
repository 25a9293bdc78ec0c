//! Event Profiles
//!
//! Everything the ordering rules look at, resolved once per selection
//! call. Provider and oracle failures surface here, before sorting starts,
//! so the comparators themselves are infallible.

use std::time::Duration;

use crate::domain::actor::{CausalityOracle, TimingPropertyProvider};
use crate::domain::error::SchedulingError;
use crate::domain::event::TimedEvent;
use crate::domain::time::Time;

/// Scheduling-relevant attributes of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventProfile {
    /// Event timestamp
    pub timestamp: Time,
    /// WCET of the target actor
    pub wcet: Duration,
    /// Must fire at real time equal to `timestamp`
    pub real_time: bool,
    /// Preemption priority of the target actor
    pub priority: i32,
    /// Depth of the target actor in its container
    pub topological_index: usize,
    /// Target actor is a sensor or actuator
    pub sensor_or_actuator: bool,
    /// Target actor's WCET is fixed
    pub fixed_wcet: bool,
    /// Timestamp plus the target port's relative deadline, or
    /// `POSITIVE_INFINITY` when the port has none
    pub absolute_deadline: Time,
}

impl EventProfile {
    /// Resolve the profile of `event`
    ///
    /// # Errors
    /// Provider or oracle failures, unchanged.
    pub fn resolve<P, O>(
        event: &TimedEvent,
        provider: &P,
        oracle: &O,
    ) -> Result<Self, SchedulingError>
    where
        P: TimingPropertyProvider + ?Sized,
        O: CausalityOracle + ?Sized,
    {
        let topological_index = oracle.topological_depth(event.actor())?;
        Self::without_depth(event, provider).map(|profile| Self {
            topological_index,
            ..profile
        })
    }

    /// Resolve everything but the topological index (left at 0)
    ///
    /// Used for the running actor, which is never sorted.
    pub fn without_depth<P>(event: &TimedEvent, provider: &P) -> Result<Self, SchedulingError>
    where
        P: TimingPropertyProvider + ?Sized,
    {
        let properties = provider.properties(event.actor())?;
        let absolute_deadline = provider
            .relative_deadline(event.target())?
            .map_or(Time::POSITIVE_INFINITY, |relative| {
                event.timestamp().saturating_add(relative)
            });
        Ok(Self {
            timestamp: event.timestamp(),
            wcet: properties.wcet,
            real_time: provider.must_fire_at_real_time(event.target())?,
            priority: properties.priority,
            topological_index: 0,
            sensor_or_actuator: properties.sensor_or_actuator,
            fixed_wcet: properties.fixed_wcet,
            absolute_deadline,
        })
    }

    /// Zero WCET
    #[inline(always)]
    pub fn is_instantaneous(&self) -> bool {
        self.wcet.is_zero()
    }

    /// Zero-WCET, or real-time-bound and due exactly at `now`
    ///
    /// Such an event sorts ahead of any event with non-zero WCET.
    #[inline]
    pub fn is_free_now(&self, now: Time) -> bool {
        self.is_instantaneous() && (!self.real_time || self.timestamp == now)
    }

    /// Both events are real-time-bound, both take processor time, and both
    /// are due at the same instant: one processor cannot honour both.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.real_time
            && other.real_time
            && !self.is_instantaneous()
            && !other.is_instantaneous()
            && self.timestamp == other.timestamp
    }
}

/// An event together with its resolved profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The pending event
    pub event: TimedEvent,
    /// Its profile at the time of resolution
    pub profile: EventProfile,
}

/// Resolve profiles for all `events`, preserving their order
pub fn resolve_candidates<'a, P, O, I>(
    events: I,
    provider: &P,
    oracle: &O,
) -> Result<Vec<Candidate>, SchedulingError>
where
    P: TimingPropertyProvider + ?Sized,
    O: CausalityOracle + ?Sized,
    I: IntoIterator<Item = &'a TimedEvent>,
{
    events
        .into_iter()
        .map(|event| {
            EventProfile::resolve(event, provider, oracle).map(|profile| Candidate {
                event: *event,
                profile,
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::actor::{ActorRegistry, DepthTable, EventTarget, PortTiming, TimingProperties};
    use crate::domain::event::EventId;

    #[test]
    fn test_resolve_reads_provider_and_oracle() {
        let registry = ActorRegistry::new();
        let a = registry
            .register(
                "a",
                TimingProperties::with_wcet(Duration::from_millis(3)).real_time().priority(4),
            )
            .unwrap();
        let mut depths = DepthTable::new();
        depths.set(a, 6);

        let event = TimedEvent::new(EventId::new(0), Time::from_secs_f64(2.0), EventTarget::Actor(a));
        let profile = EventProfile::resolve(&event, &registry, &depths).unwrap();

        assert_eq!(profile.timestamp, Time::from_secs_f64(2.0));
        assert_eq!(profile.wcet, Duration::from_millis(3));
        assert!(profile.real_time);
        assert_eq!(profile.priority, 4);
        assert_eq!(profile.topological_index, 6);
        assert_eq!(profile.absolute_deadline, Time::POSITIVE_INFINITY);
    }

    #[test]
    fn test_resolve_absolute_deadline_from_port() {
        let registry = ActorRegistry::new();
        let a = registry.register("a", TimingProperties::default()).unwrap();
        let port = registry
            .add_port_with(a, PortTiming::default().deadline(Duration::from_millis(250)))
            .unwrap();
        let mut depths = DepthTable::new();
        depths.set(a, 0);

        let event = TimedEvent::new(
            EventId::new(0),
            Time::from_secs_f64(2.0),
            EventTarget::Port(a, port),
        );
        let profile = EventProfile::resolve(&event, &registry, &depths).unwrap();
        assert_eq!(profile.absolute_deadline, Time::from_secs_f64(2.25));
    }

    #[test]
    fn test_resolve_fails_before_any_ordering() {
        let registry = ActorRegistry::new();
        let a = registry.register("a", TimingProperties::default()).unwrap();
        let event = TimedEvent::new(EventId::new(0), Time::ZERO, EventTarget::Actor(a));
        let err = resolve_candidates([&event], &registry, &DepthTable::new()).unwrap_err();
        assert_eq!(err, SchedulingError::NoCausalityInterface(a));
    }

    #[test]
    fn test_free_now() {
        let now = Time::from_secs_f64(1.0);
        assert!(profile(5.0, 0).is_free_now(now));
        assert!(real_time(profile(1.0, 0)).is_free_now(now));
        assert!(!real_time(profile(2.0, 0)).is_free_now(now));
        assert!(!profile(1.0, 1).is_free_now(now));
    }

    #[test]
    fn test_conflict_detection() {
        let a = real_time(profile(3.0, 2));
        let b = real_time(profile(3.0, 5));
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&real_time(profile(4.0, 5))));
        assert!(!a.conflicts_with(&profile(3.0, 5)));
        assert!(!a.conflicts_with(&real_time(profile(3.0, 0))));
    }
}
