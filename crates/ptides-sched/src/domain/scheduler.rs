//! Platform Scheduler
//!
//! The entry point the platform host calls whenever it must decide what to
//! fire next. Collaborators are bound through generics, so every call is
//! statically dispatched.
//!
//! ```rust
//! use ptides_sched::domain::actor::{ActorRegistry, DepthTable, EventTarget, TimingProperties};
//! use ptides_sched::domain::event::{ActorsFiring, EventId, EventSet, TimedEvent};
//! use ptides_sched::domain::listener::NullListener;
//! use ptides_sched::domain::scheduler::PlatformScheduler;
//! use ptides_sched::domain::strategy::ExecutionStrategy;
//! use ptides_sched::domain::time::Time;
//!
//! let registry = ActorRegistry::new();
//! let sensor = registry.register("sensor", TimingProperties::default()).unwrap();
//! let depths: DepthTable = [(sensor, 0)].into_iter().collect();
//!
//! let scheduler = PlatformScheduler::new(
//!     ExecutionStrategy::non_preemptive(),
//!     registry,
//!     depths,
//!     NullListener,
//! );
//!
//! let mut events: EventSet = [TimedEvent::new(EventId::new(0), Time::ZERO, EventTarget::Actor(sensor))]
//!     .into_iter()
//!     .collect();
//! let next = scheduler
//!     .next_event_to_fire(&ActorsFiring::new(), &mut events, Time::POSITIVE_INFINITY, Time::ZERO)
//!     .unwrap();
//! assert_eq!(next.map(|e| e.actor()), Some(sensor));
//! assert!(events.is_empty());
//! ```

use tracing::{debug, trace, warn};

use super::actor::{CausalityOracle, TimingPropertyProvider};
use super::error::SchedulingError;
use super::event::{ActorsFiring, EventSet, TimedEvent};
use super::listener::{NullListener, ScheduleEventType, ScheduleListener};
use super::strategy::{resolve_candidates, Candidate, EventProfile, ExecutionStrategy};
use super::time::Time;

/// Selects the next event to fire on one platform
pub struct PlatformScheduler<P, O, L = NullListener> {
    strategy: ExecutionStrategy,
    provider: P,
    oracle: O,
    listener: L,
}

impl<P, O, L> PlatformScheduler<P, O, L>
where
    P: TimingPropertyProvider,
    O: CausalityOracle,
    L: ScheduleListener,
{
    /// Create a scheduler
    pub fn new(strategy: ExecutionStrategy, provider: P, oracle: O, listener: L) -> Self {
        Self {
            strategy,
            provider,
            oracle,
            listener,
        }
    }

    /// Configured strategy
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Timing property provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Causality oracle
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Schedule listener
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// All events in `events` in firing preference order at `now`
    ///
    /// # Errors
    /// Provider or oracle failures.
    pub fn ordered_candidates(
        &self,
        events: &EventSet,
        now: Time,
    ) -> Result<Vec<Candidate>, SchedulingError> {
        let mut candidates = resolve_candidates(events, &self.provider, &self.oracle)?;
        self.strategy.order(&mut candidates, now);
        Ok(candidates)
    }

    /// Choose the next event to fire and remove it from `events_to_fire`
    ///
    /// Returns `Ok(None)` when nothing may fire now. On error the set is
    /// left untouched.
    ///
    /// # Errors
    /// - `MissedExecution`: a real-time-bound event's timestamp has passed.
    ///   The listener is notified before the error is returned.
    /// - `SimultaneousDeadlines`: under the `Fail` conflict policy.
    /// - Provider and oracle failures.
    pub fn next_event_to_fire(
        &self,
        actors_firing: &ActorsFiring,
        events_to_fire: &mut EventSet,
        next_real_time_deadline: Time,
        physical_time: Time,
    ) -> Result<Option<TimedEvent>, SchedulingError> {
        if events_to_fire.is_empty() {
            return Ok(None);
        }

        let candidates = self.ordered_candidates(events_to_fire, physical_time)?;
        let running = actors_firing
            .running()
            .map(|event| EventProfile::without_depth(event, &self.provider))
            .transpose()?;

        trace!(
            strategy = %self.strategy.kind(),
            candidates = candidates.len(),
            busy = running.is_some(),
            now = %physical_time,
            "selecting next event"
        );

        let selection = self.strategy.select(
            &candidates,
            running.as_ref(),
            next_real_time_deadline,
            physical_time,
        );

        match selection {
            Ok(Some(position)) => {
                let event = candidates[position].event;
                events_to_fire.remove(event.id());
                debug!(%event, now = %physical_time, "selected event");
                Ok(Some(event))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                if let SchedulingError::MissedExecution {
                    actor, timestamp, ..
                } = err
                {
                    self.listener
                        .display_schedule(actor, timestamp, ScheduleEventType::MissedExecution);
                }
                warn!(error = %err, "event selection failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::domain::actor::{
        ActorId, ActorRegistry, ContainerGraph, DepthTable, EventTarget, TimingProperties,
    };
    use crate::domain::event::EventId;

    #[derive(Default)]
    struct Collect(Mutex<Vec<(ActorId, Time, ScheduleEventType)>>);

    impl ScheduleListener for Collect {
        fn display_schedule(&self, actor: ActorId, time: Time, kind: ScheduleEventType) {
            self.0.lock().push((actor, time, kind));
        }
    }

    fn secs(s: f64) -> Time {
        Time::from_secs_f64(s)
    }

    fn event(id: u64, ts: f64, actor: ActorId) -> TimedEvent {
        TimedEvent::new(EventId::new(id), secs(ts), EventTarget::Actor(actor))
    }

    #[test]
    fn test_missed_execution_notifies_listener_and_keeps_set() {
        let registry = ActorRegistry::new();
        let actuator = registry
            .register("actuator", TimingProperties::with_wcet(Duration::from_millis(1)).real_time())
            .unwrap();
        let depths: DepthTable = [(actuator, 0)].into_iter().collect();
        let listener = Collect::default();
        let scheduler =
            PlatformScheduler::new(ExecutionStrategy::non_preemptive(), registry, depths, &listener);

        let mut events: EventSet = [event(0, 1.0, actuator)].into_iter().collect();
        let err = scheduler
            .next_event_to_fire(&ActorsFiring::new(), &mut events, Time::POSITIVE_INFINITY, secs(1.2))
            .unwrap_err();

        assert!(err.is_timing_violation());
        assert_eq!(events.len(), 1);
        assert_eq!(
            *listener.0.lock(),
            vec![(actuator, secs(1.0), ScheduleEventType::MissedExecution)]
        );
    }

    #[test]
    fn test_missing_depth_is_no_causality_interface() {
        let scheduler = PlatformScheduler::new(
            ExecutionStrategy::preemptive(),
            ActorRegistry::new(),
            DepthTable::new(),
            NullListener,
        );
        let ghost = ActorId::new(42);
        let mut events: EventSet = [event(0, 0.0, ghost)].into_iter().collect();
        let err = scheduler
            .next_event_to_fire(&ActorsFiring::new(), &mut events, Time::POSITIVE_INFINITY, Time::ZERO)
            .unwrap_err();
        assert_eq!(err, SchedulingError::NoCausalityInterface(ghost));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_unknown_actor_propagates() {
        let ghost = ActorId::new(42);
        let depths: DepthTable = [(ghost, 0)].into_iter().collect();
        let scheduler = PlatformScheduler::new(
            ExecutionStrategy::non_preemptive(),
            ActorRegistry::new(),
            depths,
            NullListener,
        );
        let mut events: EventSet = [event(0, 0.0, ghost)].into_iter().collect();
        let err = scheduler
            .next_event_to_fire(&ActorsFiring::new(), &mut events, Time::POSITIVE_INFINITY, Time::ZERO)
            .unwrap_err();
        assert_eq!(err, SchedulingError::UnknownActor(ghost));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_causality_loop_propagates() {
        let registry = ActorRegistry::new();
        let a = registry.register("a", TimingProperties::default()).unwrap();
        let b = registry.register("b", TimingProperties::default()).unwrap();
        let mut graph = ContainerGraph::new();
        graph.add_actor("feedback", a);
        graph.add_actor("feedback", b);
        graph.connect(a, b).unwrap();
        graph.connect(b, a).unwrap();
        let scheduler =
            PlatformScheduler::new(ExecutionStrategy::non_preemptive(), registry, graph, NullListener);

        let mut events: EventSet = [event(0, 0.0, a), event(1, 0.0, b)].into_iter().collect();
        let err = scheduler
            .next_event_to_fire(&ActorsFiring::new(), &mut events, Time::POSITIVE_INFINITY, Time::ZERO)
            .unwrap_err();
        assert!(matches!(err, SchedulingError::CausalityLoop { .. }));
        assert!(!err.is_timing_violation());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_empty_set() {
        let scheduler = PlatformScheduler::new(
            ExecutionStrategy::default(),
            ActorRegistry::new(),
            DepthTable::new(),
            NullListener,
        );
        let mut events = EventSet::new();
        let next = scheduler
            .next_event_to_fire(&ActorsFiring::new(), &mut events, Time::ZERO, Time::ZERO)
            .unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn test_preemption_by_priority() {
        let registry = ActorRegistry::new();
        let slow = registry
            .register("slow", TimingProperties::with_wcet(Duration::from_millis(50)))
            .unwrap();
        let urgent = registry
            .register(
                "urgent",
                TimingProperties::with_wcet(Duration::from_millis(5)).priority(3),
            )
            .unwrap();
        let depths: DepthTable = [(slow, 0), (urgent, 1)].into_iter().collect();
        let scheduler =
            PlatformScheduler::new(ExecutionStrategy::preemptive(), registry, depths, NullListener);

        let firing: ActorsFiring = [event(0, 0.0, slow)].into_iter().collect();
        let mut events: EventSet = [event(1, 0.0, slow), event(2, 0.01, urgent)].into_iter().collect();

        let next = scheduler
            .next_event_to_fire(&firing, &mut events, Time::POSITIVE_INFINITY, secs(0.02))
            .unwrap();
        assert_eq!(next.map(|e| e.id()), Some(EventId::new(2)));
        assert_eq!(events.len(), 1);
    }
}
