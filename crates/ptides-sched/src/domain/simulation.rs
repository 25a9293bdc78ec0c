//! Platform Simulation
//!
//! Drives a single platform processor through model time: events are
//! released into the safe-to-fire set, the scheduler picks what runs, and
//! physical time jumps to the next wake-up whenever nothing can fire.
//!
//! ```text
//!   ┌──────────────▶ complete running actor (finish <= now)   ── Stop
//!   │                release events (safe_at <= now)
//!   │                deadline = min(RT timestamps, first finishing time)
//!   │                scheduler.next_event_to_fire(...)
//!   │                  ├─ Some(e): start e, finish = now + wcet    ── Start
//!   │                  │           suspended finishes += wcet
//!   └──────────────────┴─ None:    advance to next wake-up
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::actor::{ActorId, CausalityOracle, TimingPropertyProvider};
use super::error::SchedulingError;
use super::event::{next_real_time_deadline, ActorsFiring, EventId, EventSet, TimedEvent};
use super::listener::{ScheduleEventType, ScheduleListener};
use super::scheduler::PlatformScheduler;
use super::strategy::StrategyKind;
use super::time::{PhysicalClock, SharedClock, Time, Wakeup, WakeupQueue, WakeupReason};

/// Default bound on scheduling decisions per run
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Run bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationLimits {
    /// Maximum scheduler invocations
    pub max_steps: usize,
    /// Physical time after which the run stops
    pub horizon: Time,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            horizon: Time::POSITIVE_INFINITY,
        }
    }
}

/// One actor firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FiringRecord {
    /// Event that triggered the firing
    pub event: EventId,
    /// Fired actor
    pub actor: ActorId,
    /// Event timestamp
    pub timestamp: Time,
    /// Physical start time
    pub start: Time,
    /// Physical finishing time, `None` if still executing when the run ended
    pub finish: Option<Time>,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Strategy used
    pub strategy: StrategyKind,
    /// Firings in start order
    pub firings: Vec<FiringRecord>,
    /// Physical time when the run stopped
    pub final_time: Time,
    /// Scheduler invocations
    pub steps: usize,
    /// Events never fired, by id
    pub unfired: Vec<EventId>,
}

impl SimulationReport {
    /// Firings of `actor`
    pub fn firings_of(&self, actor: ActorId) -> impl Iterator<Item = &FiringRecord> + '_ {
        self.firings.iter().filter(move |f| f.actor == actor)
    }
}

struct Execution {
    event: TimedEvent,
    finish: Time,
    record: usize,
}

/// Single-processor platform driven by a [`PlatformScheduler`]
pub struct PlatformSimulator<P, O, L> {
    scheduler: PlatformScheduler<P, O, L>,
    clock: SharedClock,
    limits: SimulationLimits,
    pending: BTreeMap<(Time, EventId), TimedEvent>,
    events_to_fire: EventSet,
    actors_firing: ActorsFiring,
    executing: Vec<Execution>,
    wakeups: WakeupQueue,
    firings: Vec<FiringRecord>,
    steps: usize,
}

impl<P, O, L> PlatformSimulator<P, O, L>
where
    P: TimingPropertyProvider,
    O: CausalityOracle,
    L: ScheduleListener,
{
    /// Create a simulator whose clock starts at `ZERO`
    pub fn new(scheduler: PlatformScheduler<P, O, L>, limits: SimulationLimits) -> Self {
        Self::with_clock(scheduler, SharedClock::new(), limits)
    }

    /// Create a simulator on an existing clock
    pub fn with_clock(
        scheduler: PlatformScheduler<P, O, L>,
        clock: SharedClock,
        limits: SimulationLimits,
    ) -> Self {
        Self {
            scheduler,
            clock,
            limits,
            pending: BTreeMap::new(),
            events_to_fire: EventSet::new(),
            actors_firing: ActorsFiring::new(),
            executing: Vec::new(),
            wakeups: WakeupQueue::new(),
            firings: Vec::new(),
            steps: 0,
        }
    }

    /// Physical clock handle
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Underlying scheduler
    pub fn scheduler(&self) -> &PlatformScheduler<P, O, L> {
        &self.scheduler
    }

    /// Make `event` safe to process at physical time `safe_at`
    pub fn schedule(&mut self, event: TimedEvent, safe_at: Time) {
        self.pending.insert((safe_at, event.id()), event);
        self.wakeups.request(safe_at, WakeupReason::Arrival);
    }

    /// Run until idle, past the horizon, or out of steps
    ///
    /// # Errors
    /// Any scheduling failure aborts the run, most notably
    /// `MissedExecution`.
    pub fn run(mut self) -> Result<SimulationReport, SchedulingError> {
        info!(
            strategy = %self.scheduler.strategy().kind(),
            pending = self.pending.len(),
            "simulation started"
        );

        loop {
            let now = self.clock.now();
            if now > self.limits.horizon {
                info!(%now, "horizon reached");
                break;
            }

            self.complete_finished(now);
            self.release(now);

            if self.steps >= self.limits.max_steps {
                warn!(steps = self.steps, "step limit reached");
                break;
            }
            self.steps += 1;

            let deadline = next_real_time_deadline(
                &self.events_to_fire,
                self.scheduler.provider(),
                self.executing.first().map(|e| e.finish),
            )?;

            match self.scheduler.next_event_to_fire(
                &self.actors_firing,
                &mut self.events_to_fire,
                deadline,
                now,
            )? {
                Some(event) => self.start(event, now)?,
                None => {
                    self.request_real_time_wakeups(now)?;
                    match self.next_wakeup(now) {
                        Some(wakeup) if wakeup.at <= self.limits.horizon => {
                            debug!(at = %wakeup.at, reason = ?wakeup.reason, "advancing");
                            self.clock.advance_to(wakeup.at)?;
                        }
                        Some(_) => {
                            info!(%now, "next wake-up beyond horizon");
                            break;
                        }
                        None => {
                            info!(%now, "platform idle");
                            break;
                        }
                    }
                }
            }
        }

        Ok(self.finish())
    }

    fn start(&mut self, event: TimedEvent, now: Time) -> Result<(), SchedulingError> {
        let wcet = self.scheduler.provider().properties(event.actor())?.wcet;
        let finish = now.saturating_add(wcet);

        for suspended in &mut self.executing {
            suspended.finish = suspended.finish.saturating_add(wcet);
        }

        self.scheduler
            .listener()
            .display_schedule(event.actor(), now, ScheduleEventType::Start);
        debug!(%event, %now, %finish, "actor started");

        self.firings.push(FiringRecord {
            event: event.id(),
            actor: event.actor(),
            timestamp: event.timestamp(),
            start: now,
            finish: None,
        });
        self.executing.push(Execution {
            event,
            finish,
            record: self.firings.len() - 1,
        });
        self.actors_firing.push(event);
        self.wakeups.request(finish, WakeupReason::Completion);
        Ok(())
    }

    fn complete_finished(&mut self, now: Time) {
        while self.executing.last().is_some_and(|e| e.finish <= now) {
            let Some(done) = self.executing.pop() else {
                break;
            };
            self.actors_firing.pop();
            self.firings[done.record].finish = Some(done.finish);
            self.scheduler
                .listener()
                .display_schedule(done.event.actor(), done.finish, ScheduleEventType::Stop);
            debug!(event = %done.event, finish = %done.finish, "actor stopped");

            if let Some(resumed) = self.executing.last() {
                self.wakeups.request(resumed.finish, WakeupReason::Completion);
            }
        }
    }

    /// Earliest wake-up after `now`, skipping completions of actors whose
    /// finishing time moved when they were preempted
    fn next_wakeup(&mut self, now: Time) -> Option<Wakeup> {
        while let Some(wakeup) = self.wakeups.pop_after(now) {
            let stale = wakeup.reason == WakeupReason::Completion
                && !self.executing.iter().any(|e| e.finish == wakeup.at);
            if !stale {
                return Some(wakeup);
            }
            debug!(at = %wakeup.at, "stale completion skipped");
        }
        None
    }

    fn release(&mut self, now: Time) {
        while let Some(entry) = self.pending.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let event = entry.remove();
            if !self.events_to_fire.insert(event) {
                warn!(%event, "duplicate event id dropped");
            }
        }
    }

    fn request_real_time_wakeups(&mut self, now: Time) -> Result<(), SchedulingError> {
        for event in &self.events_to_fire {
            if event.timestamp() > now
                && self
                    .scheduler
                    .provider()
                    .must_fire_at_real_time(event.target())?
            {
                self.wakeups
                    .request(event.timestamp(), WakeupReason::RealTimeDeadline);
            }
        }
        Ok(())
    }

    fn finish(self) -> SimulationReport {
        let unfired = self
            .events_to_fire
            .iter()
            .chain(self.pending.values())
            .map(|e| e.id())
            .collect();
        let report = SimulationReport {
            strategy: self.scheduler.strategy().kind(),
            firings: self.firings,
            final_time: self.clock.now(),
            steps: self.steps,
            unfired,
        };
        info!(
            firings = report.firings.len(),
            unfired = report.unfired.len(),
            final_time = %report.final_time,
            "simulation finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::actor::{ActorRegistry, DepthTable, EventTarget, TimingProperties};
    use crate::domain::listener::NullListener;
    use crate::domain::strategy::ExecutionStrategy;

    fn secs(s: f64) -> Time {
        Time::from_secs_f64(s)
    }

    fn setup(
        strategy: ExecutionStrategy,
        actors: &[(&str, TimingProperties)],
    ) -> (PlatformSimulator<ActorRegistry, DepthTable, NullListener>, Vec<ActorId>) {
        let registry = ActorRegistry::new();
        let ids: Vec<_> = actors
            .iter()
            .map(|(name, props)| registry.register(name, *props).unwrap())
            .collect();
        let depths: DepthTable = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let scheduler = PlatformScheduler::new(strategy, registry, depths, NullListener);
        (PlatformSimulator::new(scheduler, SimulationLimits::default()), ids)
    }

    fn event(id: u64, ts: f64, actor: ActorId) -> TimedEvent {
        TimedEvent::new(EventId::new(id), secs(ts), EventTarget::Actor(actor))
    }

    #[test]
    fn test_run_to_completion() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::non_preemptive(),
            &[
                ("a", TimingProperties::with_wcet(Duration::from_millis(100))),
                ("b", TimingProperties::with_wcet(Duration::from_millis(50))),
            ],
        );
        sim.schedule(event(0, 0.0, ids[0]), Time::ZERO);
        sim.schedule(event(1, 0.0, ids[1]), secs(0.01));

        let report = sim.run().unwrap();
        assert_eq!(report.firings.len(), 2);
        assert_eq!(report.firings[0].finish, Some(secs(0.1)));
        assert_eq!(report.firings[1].start, secs(0.1));
        assert_eq!(report.firings[1].finish, Some(secs(0.15)));
        assert_eq!(report.final_time, secs(0.15));
        assert!(report.unfired.is_empty());
    }

    #[test]
    fn test_real_time_event_waits_for_timestamp() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::non_preemptive(),
            &[("act", TimingProperties::with_wcet(Duration::from_millis(1)).real_time())],
        );
        sim.schedule(event(0, 2.0, ids[0]), Time::ZERO);
        let report = sim.run().unwrap();
        assert_eq!(report.firings[0].start, secs(2.0));
    }

    #[test]
    fn test_late_release_is_missed_execution() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::non_preemptive(),
            &[("act", TimingProperties::with_wcet(Duration::from_millis(1)).real_time())],
        );
        sim.schedule(event(0, 1.0, ids[0]), secs(1.5));
        let err = sim.run().unwrap_err();
        assert_eq!(
            err,
            SchedulingError::MissedExecution {
                actor: ids[0],
                timestamp: secs(1.0),
                physical_time: secs(1.5),
            }
        );
    }

    #[test]
    fn test_preemption_extends_suspended_finish() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::preemptive(),
            &[
                ("low", TimingProperties::with_wcet(Duration::from_millis(100))),
                ("high", TimingProperties::with_wcet(Duration::from_millis(20)).priority(2)),
            ],
        );
        sim.schedule(event(0, 0.0, ids[0]), Time::ZERO);
        sim.schedule(event(1, 0.05, ids[1]), secs(0.05));

        let report = sim.run().unwrap();
        let low = report.firings_of(ids[0]).next().unwrap();
        let high = report.firings_of(ids[1]).next().unwrap();
        assert_eq!(high.start, secs(0.05));
        assert_eq!(high.finish, Some(secs(0.07)));
        assert_eq!(low.finish, Some(secs(0.12)));
    }

    #[test]
    fn test_preempted_completion_does_not_cost_a_step() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::preemptive(),
            &[
                ("low", TimingProperties::with_wcet(Duration::from_millis(100))),
                ("high", TimingProperties::with_wcet(Duration::from_millis(20)).priority(2)),
            ],
        );
        sim.schedule(event(0, 0.0, ids[0]), Time::ZERO);
        sim.schedule(event(1, 0.05, ids[1]), secs(0.05));

        // Decisions at 0, 0, 0.05, 0.05, 0.07 and 0.12; the original
        // 0.1 completion of "low" is never visited.
        let report = sim.run().unwrap();
        assert_eq!(report.steps, 6);
        assert_eq!(report.final_time, secs(0.12));
    }

    #[test]
    fn test_step_budget_not_spent_on_stale_completions() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::preemptive(),
            &[
                ("low", TimingProperties::with_wcet(Duration::from_millis(100))),
                ("high", TimingProperties::with_wcet(Duration::from_millis(10)).priority(2)),
            ],
        );
        sim.schedule(event(0, 0.0, ids[0]), Time::ZERO);
        for i in 0..4u64 {
            let at = 0.01 + 0.02 * i as f64;
            sim.schedule(event(i + 1, at, ids[1]), secs(at));
        }

        // Each preemption pushes "low" back by 10 ms and costs three
        // decisions (start, wait, completion); none of the four superseded
        // completions of "low" is visited.
        let report = sim.run().unwrap();
        let low = report.firings_of(ids[0]).next().unwrap();
        assert_eq!(low.finish, Some(secs(0.14)));
        assert_eq!(report.firings.len(), 5);
        assert_eq!(report.steps, 2 + 3 * 4 + 1);
    }

    #[test]
    fn test_horizon_leaves_events_unfired() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::non_preemptive(),
            &[("a", TimingProperties::with_wcet(Duration::from_millis(1)))],
        );
        sim.limits.horizon = secs(1.0);
        sim.schedule(event(0, 5.0, ids[0]), secs(5.0));
        let report = sim.run().unwrap();
        assert!(report.firings.is_empty());
        assert_eq!(report.unfired, vec![EventId::new(0)]);
    }

    #[test]
    fn test_step_limit() {
        let (mut sim, ids) = setup(
            ExecutionStrategy::non_preemptive(),
            &[("a", TimingProperties::default())],
        );
        sim.limits.max_steps = 2;
        for i in 0..5 {
            sim.schedule(event(i, 0.0, ids[0]), Time::ZERO);
        }
        let report = sim.run().unwrap();
        assert_eq!(report.steps, 2);
        assert_eq!(report.firings.len(), 2);
        assert_eq!(report.unfired.len(), 3);
    }
}
