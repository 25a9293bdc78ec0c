//! Schedule Listener
//!
//! Observers of actor execution on the platform. The scheduler reports
//! `MissedExecution`; the platform host reports `Start` and `Stop`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use super::time::Time;

/// Kind of schedule notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleEventType {
    /// Actor started executing
    Start,
    /// Actor finished executing
    Stop,
    /// A real-time-bound actor was not fired at its timestamp
    MissedExecution,
}

impl fmt::Display for ScheduleEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleEventType::Start => write!(f, "START"),
            ScheduleEventType::Stop => write!(f, "STOP"),
            ScheduleEventType::MissedExecution => write!(f, "MISSEDEXECUTION"),
        }
    }
}

/// Receives schedule notifications
pub trait ScheduleListener {
    /// `actor` changed state at `time`
    fn display_schedule(&self, actor: ActorId, time: Time, kind: ScheduleEventType);
}

impl<L: ScheduleListener + ?Sized> ScheduleListener for &L {
    fn display_schedule(&self, actor: ActorId, time: Time, kind: ScheduleEventType) {
        (**self).display_schedule(actor, time, kind)
    }
}

impl<L: ScheduleListener + ?Sized> ScheduleListener for Arc<L> {
    fn display_schedule(&self, actor: ActorId, time: Time, kind: ScheduleEventType) {
        (**self).display_schedule(actor, time, kind)
    }
}

/// Listener that discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl ScheduleListener for NullListener {
    #[inline(always)]
    fn display_schedule(&self, _actor: ActorId, _time: Time, _kind: ScheduleEventType) {}
}
