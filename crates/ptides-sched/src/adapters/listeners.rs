//! Schedule Listener Adapters
//!
//! - `TracingListener`: forwards notifications to `tracing`
//! - `RecordingListener`: keeps them in memory for reports and tests

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::actor::ActorId;
use crate::domain::listener::{ScheduleEventType, ScheduleListener};
use crate::domain::time::Time;

/// Logs every schedule notification
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl ScheduleListener for TracingListener {
    fn display_schedule(&self, actor: ActorId, time: Time, kind: ScheduleEventType) {
        match kind {
            ScheduleEventType::MissedExecution => {
                warn!(%actor, %time, "missed execution");
            }
            ScheduleEventType::Start | ScheduleEventType::Stop => {
                info!(%actor, %time, event = %kind, "schedule");
            }
        }
    }
}

/// One recorded notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleRecord {
    /// Actor concerned
    pub actor: ActorId,
    /// Physical time
    pub time: Time,
    /// Notification kind
    pub kind: ScheduleEventType,
}

/// Records notifications in arrival order
///
/// Clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    records: Arc<Mutex<Vec<ScheduleRecord>>>,
}

impl RecordingListener {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records
    pub fn records(&self) -> Vec<ScheduleRecord> {
        self.records.lock().clone()
    }

    /// Records of one kind
    pub fn of_kind(&self, kind: ScheduleEventType) -> Vec<ScheduleRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.kind == kind)
            .copied()
            .collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl ScheduleListener for RecordingListener {
    fn display_schedule(&self, actor: ActorId, time: Time, kind: ScheduleEventType) {
        self.records.lock().push(ScheduleRecord { actor, time, kind });
    }
}

/// Forwards each notification to two listeners
#[derive(Debug, Default, Clone)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: ScheduleListener, B: ScheduleListener> ScheduleListener for Tee<A, B> {
    fn display_schedule(&self, actor: ActorId, time: Time, kind: ScheduleEventType) {
        self.0.display_schedule(actor, time, kind);
        self.1.display_schedule(actor, time, kind);
    }
}
