//! Adapters Layer
//!
//! Outbound adapters from the domain's `ScheduleListener` port to logging
//! and in-memory recording.

pub mod listeners;

pub use listeners::{RecordingListener, ScheduleRecord, Tee, TracingListener};
