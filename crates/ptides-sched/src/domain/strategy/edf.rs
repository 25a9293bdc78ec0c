//! Earliest-Deadline-First Execution
//!
//! Events are ranked by their absolute deadline (timestamp plus the
//! destination port's relative deadline). Admission follows the
//! non-preemptive rules: a started actor runs to completion.
//!
//! ```text
//! absolute deadline asc  ->  timestamp asc  ->  topological index asc
//! ```
//!
//! Events whose port carries no relative deadline have an infinite
//! absolute deadline and sort after every event that has one.

use std::cmp::Ordering;

use super::profile::EventProfile;

pub use super::non_preemptive::select;

/// Order `e1` against `e2` by deadline
pub fn compare(e1: &EventProfile, e2: &EventProfile) -> Ordering {
    e1.absolute_deadline
        .cmp(&e2.absolute_deadline)
        .then_with(|| e1.timestamp.cmp(&e2.timestamp))
        .then_with(|| e1.topological_index.cmp(&e2.topological_index))
}
