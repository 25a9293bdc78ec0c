//! Kani Proofs for the Event Comparators
//!
//! Bounded checks over symbolic event profiles:
//! - all three comparators are antisymmetric
//! - a higher-priority event always sorts first under preemption
//! - a zero-WCET event that is free now always beats a timed event

use std::cmp::Ordering;
use std::time::Duration;

use super::{edf, non_preemptive, preemptive, EventProfile};
use crate::domain::time::Time;

fn any_profile() -> EventProfile {
    let timestamp: i32 = kani::any();
    let wcet: u16 = kani::any();
    let index: u8 = kani::any();
    EventProfile {
        timestamp: Time::from_nanos(i64::from(timestamp)),
        wcet: Duration::from_nanos(u64::from(wcet)),
        real_time: kani::any(),
        priority: i32::from(kani::any::<i8>()),
        topological_index: usize::from(index),
        sensor_or_actuator: kani::any(),
        fixed_wcet: kani::any(),
        absolute_deadline: Time::from_nanos(i64::from(kani::any::<i32>())),
    }
}

fn any_now() -> Time {
    let now: i32 = kani::any();
    Time::from_nanos(i64::from(now))
}

#[kani::proof]
fn proof_non_preemptive_antisymmetric() {
    let (a, b, now) = (any_profile(), any_profile(), any_now());
    let forward = non_preemptive::compare(&a, &b, now);
    let backward = non_preemptive::compare(&b, &a, now);
    kani::assert(forward == backward.reverse(), "non-preemptive order must be antisymmetric");
}

#[kani::proof]
fn proof_preemptive_antisymmetric() {
    let (a, b, now) = (any_profile(), any_profile(), any_now());
    let forward = preemptive::compare(&a, &b, now);
    let backward = preemptive::compare(&b, &a, now);
    kani::assert(forward == backward.reverse(), "preemptive order must be antisymmetric");
}

#[kani::proof]
fn proof_edf_antisymmetric() {
    let (a, b) = (any_profile(), any_profile());
    kani::assert(edf::compare(&a, &b) == edf::compare(&b, &a).reverse(), "EDF order must be antisymmetric");
}

#[kani::proof]
fn proof_priority_dominates() {
    let (a, b, now) = (any_profile(), any_profile(), any_now());
    kani::assume(a.priority > b.priority);
    kani::assert(
        preemptive::compare(&a, &b, now) == Ordering::Less,
        "higher priority must sort first",
    );
}

#[kani::proof]
fn proof_free_instantaneous_first() {
    let (a, b, now) = (any_profile(), any_profile(), any_now());
    kani::assume(a.is_free_now(now) && !b.is_instantaneous());
    kani::assert(
        non_preemptive::compare(&a, &b, now) == Ordering::Less,
        "free zero-WCET event must precede timed event",
    );
}
