//! Candidate Ordering
//!
//! The non-preemptive rules are not guaranteed to be transitive when
//! real-time and non-real-time events mix, and `slice::sort_by` may panic
//! on an inconsistent order. A stable insertion sort never does: every
//! comparison is local to two adjacent candidates.

use std::cmp::Ordering;

use super::profile::{Candidate, EventProfile};

/// Sort `candidates` in place by `compare`, ties broken by event id
pub(crate) fn order_candidates<F>(candidates: &mut [Candidate], mut compare: F)
where
    F: FnMut(&EventProfile, &EventProfile) -> Ordering,
{
    for i in 1..candidates.len() {
        let mut j = i;
        while j > 0 {
            let (left, right) = (&candidates[j - 1], &candidates[j]);
            let order = compare(&left.profile, &right.profile)
                .then_with(|| left.event.id().cmp(&right.event.id()));
            if order != Ordering::Greater {
                break;
            }
            candidates.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::{ActorId, EventTarget};
    use crate::domain::event::{EventId, TimedEvent};
    use crate::domain::strategy::profile::fixtures::profile;
    use crate::domain::time::Time;

    fn candidate(id: u64, timestamp: f64) -> Candidate {
        let profile = profile(timestamp, 1);
        Candidate {
            event: TimedEvent::new(
                EventId::new(id),
                profile.timestamp,
                EventTarget::Actor(ActorId::new(0)),
            ),
            profile,
        }
    }

    fn ids(candidates: &[Candidate]) -> Vec<u64> {
        candidates.iter().map(|c| c.event.id().0).collect()
    }

    #[test]
    fn test_orders_by_comparator() {
        let mut candidates = vec![candidate(0, 3.0), candidate(1, 1.0), candidate(2, 2.0)];
        order_candidates(&mut candidates, |a, b| a.timestamp.cmp(&b.timestamp));
        assert_eq!(ids(&candidates), vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_fall_back_to_event_id() {
        let mut candidates = vec![candidate(4, 1.0), candidate(2, 1.0), candidate(9, 1.0)];
        order_candidates(&mut candidates, |_, _| Ordering::Equal);
        assert_eq!(ids(&candidates), vec![2, 4, 9]);
    }

    #[test]
    fn test_inconsistent_comparator_terminates() {
        // Always "greater": a non-total order must not panic or loop.
        let mut candidates: Vec<_> = (0..16).map(|i| candidate(i, 0.0)).collect();
        order_candidates(&mut candidates, |_, _| Ordering::Greater);
        assert_eq!(candidates.len(), 16);
        assert_eq!(candidates[0].profile.timestamp, Time::ZERO);
    }
}
