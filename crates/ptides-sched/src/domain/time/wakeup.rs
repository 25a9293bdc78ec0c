//! Wake-up Queue
//!
//! Future physical times at which the platform has to be looked at again:
//! an event becoming safe to process, an actor reaching its finishing time,
//! a real-time event coming due. The host pops the earliest one and jumps
//! physical time there when nothing can fire now.
//!
//! Entries are ordered by (time, sequence) so that equal times pop in
//! request order and runs are reproducible.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::types::Time;

/// Why the platform asked to be woken up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WakeupReason {
    /// An event becomes safe to process
    Arrival,
    /// An executing actor reaches its finishing time
    Completion,
    /// A real-time-bound event comes due
    RealTimeDeadline,
}

/// A requested wake-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    /// When to wake up
    pub at: Time,
    /// What the wake-up is for
    pub reason: WakeupReason,
    seq: u64,
}

impl PartialOrd for Wakeup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Wakeup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-queue of wake-ups
#[derive(Debug, Default)]
pub struct WakeupQueue {
    heap: BinaryHeap<Reverse<Wakeup>>,
    next_seq: u64,
}

impl WakeupQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a wake-up at `at`. Requests at `POSITIVE_INFINITY` are dropped.
    pub fn request(&mut self, at: Time, reason: WakeupReason) {
        if at.is_infinite() {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Wakeup { at, reason, seq }));
    }

    /// Earliest pending wake-up
    pub fn peek(&self) -> Option<&Wakeup> {
        self.heap.peek().map(|Reverse(w)| w)
    }

    /// Earliest wake-up strictly after `now`, discarding stale ones
    pub fn pop_after(&mut self, now: Time) -> Option<Wakeup> {
        while let Some(Reverse(wakeup)) = self.heap.pop() {
            if wakeup.at > now {
                return Some(wakeup);
            }
        }
        None
    }

    /// Number of pending wake-ups
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if no wake-up is pending
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
