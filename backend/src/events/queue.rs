//! Event timeline
//!
//! A binary min-heap of pending events. Ordering is total and
//! deterministic so that replays with the same seed pop events in the
//! same sequence:
//!
//! 1. earlier `time` first (compared with `f64::total_cmp`)
//! 2. on equal time, lower actor index first
//! 3. on equal time and actor, earlier insertion first
//!
//! Step 3 cannot trigger during a normal run (each actor has exactly one
//! live event) but keeps the order total for arbitrary pushes.

use crate::events::types::ScheduledEvent;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct QueueEntry {
    event: ScheduledEvent,
    seq: u64,
}

impl QueueEntry {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.event
            .time
            .total_cmp(&other.event.time)
            .then_with(|| self.event.actor.cmp(&other.event.actor))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so the max-heap yields the earliest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other).reverse()
    }
}

/// Priority queue of pending events, earliest first
///
/// # Example
/// ```
/// use dining_sim_core_rs::events::{EventQueue, ScheduledEvent};
///
/// let mut queue = EventQueue::new();
/// queue.push(ScheduledEvent::request(1, 2.0));
/// queue.push(ScheduledEvent::request(0, 0.5));
///
/// assert_eq!(queue.pop_earliest().unwrap().actor, 0);
/// assert_eq!(queue.pop_earliest().unwrap().actor, 1);
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: BinaryHeap<QueueEntry>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue with room for `capacity` events
    ///
    /// A running simulation holds exactly one event per actor.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Insert an event in O(log n)
    pub fn push(&mut self, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueueEntry { event, seq });
    }

    /// Remove and return the earliest event in O(log n)
    pub fn pop_earliest(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop().map(|entry| entry.event)
    }

    /// Earliest event without removing it
    pub fn peek_earliest(&self) -> Option<&ScheduledEvent> {
        self.heap.peek().map(|entry| &entry.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending event without processing it
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
