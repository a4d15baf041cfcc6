//! Event queue ordering tests

use dining_sim_core_rs::events::{EventKind, EventQueue, ScheduledEvent};

fn drain(queue: &mut EventQueue) -> Vec<ScheduledEvent> {
    std::iter::from_fn(|| queue.pop_earliest()).collect()
}

#[test]
fn test_earliest_time_first() {
    let mut queue = EventQueue::new();
    queue.push(ScheduledEvent::request(0, 5.0));
    queue.push(ScheduledEvent::finish(1, 0.25));
    queue.push(ScheduledEvent::request(2, 3.0));

    let times: Vec<f64> = drain(&mut queue).iter().map(|e| e.time).collect();
    assert_eq!(times, vec![0.25, 3.0, 5.0]);
}

#[test]
fn test_equal_times_pop_by_actor_index() {
    let mut queue = EventQueue::new();
    for actor in [4, 0, 3, 1, 2] {
        queue.push(ScheduledEvent::request(actor, 0.0));
    }

    let order: Vec<usize> = drain(&mut queue).iter().map(|e| e.actor).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_equal_time_and_actor_pop_in_insertion_order() {
    let mut queue = EventQueue::new();
    queue.push(ScheduledEvent::finish(1, 2.0));
    queue.push(ScheduledEvent::request(1, 2.0));

    let kinds: Vec<EventKind> = drain(&mut queue).iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Finish, EventKind::Request]);
}

#[test]
fn test_peek_len_and_clear() {
    let mut queue = EventQueue::with_capacity(3);
    assert!(queue.is_empty());
    assert!(queue.peek_earliest().is_none());

    queue.push(ScheduledEvent::request(2, 1.0));
    queue.push(ScheduledEvent::request(0, 0.5));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.peek_earliest().map(|e| e.actor), Some(0));
    assert_eq!(queue.len(), 2, "peek must not remove");

    queue.clear();
    assert!(queue.is_empty());
    assert!(queue.pop_earliest().is_none());
}

#[test]
fn test_interleaved_push_pop_keeps_order() {
    let mut queue = EventQueue::new();
    queue.push(ScheduledEvent::request(0, 1.0));
    queue.push(ScheduledEvent::request(1, 4.0));

    assert_eq!(queue.pop_earliest().map(|e| e.time), Some(1.0));
    queue.push(ScheduledEvent::finish(0, 2.0));
    queue.push(ScheduledEvent::request(2, 4.0));

    let popped: Vec<(usize, f64)> = drain(&mut queue).iter().map(|e| (e.actor, e.time)).collect();
    assert_eq!(popped, vec![(0, 2.0), (1, 4.0), (2, 4.0)]);
}
