//! Ring wiring and time-zero seeding

use dining_sim_core_rs::{ActorState, Simulation, SimulationConfig, SimulationState};

#[test]
fn test_actor_i_holds_resources_i_and_next() {
    let state = SimulationState::ring(1.0, &[0.5; 5]).unwrap();

    assert_eq!(state.num_actors(), 5);
    assert_eq!(state.resources().len(), 5);
    for (i, actor) in state.actors().iter().enumerate() {
        assert_eq!(actor.index(), i);
        assert_eq!(actor.left(), i);
        assert_eq!(actor.right(), (i + 1) % 5);
    }

    let third = state.actor(3).unwrap();
    assert_eq!((third.left(), third.right()), (3, 4));
    let last = state.actor(4).unwrap();
    assert_eq!((last.left(), last.right()), (4, 0));
}

#[test]
fn test_every_resource_shared_by_exactly_two_actors() {
    let state = SimulationState::ring(1.0, &[1.0; 7]).unwrap();

    for j in 0..7 {
        let users = state
            .actors()
            .iter()
            .filter(|a| a.left() == j || a.right() == j)
            .count();
        assert_eq!(users, 2, "resource {} should have two neighbours", j);
    }
}

#[test]
fn test_fresh_ring_is_idle() {
    let state = SimulationState::ring(2.0, &[0.1, 0.2, 0.3]).unwrap();

    assert_eq!(state.eating_count(), 0);
    assert_eq!(state.held_count(), 0);
    assert!(state.actors().iter().all(|a| a.state() == ActorState::Waiting));
    assert_eq!(state.actor(1).unwrap().request_rate(), 0.2);
    assert!(state.actor(3).is_none());
    state.check_invariants().unwrap();
}

#[test]
fn test_seeding_dispatches_requests_in_index_order() {
    // At t=0 actor 0 takes resources 0 and 1, so actor 1 is denied, actor 2
    // takes 2 and 3, and actors 3 and 4 find a held neighbour.
    let config = SimulationConfig::new(1.0, vec![1.0; 5], 10.0).with_seed(42);
    let mut sim = Simulation::new(config).unwrap();
    sim.start().unwrap();

    let eating: Vec<bool> = sim.state().actors().iter().map(|a| a.is_eating()).collect();
    assert_eq!(eating, vec![true, false, true, false, false]);

    let failed: Vec<u64> = sim
        .state()
        .actors()
        .iter()
        .map(|a| a.failed_attempts())
        .collect();
    assert_eq!(failed, vec![0, 1, 0, 1, 1]);

    assert_eq!(sim.events_processed(), 5);
    assert_eq!(sim.pending_events(), 5);
    assert_eq!(sim.now(), 0.0);
    assert!(sim
        .state()
        .actors()
        .iter()
        .all(|a| a.request_log() == [0.0]));
    assert_eq!(sim.state().held_count(), 4);
}

#[test]
fn test_three_actor_seeding() {
    let config = SimulationConfig::new(1.0, vec![1.0; 3], 10.0);
    let mut sim = Simulation::new(config).unwrap();
    sim.start().unwrap();
    sim.start().unwrap(); // second call is a no-op

    let eating: Vec<bool> = sim.state().actors().iter().map(|a| a.is_eating()).collect();
    assert_eq!(eating, vec![true, false, false]);
    assert_eq!(sim.events_processed(), 3);
}
