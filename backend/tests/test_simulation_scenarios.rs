//! End-to-end runs of the ring simulation

use dining_sim_core_rs::events::EventKind;
use dining_sim_core_rs::orchestrator::validate_output;
use dining_sim_core_rs::{ConfigError, Simulation, SimulationConfig, SimulationError};

#[test]
fn test_balanced_three_actor_run() {
    let config = SimulationConfig::new(1.0, vec![1.0; 3], 100.0).with_seed(42);
    let output = Simulation::new(config).unwrap().run().unwrap();

    validate_output(&output).unwrap();
    assert!(output.final_time >= 100.0);
    assert!(output.events_processed > 3);

    for stats in &output.actors {
        assert_eq!(stats.request_log.first(), Some(&0.0));
        assert!(stats.busy_time > 0.0, "actor {} never ate", stats.index);
    }

    // In a ring of three every pair of actors shares a resource, so at most
    // one actor eats at any instant.
    assert!(output.total_busy_time() <= output.final_time);
}

#[test]
fn test_slow_service_fast_requests_starves_neighbours() {
    // Actor 0 eats from t=0 for Exp(0.01); its neighbours keep retrying.
    let config = SimulationConfig::new(0.01, vec![100.0; 3], 1.0).with_seed(42);
    let output = Simulation::new(config).unwrap().run().unwrap();

    assert!(output.actors[1].failed_attempts >= 1);
    assert!(output.actors[2].failed_attempts >= 1);
    assert!(output.total_failed_attempts() > 20);
    assert!(output.total_busy_time() <= output.final_time);
    assert!(!output.starved_actors(0.01).is_empty());
}

#[test]
fn test_events_processed_counts_every_dispatch() {
    let config = SimulationConfig::new(0.8, vec![0.4, 1.2, 0.7, 2.0, 0.3], 50.0).with_seed(11);
    let output = Simulation::new(config).unwrap().run().unwrap();

    let requests: usize = output.actors.iter().map(|a| a.request_count()).sum();
    let finishes = output.total_finish_count() as usize;
    assert_eq!(output.events_processed as usize, requests + finishes);
}

#[test]
fn test_run_discards_pending_events() {
    let config = SimulationConfig::new(1.0, vec![1.0; 5], 20.0).with_seed(3);
    let mut sim = Simulation::new(config).unwrap();
    sim.run().unwrap();

    assert!(sim.is_finished());
    assert_eq!(sim.pending_events(), 0);
    assert!(sim.now() >= sim.horizon());
}

#[test]
fn test_step_until_horizon() {
    let config = SimulationConfig::new(1.0, vec![1.0; 3], 5.0).with_seed(9);
    let mut sim = Simulation::new(config).unwrap();

    let mut last_time = 0.0;
    let mut steps = 0;
    let mut saw_horizon = false;
    while let Some(step) = sim.step().unwrap() {
        assert!(step.event.time >= last_time);
        assert_eq!(step.next.actor, step.event.actor);
        assert!(step.next.time >= step.event.time);
        if step.event.kind == EventKind::Finish {
            assert_eq!(step.next.kind, EventKind::Request);
        }
        assert!(!saw_horizon, "no step may follow the crossing event");
        saw_horizon = step.horizon_reached;
        last_time = step.event.time;
        steps += 1;
    }

    assert!(saw_horizon);
    assert!(steps > 0);
    assert_eq!(sim.events_processed(), steps + 3);
    assert!(sim.step().unwrap().is_none());
    // One live event per actor while not drained
    assert_eq!(sim.pending_events(), 3);
}

#[test]
fn test_tiny_horizon_still_seeds_every_actor() {
    let config = SimulationConfig::new(1.0, vec![1.0; 7], 1e-9).with_seed(1);
    let output = Simulation::new(config).unwrap().run().unwrap();

    assert!(output.actors.iter().all(|a| a.request_log.first() == Some(&0.0)));
    assert!(output.events_processed >= 8);
}

#[test]
fn test_invalid_configs_rejected() {
    let cases = vec![
        (
            SimulationConfig::new(1.0, vec![1.0; 2], 10.0),
            ConfigError::TooFewActors(2),
        ),
        (
            SimulationConfig::new(1.0, vec![1.0; 4], 10.0),
            ConfigError::EvenActorCount(4),
        ),
        (
            SimulationConfig::new(1.0, vec![1.0; 3], 0.0),
            ConfigError::NonPositiveHorizon(0.0),
        ),
        (
            SimulationConfig::new(-1.0, vec![1.0; 3], 10.0),
            ConfigError::NonPositiveServiceRate(-1.0),
        ),
        (
            SimulationConfig::new(1.0, vec![1.0, 0.0, 1.0], 10.0),
            ConfigError::NonPositiveRequestRate { index: 1, rate: 0.0 },
        ),
    ];

    for (config, expected) in cases {
        match Simulation::new(config) {
            Err(SimulationError::InvalidConfig(err)) => assert_eq!(err, expected),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("config should be rejected: {:?}", expected),
        }
    }
}

#[test]
fn test_rate_count_mismatch_rejected() {
    let mut config = SimulationConfig::new(1.0, vec![1.0; 3], 10.0);
    config.num_actors = 5;

    assert!(matches!(
        Simulation::new(config),
        Err(SimulationError::InvalidConfig(ConfigError::RateCountMismatch {
            expected: 5,
            actual: 3
        }))
    ));
}
