//! Grid-world style scenarios for the reinforcement head.

use resonance_core::config::ExecutionConfig;
use resonance_core::params::{FalconParams, TdParams};
use resonance_falcon::{FalconEngine, TdFalcon};

fn one_hot(index: usize, len: usize) -> Vec<f64> {
    let mut v = vec![0.0; len];
    v[index] = 1.0;
    v
}

fn action_space() -> Vec<Vec<f64>> {
    (0..4).map(|i| one_hot(i, 4)).collect()
}

fn greedy_params() -> FalconParams {
    FalconParams {
        exploration_rate: 0.0,
        ..Default::default()
    }
}

#[test]
fn test_trained_action_is_preferred_from_each_state() {
    let mut falcon =
        FalconEngine::new(4, 4, greedy_params(), ExecutionConfig::default()).expect("engine");
    let actions = action_space();

    falcon.learn(&one_hot(0, 4), &actions[3], 0.0).expect("learn");
    falcon.learn(&one_hot(1, 4), &actions[1], 1.0).expect("learn");
    falcon.learn(&one_hot(2, 4), &actions[3], 1.0).expect("learn");
    assert_eq!(falcon.category_count(), 3);

    // even a zero-reward experience beats never-tried actions
    assert_eq!(
        falcon.select_action(&one_hot(0, 4), &actions).expect("select"),
        3
    );
    assert_eq!(
        falcon.select_action(&one_hot(1, 4), &actions).expect("select"),
        1
    );
    assert_eq!(
        falcon.select_action(&one_hot(2, 4), &actions).expect("select"),
        3
    );
}

#[test]
fn test_q_estimates_are_bounded_and_reflect_reward() {
    let mut falcon =
        FalconEngine::new(4, 4, greedy_params(), ExecutionConfig::default()).expect("engine");
    let actions = action_space();

    falcon.learn(&one_hot(1, 4), &actions[1], 1.0).expect("learn");
    falcon.learn(&one_hot(0, 4), &actions[3], 0.0).expect("learn");

    for state in 0..4 {
        for action in &actions {
            let q = falcon.predict_q(&one_hot(state, 4), action).expect("q");
            assert!((0.0..=1.0).contains(&q), "q = {q}");
        }
    }
    assert!((falcon.predict_q(&one_hot(1, 4), &actions[1]).expect("q") - 1.0).abs() < 1e-9);
    assert!(falcon.predict_q(&one_hot(0, 4), &actions[3]).expect("q") < 1e-9);
}

#[test]
fn test_seeded_exploration_is_reproducible() {
    let params = FalconParams {
        exploration_rate: 0.5,
        seed: 99,
        ..Default::default()
    };
    let actions = action_space();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut falcon =
            FalconEngine::new(4, 4, params, ExecutionConfig::default()).expect("engine");
        falcon.learn(&one_hot(0, 4), &actions[2], 1.0).expect("learn");
        let choices: Vec<usize> = (0..20)
            .map(|_| falcon.select_action(&one_hot(0, 4), &actions).expect("select"))
            .collect();
        runs.push(choices);
    }
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn test_empty_action_space_is_contract_error() {
    let mut falcon =
        FalconEngine::new(4, 4, greedy_params(), ExecutionConfig::default()).expect("engine");
    assert!(matches!(
        falcon.select_action(&one_hot(0, 4), &[]).unwrap_err(),
        resonance_core::ArtError::NullContract(_)
    ));
}

// ---------------------------------------------------------------------------
// TD-FALCON
// ---------------------------------------------------------------------------

#[test]
fn test_sarsa_bootstraps_toward_observed_reward() {
    let mut agent = TdFalcon::new(
        4,
        4,
        greedy_params(),
        TdParams::default(),
        ExecutionConfig::default(),
    )
    .expect("agent");
    let actions = action_space();

    agent
        .sarsa_step(&one_hot(1, 4), 1, 1.0, &one_hot(2, 4), 2, &actions)
        .expect("step");

    let q = agent.predict_q(&one_hot(1, 4), &actions[1]).expect("q");
    assert!((q - 1.0).abs() < 1e-9);
    assert_eq!(agent.active_traces().len(), 1);
}

#[test]
fn test_traces_propagate_credit_backward() {
    let mut agent = TdFalcon::new(
        4,
        4,
        greedy_params(),
        TdParams::default(),
        ExecutionConfig::default(),
    )
    .expect("agent");
    let actions = action_space();

    // a zero-reward transit step, then a rewarded step
    agent
        .sarsa_step(&one_hot(0, 4), 0, 0.0, &one_hot(1, 4), 1, &actions)
        .expect("step");
    let q_before = agent.predict_q(&one_hot(0, 4), &actions[0]).expect("q");

    agent
        .sarsa_step(&one_hot(1, 4), 1, 1.0, &one_hot(2, 4), 2, &actions)
        .expect("step");
    let q_after = agent.predict_q(&one_hot(0, 4), &actions[0]).expect("q");

    assert!(q_before < 1e-9);
    assert!(
        q_after > q_before,
        "trace should pull earlier Q up, got {q_after}"
    );
}

#[test]
fn test_traces_decay_to_zero() {
    let td = TdParams {
        lambda: 0.1,
        gamma_td: 0.5,
        ..Default::default()
    };
    let mut agent = TdFalcon::new(4, 4, greedy_params(), td, ExecutionConfig::default())
        .expect("agent");
    let actions = action_space();

    agent
        .sarsa_step(&one_hot(0, 4), 0, 0.0, &one_hot(1, 4), 1, &actions)
        .expect("step");
    // keep stepping elsewhere; the old trace decays by γλ = 0.05 per step
    for step in 0..8 {
        let state = one_hot((step % 3) + 1, 4);
        let next = one_hot(((step + 1) % 3) + 1, 4);
        agent
            .sarsa_step(&state, 2, 0.0, &next, 2, &actions)
            .expect("step");
    }

    // every surviving trace sits above the drop threshold
    for (_, value) in agent.active_traces() {
        assert!(value >= agent.td_params().trace_threshold);
    }

    agent.clear().expect("clear");
    assert_eq!(agent.category_count(), 0);
    assert!(agent.active_traces().is_empty());
}
