//! Cross-variant integration tests: clustering scenarios, determinism
//! across parallelism levels and SIMD settings, and lifecycle laws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resonance_core::config::ExecutionConfig;
use resonance_core::params::{Art1Params, FuzzyParams};
use resonance_core::ArtError;
use resonance_engine::{art1, fuzzy_art, FuzzyArt};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn fuzzy_engine(vigilance: f64, config: ExecutionConfig) -> FuzzyArt {
    let params = FuzzyParams {
        vigilance,
        ..Default::default()
    };
    fuzzy_art(2, params, config).expect("engine")
}

// ---------------------------------------------------------------------------
// Clustering scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_distinct_corner_clustering() {
    let mut art = fuzzy_engine(0.5, ExecutionConfig::default());
    let stream = [
        [0.0, 0.0],
        [0.0, 0.08],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
    ];
    let mut indices = Vec::new();
    for input in &stream {
        indices.push(art.learn(input).expect("learn").index().expect("resonance"));
    }

    let count = art.category_count();
    assert!((2..=4).contains(&count), "got {count} categories");

    // the three far corners each landed in their own category
    let corners = [indices[2], indices[3], indices[4]];
    assert_ne!(corners[0], corners[1]);
    assert_ne!(corners[1], corners[2]);
    assert_ne!(corners[0], corners[2]);
}

#[test]
fn test_binary_pattern_separation() {
    let params = Art1Params {
        vigilance: 0.9,
        l: 2.0,
    };
    let mut art = art1(4, params, ExecutionConfig::default()).expect("engine");
    art.learn(&[1.0, 1.0, 0.0, 0.0]).expect("learn");
    art.learn(&[0.0, 0.0, 1.0, 1.0]).expect("learn");

    assert_eq!(art.category_count(), 2);
    assert_eq!(
        art.predict(&[1.0, 1.0, 0.0, 0.0]).expect("predict").index(),
        Some(0)
    );
    assert_eq!(
        art.predict(&[0.0, 0.0, 1.0, 1.0]).expect("predict").index(),
        Some(1)
    );
}

#[test]
fn test_vigilance_monotonicity_on_random_streams() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..5 {
        let stream: Vec<[f64; 2]> = (0..24).map(|_| [rng.gen(), rng.gen()]).collect();
        let counts: Vec<usize> = [0.15, 0.85]
            .iter()
            .map(|&vigilance| {
                let mut art = fuzzy_engine(vigilance, ExecutionConfig::default());
                for input in &stream {
                    art.learn(input).expect("learn");
                }
                art.category_count()
            })
            .collect();
        assert!(
            counts[1] >= counts[0],
            "round {round}: tight vigilance produced fewer categories ({} < {})",
            counts[1],
            counts[0]
        );
    }
}

#[test]
fn test_vigilance_monotonicity() {
    let stream = [[0.1, 0.2], [0.3, 0.4], [0.5, 0.6], [0.7, 0.8]];
    let mut last_count = 0;
    for vigilance in [0.1, 0.3, 0.5, 0.7, 0.9] {
        let mut art = fuzzy_engine(vigilance, ExecutionConfig::default());
        for input in &stream {
            art.learn(input).expect("learn");
        }
        let count = art.category_count();
        assert!(
            count >= last_count,
            "vigilance {vigilance} produced {count} < {last_count}"
        );
        last_count = count;
    }
}

#[test]
fn test_category_growth_and_index_sequentiality() {
    let mut art = fuzzy_engine(0.85, ExecutionConfig::default());
    let n = 40;
    let mut seen = std::collections::BTreeSet::new();
    for i in 0..n {
        let x = (i % 7) as f64 / 7.0;
        let y = ((i * 3) % 5) as f64 / 5.0;
        let index = art
            .learn(&[x, y])
            .expect("learn")
            .index()
            .expect("resonance");
        seen.insert(index);
    }

    let count = art.category_count();
    assert!(count >= 1 && count <= n);
    // indices used are exactly 0..count
    let expected: std::collections::BTreeSet<usize> = (0..count).collect();
    assert_eq!(seen, expected);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

fn run_stream(config: ExecutionConfig) -> (Vec<usize>, Vec<Option<usize>>) {
    let mut art = fuzzy_engine(0.8, config);
    // enough scattered inputs to cross the parallel threshold
    let stream: Vec<[f64; 2]> = (0..120)
        .map(|i| {
            [
                ((i * 13) % 97) as f64 / 97.0,
                ((i * 29) % 83) as f64 / 83.0,
            ]
        })
        .collect();

    let mut learned = Vec::new();
    for input in &stream {
        learned.push(art.learn(input).expect("learn").index().expect("resonance"));
    }
    let predicted = stream
        .iter()
        .map(|input| art.predict(input).expect("predict").index())
        .collect();
    (learned, predicted)
}

#[test]
fn test_outcomes_identical_across_parallelism_levels() {
    let base = run_stream(ExecutionConfig {
        parallelism_level: 1,
        ..Default::default()
    });

    for level in [2usize, 4, 8] {
        let config = ExecutionConfig {
            parallelism_level: level,
            parallel_threshold: 4,
            ..Default::default()
        };
        let run = run_stream(config);
        assert_eq!(base.0, run.0, "learn indices diverged at level {level}");
        assert_eq!(base.1, run.1, "predict indices diverged at level {level}");
    }
}

#[test]
fn test_outcomes_identical_with_and_without_simd() {
    let scalar = run_stream(ExecutionConfig {
        enable_simd: false,
        ..Default::default()
    });
    let simd = run_stream(ExecutionConfig {
        enable_simd: true,
        ..Default::default()
    });
    assert_eq!(scalar.0, simd.0);
    assert_eq!(scalar.1, simd.1);
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let first = run_stream(ExecutionConfig::default());
    let second = run_stream(ExecutionConfig::default());
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_clear_resets_and_relearns_from_zero() {
    let mut art = fuzzy_engine(0.7, ExecutionConfig::default());
    art.learn(&[0.2, 0.4]).expect("learn");
    art.learn(&[0.9, 0.1]).expect("learn");
    art.clear().expect("clear");
    assert_eq!(art.category_count(), 0);

    let outcome = art.learn(&[0.5, 0.5]).expect("learn");
    assert_eq!(outcome.index(), Some(0));
}

#[test]
fn test_close_is_idempotent_and_fences_operations() {
    let mut art = fuzzy_engine(0.7, ExecutionConfig::default());
    art.learn(&[0.2, 0.4]).expect("learn");
    art.close();
    art.close();
    assert!(art.is_closed());

    assert!(matches!(
        art.learn(&[0.2, 0.4]).unwrap_err(),
        ArtError::Lifecycle(_)
    ));
    assert!(matches!(
        art.predict(&[0.2, 0.4]).unwrap_err(),
        ArtError::Lifecycle(_)
    ));
    assert!(matches!(art.clear().unwrap_err(), ArtError::Lifecycle(_)));
}

#[test]
fn test_empty_fit_is_input_error() {
    let mut art = fuzzy_engine(0.7, ExecutionConfig::default());
    assert!(matches!(art.fit(&[]).unwrap_err(), ArtError::InputShape(_)));
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

#[test]
fn test_counters_move_during_training() {
    let config = ExecutionConfig {
        parallelism_level: 4,
        parallel_threshold: 2,
        ..Default::default()
    };
    let mut art = fuzzy_engine(0.9, config);
    for i in 0..32 {
        let x = (i % 8) as f64 / 8.0;
        art.learn(&[x, 1.0 - x]).expect("learn");
    }

    let stats = art.performance_stats();
    assert!(stats.total_vector_operations > 0);
    assert!(stats.total_parallel_tasks > 0);
    assert_eq!(stats.category_count as usize, art.category_count());
    assert!(stats.throughput_ops_per_sec > 0.0);

    art.reset_performance_tracking();
    let stats = art.performance_stats();
    assert_eq!(stats.total_vector_operations, 0);
    assert_eq!(stats.category_count as usize, art.category_count());
}
