//! End-to-end supervised scenarios: exemplar consistency, match tracking
//! under contradictory labels, Gaussian two-class separation, and the
//! two-module pairing.

use resonance_artmap::{fuzzy_artmap, gaussian_artmap, ArtMap, TrainOutcome};
use resonance_core::config::ExecutionConfig;
use resonance_core::params::{ArtMapParams, FuzzyParams, GaussianParams};
use resonance_core::ArtError;
use resonance_engine::FuzzyRules;

fn fuzzy_map(baseline: f64) -> resonance_artmap::FuzzyArtMap {
    let params = ArtMapParams {
        baseline_vigilance: baseline,
        ..Default::default()
    };
    fuzzy_artmap(
        2,
        FuzzyParams::default(),
        params,
        ExecutionConfig::default(),
    )
    .expect("supervisor")
}

// ---------------------------------------------------------------------------
// Exemplar consistency
// ---------------------------------------------------------------------------

#[test]
fn test_exemplar_dataset_is_reproduced_exactly() {
    let mut map = fuzzy_map(0.5);
    let inputs = vec![
        vec![0.1, 0.1],
        vec![0.9, 0.9],
        vec![0.1, 0.9],
        vec![0.9, 0.1],
    ];
    let labels = vec![0, 1, 2, 3];
    map.fit(&inputs, &labels).expect("fit");
    assert!(map.is_trained());

    let predicted = map.predict(&inputs).expect("predict");
    for (want, got) in labels.iter().zip(predicted.iter()) {
        assert_eq!(Some(*want), *got);
    }
}

#[test]
fn test_shared_label_reuses_categories() {
    let mut map = fuzzy_map(0.5);
    let inputs = vec![
        vec![0.1, 0.1],
        vec![0.12, 0.1],
        vec![0.9, 0.9],
        vec![0.88, 0.9],
    ];
    let labels = vec![0, 0, 1, 1];
    map.fit(&inputs, &labels).expect("fit");

    assert_eq!(map.predict_one(&[0.11, 0.1]).expect("predict"), Some(0));
    assert_eq!(map.predict_one(&[0.89, 0.9]).expect("predict"), Some(1));
    assert!(map.category_count() <= 4);
}

// ---------------------------------------------------------------------------
// Match tracking
// ---------------------------------------------------------------------------

#[test]
fn test_interleaved_labels_force_category_split() {
    let mut map = fuzzy_map(0.5);
    let inputs = vec![
        vec![0.5, 0.5],
        vec![0.51, 0.49],
        vec![0.52, 0.48],
        vec![0.49, 0.51],
    ];
    let labels = vec![0, 1, 0, 1];

    let outcomes = map.fit(&inputs, &labels).expect("fit");
    // every sample trains without a capacity error
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, TrainOutcome::Committed { .. })));
    assert!(map.category_count() >= 2);

    let predicted = map.predict(&inputs).expect("predict");
    let correct = labels
        .iter()
        .zip(predicted.iter())
        .filter(|(want, got)| Some(**want) == **got)
        .count();
    assert!(correct * 2 >= labels.len(), "accuracy below one half");
}

#[test]
fn test_conflicts_never_overwrite_map_entries() {
    let mut map = fuzzy_map(0.5);
    map.partial_fit(&[vec![0.5, 0.5]], &[0]).expect("fit");
    let categories_before = map.category_count();

    // an almost identical input with a contradictory label
    map.partial_fit(&[vec![0.5001, 0.4999]], &[1]).expect("fit");

    // the original association survived; the conflict grew the store instead
    assert_eq!(map.predict_one(&[0.5, 0.5]).expect("predict"), Some(0));
    assert!(map.category_count() > categories_before);
}

#[test]
fn test_search_cap_discards_instead_of_erroring() {
    let params = ArtMapParams {
        baseline_vigilance: 0.5,
        max_search_attempts: 1,
        ..Default::default()
    };
    let mut map = fuzzy_artmap(
        2,
        FuzzyParams::default(),
        params,
        ExecutionConfig::default(),
    )
    .expect("supervisor");

    map.partial_fit(&[vec![0.5, 0.5]], &[0]).expect("fit");
    let outcome = map
        .train_one(&[0.5001, 0.4999], 1)
        .expect("train survives the cap");
    assert_eq!(outcome, TrainOutcome::Discarded);
}

// ---------------------------------------------------------------------------
// Gaussian ARTMAP
// ---------------------------------------------------------------------------

#[test]
fn test_gaussian_two_class_separation() {
    let params = ArtMapParams {
        baseline_vigilance: 0.5,
        ..Default::default()
    };
    let mut map = gaussian_artmap(
        2,
        GaussianParams::default(),
        params,
        ExecutionConfig::default(),
    )
    .expect("supervisor");

    let inputs = vec![
        vec![0.1, 0.1],
        vec![0.12, 0.09],
        vec![0.11, 0.12],
        vec![0.9, 0.9],
        vec![0.88, 0.91],
        vec![0.92, 0.89],
    ];
    let labels = vec![0, 0, 0, 1, 1, 1];
    map.fit(&inputs, &labels).expect("fit");

    assert_eq!(map.predict_one(&[0.12, 0.12]).expect("predict"), Some(0));
    assert_eq!(map.predict_one(&[0.88, 0.88]).expect("predict"), Some(1));
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_predict_before_training_is_lifecycle_error() {
    let map = fuzzy_map(0.5);
    assert!(matches!(
        map.predict_one(&[0.5, 0.5]).unwrap_err(),
        ArtError::Lifecycle(_)
    ));
}

#[test]
fn test_mismatched_fit_arrays_are_rejected() {
    let mut map = fuzzy_map(0.5);
    let err = map
        .fit(&[vec![0.1, 0.1], vec![0.2, 0.2]], &[0])
        .unwrap_err();
    assert!(matches!(err, ArtError::InputShape(_)));

    let err = map.fit(&[], &[]).unwrap_err();
    assert!(matches!(err, ArtError::InputShape(_)));
}

#[test]
fn test_clear_resets_training_flag() {
    let mut map = fuzzy_map(0.5);
    map.partial_fit(&[vec![0.2, 0.8]], &[4]).expect("fit");
    assert!(map.is_trained());

    map.clear().expect("clear");
    assert!(!map.is_trained());
    assert_eq!(map.category_count(), 0);
    assert!(map.map_field().is_empty());
}

#[test]
fn test_close_fences_training() {
    let mut map = fuzzy_map(0.5);
    map.partial_fit(&[vec![0.2, 0.8]], &[4]).expect("fit");
    map.close();
    map.close();
    assert!(map.is_closed());
    assert!(matches!(
        map.train_one(&[0.2, 0.8], 4).unwrap_err(),
        ArtError::Lifecycle(_)
    ));
}

// ---------------------------------------------------------------------------
// Two-module pairing
// ---------------------------------------------------------------------------

#[test]
fn test_two_module_artmap_recalls_target_prototype() {
    let params = ArtMapParams {
        baseline_vigilance: 0.5,
        ..Default::default()
    };
    let rules_a = FuzzyRules::new(2, FuzzyParams::default()).expect("rules");
    let rules_b = FuzzyRules::new(2, FuzzyParams::default()).expect("rules");
    let mut map =
        ArtMap::new(rules_a, rules_b, params, ExecutionConfig::default()).expect("artmap");

    let inputs = vec![vec![0.1, 0.1], vec![0.9, 0.9]];
    let targets = vec![vec![0.2, 0.8], vec![0.8, 0.2]];
    map.fit(&inputs, &targets).expect("fit");
    assert!(map.is_trained());
    assert_eq!(map.category_count_b(), 2);

    let recalled = map
        .predict_one(&[0.11, 0.1])
        .expect("predict")
        .expect("match");
    // the recalled prototype is the complement-coded first target
    assert!((recalled.components()[0] - 0.2).abs() < 1e-9);
    assert!((recalled.components()[1] - 0.8).abs() < 1e-9);
}
