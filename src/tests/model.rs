// src/tests/model.rs
use crate::errors::ModelError;
use crate::model::{KnnClassifier, LinearClassifier, ModelArtifact, ModelHandle, Predictor};

const BUNDLED_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/model.json");

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn three_class_linear() -> LinearClassifier {
    LinearClassifier::new(
        labels(&["a", "b", "c"]),
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
        vec![0.0, 0.0, 0.0],
    )
    .expect("valid linear model")
}

#[test]
fn linear_picks_highest_score() {
    let model = three_class_linear();
    assert_eq!(model.predict(&[2.0, 1.0]).unwrap(), "a");
    assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), "b");
    assert_eq!(model.predict(&[-3.0, -3.0]).unwrap(), "c");
}

#[test]
fn linear_tie_goes_to_first_class() {
    let model = three_class_linear();
    assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), "a");
}

#[test]
fn linear_intercepts_shift_scores() {
    let model = LinearClassifier::new(
        labels(&["low", "high"]),
        vec![vec![0.0], vec![0.0]],
        vec![-1.0, 1.0],
    )
    .unwrap();
    assert_eq!(model.predict(&[42.0]).unwrap(), "high");
}

#[test]
fn linear_rejects_wrong_feature_count() {
    let model = three_class_linear();
    match model.predict(&[1.0, 2.0, 3.0]) {
        Err(ModelError::FeatureCount { expected, actual }) => {
            assert_eq!(expected, 2);
            assert_eq!(actual, 3);
        }
        other => panic!("expected feature count error, got {other:?}"),
    }
}

#[test]
fn linear_rejects_non_finite_features() {
    let model = three_class_linear();
    for sample in [[f64::NAN, 0.0], [0.0, f64::INFINITY], [f64::NEG_INFINITY, 1.0]] {
        assert!(
            matches!(model.predict(&sample), Err(ModelError::NonFinite { .. })),
            "{sample:?} should be refused"
        );
    }
}

#[test]
fn linear_rejects_overflowing_scores() {
    // both finite, but the third row sums to -inf
    let model = three_class_linear();
    match model.predict(&[1e308, 1e308]) {
        Err(ModelError::NonFinite { context }) => assert_eq!(context, "score for class 2"),
        other => panic!("expected non-finite error, got {other:?}"),
    }
}

#[test]
fn linear_rejects_missing_intercepts() {
    let result = LinearClassifier::new(labels(&["a", "b"]), vec![vec![1.0], vec![2.0]], vec![0.0]);
    assert!(matches!(result, Err(ModelError::Shape { .. })));
}

#[test]
fn linear_rejects_ragged_weights() {
    let result = LinearClassifier::new(
        labels(&["a", "b"]),
        vec![vec![1.0, 2.0], vec![2.0]],
        vec![0.0, 0.0],
    );
    assert!(matches!(result, Err(ModelError::Shape { .. })));
}

#[test]
fn knn_majority_vote() {
    let model = KnnClassifier::new(
        3,
        vec![vec![0.0], vec![0.1], vec![0.2], vec![5.0], vec![5.1]],
        labels(&["near", "near", "near", "far", "far"]),
    )
    .unwrap();
    assert_eq!(model.predict(&[0.05]).unwrap(), "near");
    assert_eq!(model.predict(&[4.9]).unwrap(), "far");
}

#[test]
fn knn_vote_outweighs_single_nearest_sample() {
    let model = KnnClassifier::new(
        3,
        vec![vec![0.0], vec![1.0], vec![1.1]],
        labels(&["a", "b", "b"]),
    )
    .unwrap();
    assert_eq!(model.predict(&[0.4]).unwrap(), "b");
}

#[test]
fn knn_tied_vote_prefers_nearest_label() {
    let model = KnnClassifier::new(2, vec![vec![0.0], vec![1.0]], labels(&["a", "b"])).unwrap();
    assert_eq!(model.predict(&[0.4]).unwrap(), "a");
    assert_eq!(model.predict(&[0.6]).unwrap(), "b");
}

#[test]
fn knn_rejects_non_finite_features() {
    let model = KnnClassifier::new(1, vec![vec![0.0, 0.0]], labels(&["a"])).unwrap();
    for sample in [[f64::NAN, 0.0], [0.0, f64::INFINITY]] {
        assert!(matches!(model.predict(&sample), Err(ModelError::NonFinite { .. })));
    }
}

#[test]
fn knn_rejects_overflowing_distance() {
    let model = KnnClassifier::new(1, vec![vec![0.0], vec![1.0]], labels(&["a", "b"])).unwrap();
    match model.predict(&[1e308]) {
        Err(ModelError::NonFinite { context }) => assert_eq!(context, "distance to sample 0"),
        other => panic!("expected non-finite error, got {other:?}"),
    }
}

#[test]
fn knn_k_larger_than_samples_uses_all() {
    let model = KnnClassifier::new(
        10,
        vec![vec![0.0], vec![1.0], vec![2.0]],
        labels(&["x", "y", "y"]),
    )
    .unwrap();
    assert_eq!(model.predict(&[0.0]).unwrap(), "y");
}

#[test]
fn knn_rejects_zero_k_and_label_mismatch() {
    assert!(KnnClassifier::new(0, vec![vec![1.0]], labels(&["a"])).is_err());
    assert!(KnnClassifier::new(1, vec![vec![1.0], vec![2.0]], labels(&["a"])).is_err());
    assert!(KnnClassifier::new(1, Vec::new(), Vec::new()).is_err());
}

#[test]
fn knn_classes_in_first_seen_order() {
    let model = KnnClassifier::new(
        1,
        vec![vec![0.0], vec![1.0], vec![2.0]],
        labels(&["b", "a", "b"]),
    )
    .unwrap();
    assert_eq!(model.classes(), labels(&["b", "a"]));
}

#[test]
fn artifact_parses_tagged_linear() {
    let json = r#"{
        "algorithm": "linear",
        "classes": ["setosa", "versicolor", "virginica"],
        "weights": [[0.4, 1.0, -2.2, -1.0], [0.5, -1.5, 0.4, -0.9], [-0.9, 0.5, 1.8, 1.9]],
        "intercepts": [9.0, 2.0, -11.0]
    }"#;
    let predictor = ModelArtifact::from_slice(json.as_bytes())
        .unwrap()
        .into_predictor()
        .unwrap();
    assert_eq!(predictor.algorithm(), "linear");
    assert_eq!(predictor.n_features(), 4);
    assert_eq!(
        predictor.feature_names(),
        labels(&["sepal_length", "sepal_width", "petal_length", "petal_width"]).as_slice()
    );
}

#[test]
fn artifact_defaults_generic_feature_names() {
    let json = r#"{"algorithm": "knn", "k": 1, "samples": [[1.0, 2.0]], "labels": ["a"]}"#;
    let predictor = ModelArtifact::from_slice(json.as_bytes())
        .unwrap()
        .into_predictor()
        .unwrap();
    assert_eq!(predictor.feature_names(), labels(&["feature_0", "feature_1"]).as_slice());
}

#[test]
fn artifact_rejects_feature_name_count_mismatch() {
    let json = r#"{"algorithm": "knn", "k": 1, "samples": [[1.0, 2.0]], "labels": ["a"],
                  "feature_names": ["only_one"]}"#;
    let result = ModelArtifact::from_slice(json.as_bytes())
        .unwrap()
        .into_predictor();
    assert!(matches!(result, Err(ModelError::Shape { .. })));
}

#[test]
fn artifact_rejects_unknown_algorithm() {
    let json = r#"{"algorithm": "forest", "trees": []}"#;
    assert!(matches!(
        ModelArtifact::from_slice(json.as_bytes()),
        Err(ModelError::Parse { .. })
    ));
}

#[test]
fn handle_fingerprint_is_sha256_of_bytes() {
    let bytes = br#"{"algorithm": "knn", "k": 1, "samples": [[1.0]], "labels": ["a"]}"#;
    let first = ModelHandle::from_bytes(bytes).unwrap();
    let second = ModelHandle::from_bytes(bytes).unwrap();
    assert_eq!(first.fingerprint().len(), 64);
    assert!(first.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.short_fingerprint().len(), 12);
}

#[test]
fn handle_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let result = ModelHandle::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ModelError::Io { .. })));
}

#[test]
fn handle_load_corrupt_file_is_parse_error() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("model.json");
    std::fs::write(&path, b"\x80\x04\x95 not json").unwrap();
    assert!(matches!(ModelHandle::load(&path), Err(ModelError::Parse { .. })));
}

#[test]
fn bundled_model_classifies_iris_samples() {
    let model = ModelHandle::load(BUNDLED_MODEL).expect("bundled model loads");
    assert_eq!(model.n_features(), 4);
    assert_eq!(model.classes(), labels(&["setosa", "versicolor", "virginica"]));
    assert_eq!(model.source(), Some(std::path::Path::new(BUNDLED_MODEL)));

    assert_eq!(model.predict(&[5.1, 3.5, 1.4, 0.2]).unwrap(), "setosa");
    assert_eq!(model.predict(&[6.0, 2.8, 4.4, 1.4]).unwrap(), "versicolor");
    assert_eq!(model.predict(&[6.7, 3.0, 5.8, 2.3]).unwrap(), "virginica");
}

#[test]
fn bundled_model_refuses_nan_and_huge_values() {
    let model = ModelHandle::load(BUNDLED_MODEL).unwrap();
    for sample in [[f64::NAN; 4], [f64::INFINITY, 3.5, 1.4, 0.2], [1e308, 3.5, 1.4, 0.2]] {
        assert!(
            matches!(model.predict(&sample), Err(ModelError::NonFinite { .. })),
            "{sample:?} should be refused"
        );
    }
}

#[test]
fn bundled_model_is_deterministic() {
    let model = ModelHandle::load(BUNDLED_MODEL).unwrap();
    let sample = [5.9, 3.0, 5.1, 1.8];
    let first = model.predict(&sample).unwrap();
    for _ in 0..10 {
        assert_eq!(model.predict(&sample).unwrap(), first);
    }
}
