#![cfg(feature = "dev")]

use approx::assert_relative_eq;

use knn_rs::internals::algorithms::index::KnnIndex;
use knn_rs::internals::algorithms::predictor::{KnnPredictor, Prediction, PredictionMode};
use knn_rs::internals::math::kernel::WeightFunction;
use knn_rs::internals::primitives::dataset::Dataset;
use knn_rs::internals::primitives::errors::KnnError;

fn weekly_totals() -> Dataset<f64> {
    let rows = [[10.0], [12.0], [30.0]];
    Dataset::regression(["week"], "tot", &rows, &[5.0, 7.0, 50.0]).unwrap()
}

fn real_fake() -> Dataset<f64> {
    let rows = [[1.0, 1.0], [1.0, 2.0], [9.0, 9.0], [9.0, 8.0]];
    Dataset::classification(["x", "y"], "kind", &rows, &["real", "real", "fake", "fake"]).unwrap()
}

// ============================================================================
// Regression Tests
// ============================================================================

#[test]
fn test_regression_mean_of_neighbors() {
    let index = KnnIndex::build(&weekly_totals());
    let predictor = KnnPredictor::new(&index);

    let y = predictor.predict_regression(&[11.0], 2).unwrap();
    assert_relative_eq!(y, 6.0);
}

#[test]
fn test_regression_with_all_neighbors() {
    let index = KnnIndex::build(&weekly_totals());
    let y = KnnPredictor::new(&index).predict_regression(&[0.0], 3).unwrap();
    assert_relative_eq!(y, 62.0 / 3.0);
}

#[test]
fn test_inverse_distance_regression() {
    let rows = [[0.0], [1.0], [4.0]];
    let data = Dataset::regression(["x"], "y", &rows, &[0.0, 10.0, 40.0]).unwrap();
    let index = KnnIndex::build(&data);
    let predictor = KnnPredictor::new(&index).with_weight_function(WeightFunction::Inverse);

    // neighbors: x=1 (d=0.5, w=2), x=0 (d=1.5, w=2/3)
    let y = predictor.predict_regression(&[1.5], 2).unwrap();
    assert_relative_eq!(y, 7.5, epsilon = 1e-12);
}

#[test]
fn test_triangle_kernel_uses_next_neighbor_as_bandwidth() {
    let rows = [[0.0], [1.0], [4.0]];
    let data = Dataset::regression(["x"], "y", &rows, &[0.0, 10.0, 40.0]).unwrap();
    let index = KnnIndex::build(&data);
    let predictor = KnnPredictor::new(&index).with_weight_function(WeightFunction::Triangle);

    // query 0.0: neighbors d=0 (y=0), d=1 (y=10); bandwidth d=4
    // weights 1 and 0.75 -> 7.5 / 1.75
    let y = predictor.predict_regression(&[0.0], 2).unwrap();
    assert_relative_eq!(y, 7.5 / 1.75, epsilon = 1e-12);
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_majority_vote() {
    let data = real_fake();
    let index = KnnIndex::build(&data);
    let (class, probs) = KnnPredictor::new(&index)
        .predict_classification(&[1.0, 1.5], 3)
        .unwrap();

    assert_eq!(data.classes().unwrap()[class], "real");
    let real = data.schema().class_code("real").unwrap();
    let fake = data.schema().class_code("fake").unwrap();
    assert_relative_eq!(probs[real], 2.0 / 3.0);
    assert_relative_eq!(probs[fake], 1.0 / 3.0);
}

#[test]
fn test_vote_tie_prefers_closer_class() {
    let rows = [[0.0], [3.0], [10.0]];
    let data = Dataset::classification(["x"], "c", &rows, &["a", "b", "a"]).unwrap();
    let index = KnnIndex::build(&data);
    let predictor = KnnPredictor::new(&index);

    // one vote each: a at distance 1, b at distance 2
    assert_eq!(predictor.predict_classification(&[1.0], 2).unwrap().0, 0);
    // one vote each: a at distance 2, b at distance 1
    assert_eq!(predictor.predict_classification(&[2.0], 2).unwrap().0, 1);
    // full tie: smaller class code
    assert_eq!(predictor.predict_classification(&[1.5], 2).unwrap().0, 0);
}

#[test]
fn test_probabilities_sum_to_one() {
    let index = KnnIndex::build(&real_fake());
    let predictor = KnnPredictor::new(&index).with_weight_function(WeightFunction::Gaussian);
    for k in 1..=3 {
        let (_, probs) = predictor.predict_classification(&[4.0, 4.0], k).unwrap();
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
}

// ============================================================================
// Batch Tests
// ============================================================================

#[test]
fn test_batch_preserves_row_order() {
    let index = KnnIndex::build(&weekly_totals());
    let queries = Dataset::regression(["week"], "tot", &[[29.0], [11.0]], &[0.0, 0.0]).unwrap();

    let results = KnnPredictor::new(&index)
        .predict_batch(&queries, 1, PredictionMode::Regression)
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].row, 0);
    assert_eq!(results[0].prediction, Prediction::Numeric(50.0));
    assert_eq!(results[1].value(), Some(5.0));
    assert!(results[1].probabilities.is_empty());
}

#[test]
fn test_batch_classification_results() {
    let data = real_fake();
    let index = KnnIndex::build(&data);
    let results = KnnPredictor::new(&index)
        .predict_batch(&data, 1, PredictionMode::Classification)
        .unwrap();

    let predicted: Vec<usize> = results.iter().filter_map(|r| r.class()).collect();
    assert_eq!(predicted, data.class_codes().unwrap());
    assert_eq!(results[0].probabilities.len(), 2);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_mode_must_match_label_kind() {
    let index = KnnIndex::build(&real_fake());
    let predictor = KnnPredictor::new(&index);
    assert!(matches!(
        predictor.predict_regression(&[1.0, 1.0], 1),
        Err(KnnError::SchemaMismatch(_))
    ));

    let index = KnnIndex::build(&weekly_totals());
    let predictor = KnnPredictor::new(&index);
    assert!(matches!(
        predictor.predict_classification(&[1.0], 1),
        Err(KnnError::SchemaMismatch(_))
    ));
}

#[test]
fn test_k_out_of_range() {
    let index = KnnIndex::build(&weekly_totals());
    let predictor = KnnPredictor::new(&index);
    assert!(matches!(
        predictor.predict_regression(&[11.0], 4),
        Err(KnnError::InvalidK { k: 4, max: 3, .. })
    ));
    assert!(matches!(
        predictor.predict_regression(&[11.0], 0),
        Err(KnnError::InvalidK { k: 0, .. })
    ));
}

#[test]
fn test_batch_feature_mismatch() {
    let index = KnnIndex::build(&weekly_totals());
    let other = Dataset::regression(["day"], "tot", &[[1.0]], &[0.0]).unwrap();
    assert!(matches!(
        KnnPredictor::new(&index).predict_batch(&other, 1, PredictionMode::Regression),
        Err(KnnError::SchemaMismatch(_))
    ));
}
