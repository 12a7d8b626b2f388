#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use knn_rs::internals::math::distance::DistanceMetric;

// ============================================================================
// Euclidean Distance Tests
// ============================================================================

#[test]
fn test_euclidean_distance_1d() {
    let a = [1.0];
    let b = [4.0];
    let dist = DistanceMetric::euclidean(&a, &b);
    assert_relative_eq!(dist, 3.0);
}

#[test]
fn test_euclidean_distance_2d() {
    let a = [0.0, 0.0];
    let b = [3.0, 4.0];
    let dist = DistanceMetric::euclidean(&a, &b);
    assert_relative_eq!(dist, 5.0);
}

#[test]
fn test_euclidean_distance_3d() {
    let a = [1.0, 2.0, 3.0];
    let b = [4.0, 6.0, 8.0];
    // diffs: 3, 4, 5. sum_sq: 9+16+25=50
    let dist = DistanceMetric::euclidean(&a, &b);
    assert_relative_eq!(dist, 50.0f64.sqrt());
}

#[test]
fn test_identical_points_have_zero_distance() {
    let a = [0.3, -1.2, 4.0];
    for metric in [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
        DistanceMetric::Minkowski(3.0),
    ] {
        assert_eq!(metric.distance(&a, &a), 0.0);
    }
}

// ============================================================================
// Other Metrics
// ============================================================================

#[test]
fn test_manhattan_distance() {
    let a = [1.0, 2.0];
    let b = [4.0, 6.0];
    // |1-4| + |2-6| = 3 + 4 = 7
    let dist = DistanceMetric::manhattan(&a, &b);
    assert_relative_eq!(dist, 7.0);
}

#[test]
fn test_chebyshev_distance() {
    let a = [1.0, 2.0];
    let b = [4.0, 7.0];
    // |1-4|=3, |2-7|=5. max(3, 5) = 5
    let dist = DistanceMetric::chebyshev(&a, &b);
    assert_relative_eq!(dist, 5.0);
}

#[test]
fn test_minkowski_distance() {
    let a = [1.0, 2.0];
    let b = [4.0, 6.0];
    let p = 3.0;
    // |3|^3 + |4|^3 = 27 + 64 = 91
    let dist: f64 = DistanceMetric::minkowski(&a, &b, p);
    assert_relative_eq!(dist, 91.0f64.powf(1.0 / 3.0));
}

#[test]
fn test_minkowski_reduces_to_euclidean_and_manhattan() {
    let a = [0.5, -2.0, 1.0];
    let b = [2.5, 1.0, -1.0];
    assert_relative_eq!(
        DistanceMetric::Minkowski(2.0).distance(&a, &b),
        DistanceMetric::euclidean(&a, &b),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        DistanceMetric::Minkowski(1.0).distance(&a, &b),
        DistanceMetric::manhattan(&a, &b),
        epsilon = 1e-12
    );
}

#[test]
fn test_default_metric_is_euclidean() {
    assert_eq!(DistanceMetric::<f64>::default(), DistanceMetric::Euclidean);
}
