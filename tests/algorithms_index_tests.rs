#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use proptest::prelude::*;

use knn_rs::internals::algorithms::index::KnnIndex;
use knn_rs::internals::math::distance::DistanceMetric;
use knn_rs::internals::primitives::dataset::Dataset;
use knn_rs::internals::primitives::errors::KnnError;

fn grid() -> Dataset<f64> {
    let rows = [[0.0, 0.0], [1.0, 0.0], [0.0, 2.0], [3.0, 3.0], [-1.0, -1.0]];
    Dataset::regression(["x", "y"], "z", &rows, &[0.0, 1.0, 2.0, 3.0, 4.0]).unwrap()
}

// ============================================================================
// Query Tests
// ============================================================================

#[test]
fn test_query_returns_k_nearest() {
    let index = KnnIndex::build(&grid());
    let set = index.query(&[0.1, 0.1], 3).unwrap();

    assert_eq!(set.indices(), vec![0, 1, 4]);
    assert_relative_eq!(set.distances()[0], 0.02f64.sqrt());
}

#[test]
fn test_query_with_manhattan_metric() {
    let index = KnnIndex::build_with_metric(&grid(), DistanceMetric::Manhattan);
    let set = index.query(&[0.0, 1.2], 2).unwrap();

    // |0|+|0.8| = 0.8 to (0,2), |0|+|1.2| = 1.2 to (0,0)
    assert_eq!(set.indices(), vec![2, 0]);
    assert_relative_eq!(set.distances()[0], 0.8, epsilon = 1e-12);
    assert_eq!(index.metric(), DistanceMetric::Manhattan);
}

#[test]
fn test_equidistant_neighbors_resolve_by_row() {
    let rows = [[10.0], [12.0], [30.0]];
    let data = Dataset::regression(["week"], "tot", &rows, &[5.0, 7.0, 50.0]).unwrap();
    let index = KnnIndex::build(&data);

    let set = index.query(&[11.0], 1).unwrap();
    assert_eq!(set.indices(), vec![0]);
}

#[test]
fn test_index_accessors() {
    let index = KnnIndex::build(&grid());
    assert_eq!(index.len(), 5);
    assert!(!index.is_empty());
    assert_eq!(index.dimensions(), 2);
    assert_eq!(index.label(3).as_numeric(), Some(3.0));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_invalid_k() {
    let index = KnnIndex::build(&grid());

    assert_eq!(
        index.query(&[0.0, 0.0], 0).unwrap_err(),
        KnnError::InvalidK {
            k: 0,
            max: 5,
            fold: None,
        }
    );
    assert_eq!(
        index.query(&[0.0, 0.0], 6).unwrap_err(),
        KnnError::InvalidK {
            k: 6,
            max: 5,
            fold: None,
        }
    );
    assert!(index.query(&[0.0, 0.0], 5).is_ok());
}

#[test]
fn test_point_dimension_mismatch() {
    let index = KnnIndex::build(&grid());
    assert!(matches!(
        index.query(&[0.0], 1),
        Err(KnnError::SchemaMismatch(_))
    ));
}

#[test]
fn test_non_finite_point() {
    let index = KnnIndex::build(&grid());
    assert!(matches!(
        index.query(&[f64::NAN, 0.0], 1),
        Err(KnnError::InvalidNumericValue(_))
    ));
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_query_returns_k_distinct_sorted(
        xs in prop::collection::vec(-100.0f64..100.0, 2..40),
        q in -100.0f64..100.0,
        k_seed in 0usize..1000,
    ) {
        let rows: Vec<[f64; 1]> = xs.iter().map(|&x| [x]).collect();
        let data = Dataset::regression(["x"], "y", &rows, &xs).unwrap();
        let index = KnnIndex::build(&data);
        let k = 1 + k_seed % xs.len();

        let set = index.query(&[q], k).unwrap();
        prop_assert_eq!(set.len(), k);

        let mut seen = set.indices();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), k);

        let distances = set.distances();
        prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));

        // nothing outside the set is strictly closer than its farthest member
        let farthest = set.max_distance();
        for (i, &x) in xs.iter().enumerate() {
            if !set.indices().contains(&i) {
                prop_assert!((x - q).abs() >= farthest);
            }
        }
    }

    #[test]
    fn prop_smaller_k_is_prefix(
        xs in prop::collection::vec(-5.0f64..5.0, 3..30),
        q in -5.0f64..5.0,
    ) {
        let rows: Vec<[f64; 1]> = xs.iter().map(|&x| [x.round()]).collect();
        let data = Dataset::regression(["x"], "y", &rows, &xs).unwrap();
        let index = KnnIndex::build(&data);

        let full = index.query(&[q], xs.len()).unwrap();
        for k in 1..xs.len() {
            let set = index.query(&[q], k).unwrap();
            prop_assert_eq!(set.as_slice(), &full.as_slice()[..k]);
        }
    }
}
