use knn_rs::{Dataset, KnnError, Label};

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_regression_dataset_layout() {
    let rows = [[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
    let data = Dataset::regression(["week", "temp"], "sales", &rows, &[5.0, 6.0, 7.0]).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data.n_features(), 2);
    assert!(!data.is_empty());
    assert_eq!(data.row(1), &[2.0, 20.0]);
    assert_eq!(data.column(1), vec![10.0, 20.0, 30.0]);
    assert_eq!(data.label(2), Label::Numeric(7.0));
    assert_eq!(data.numeric_targets(), Some(&[5.0, 6.0, 7.0][..]));
    assert!(data.class_codes().is_none());
    assert!(!data.schema().is_categorical());
    assert_eq!(data.schema().label_name(), "sales");
    assert_eq!(data.schema().feature_index("temp"), Some(1));
}

#[test]
fn test_classification_classes_are_sorted() {
    let rows = [[0.0], [1.0], [2.0], [3.0]];
    let data = Dataset::classification(["x"], "kind", &rows, &["real", "fake", "real", "fake"])
        .unwrap();

    assert_eq!(data.classes().unwrap(), &["fake".to_string(), "real".to_string()]);
    assert_eq!(data.class_codes(), Some(&[1, 0, 1, 0][..]));
    assert_eq!(data.schema().class_code("real"), Some(1));
    assert_eq!(data.label(0).as_class(), Some(1));
}

#[test]
fn test_classification_with_declared_order() {
    let rows = [[0.0], [1.0], [2.0]];
    let data = Dataset::classification_with_classes(
        ["x"],
        "kind",
        &["real", "fake", "unknown"],
        &rows,
        &["fake", "real", "fake"],
    )
    .unwrap();

    assert_eq!(data.classes().unwrap().len(), 3);
    assert_eq!(data.class_codes(), Some(&[1, 0, 1][..]));
}

#[test]
fn test_observation_iteration() {
    let rows = [[1.0], [2.0]];
    let data = Dataset::regression(["x"], "y", &rows, &[3.0, 4.0]).unwrap();

    let obs: Vec<_> = data.iter().collect();
    assert_eq!(obs.len(), 2);
    assert_eq!(obs[1].index, 1);
    assert_eq!(obs[1].features, &[2.0]);
    assert_eq!(obs[1].label, Label::Numeric(4.0));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_empty_dataset_rejected() {
    let rows: [[f64; 1]; 0] = [];
    let targets: [f64; 0] = [];
    let result = Dataset::regression(["x"], "y", &rows, &targets);
    assert_eq!(result.unwrap_err(), KnnError::EmptyInput);
}

#[test]
fn test_label_length_mismatch() {
    let rows = [[1.0], [2.0]];
    let result = Dataset::regression(["x"], "y", &rows, &[1.0]);
    assert!(matches!(result, Err(KnnError::InvalidInput(_))));
}

#[test]
fn test_row_width_mismatch() {
    let rows = vec![vec![1.0, 2.0], vec![3.0]];
    let result = Dataset::regression(["a", "b"], "y", &rows, &[1.0, 2.0]);
    assert!(matches!(result, Err(KnnError::SchemaMismatch(_))));
}

#[test]
fn test_non_finite_feature_rejected() {
    let rows = [[1.0], [f64::NAN]];
    let result = Dataset::regression(["x"], "y", &rows, &[1.0, 2.0]);
    assert_eq!(
        result.unwrap_err(),
        KnnError::InvalidNumericValue("x[1]=NaN".to_string())
    );
}

#[test]
fn test_non_finite_target_rejected() {
    let rows = [[1.0], [2.0]];
    let result = Dataset::regression(["x"], "y", &rows, &[1.0, f64::INFINITY]);
    assert!(matches!(result, Err(KnnError::InvalidNumericValue(_))));
}

#[test]
fn test_single_class_rejected() {
    let rows = [[1.0], [2.0]];
    let result = Dataset::classification(["x"], "kind", &rows, &["real", "real"]);
    assert!(matches!(result, Err(KnnError::InvalidInput(_))));
}

#[test]
fn test_undeclared_class_rejected() {
    let rows = [[1.0], [2.0]];
    let result =
        Dataset::classification_with_classes(["x"], "kind", &["a", "b"], &rows, &["a", "c"]);
    assert!(matches!(result, Err(KnnError::InvalidInput(_))));
}

#[test]
fn test_duplicate_feature_names_rejected() {
    let rows = [[1.0, 2.0]];
    let result = Dataset::regression(["x", "x"], "y", &rows, &[1.0]);
    assert!(matches!(result, Err(KnnError::InvalidInput(_))));
}

// ============================================================================
// Subset and Schema Tests
// ============================================================================

#[test]
fn test_subset_keeps_schema_and_order() {
    let rows = [[1.0], [2.0], [3.0], [4.0]];
    let data = Dataset::classification(["x"], "kind", &rows, &["a", "b", "a", "b"]).unwrap();

    let sub = data.subset(&[3, 0]).unwrap();
    assert_eq!(sub.len(), 2);
    assert_eq!(sub.row(0), &[4.0]);
    assert_eq!(sub.row(1), &[1.0]);
    assert_eq!(sub.class_codes(), Some(&[1, 0][..]));
    assert_eq!(sub.schema(), data.schema());
}

#[test]
fn test_subset_errors() {
    let rows = [[1.0], [2.0]];
    let data = Dataset::regression(["x"], "y", &rows, &[1.0, 2.0]).unwrap();

    assert_eq!(data.subset(&[]).unwrap_err(), KnnError::EmptyInput);
    assert!(matches!(data.subset(&[5]), Err(KnnError::InvalidInput(_))));
}

#[test]
fn test_schema_feature_comparison() {
    let a = Dataset::regression(["x", "y"], "t", &[[1.0, 2.0]], &[1.0]).unwrap();
    let b = Dataset::regression(["x", "z"], "t", &[[1.0, 2.0]], &[1.0]).unwrap();
    let c = Dataset::regression(["x"], "t", &[[1.0]], &[1.0]).unwrap();

    assert!(a.schema().ensure_same_features(a.schema()).is_ok());
    assert!(matches!(
        a.schema().ensure_same_features(b.schema()),
        Err(KnnError::SchemaMismatch(_))
    ));
    assert!(matches!(
        a.schema().ensure_same_features(c.schema()),
        Err(KnnError::SchemaMismatch(_))
    ));
}

#[test]
fn test_schema_label_comparison() {
    let rows = [[1.0], [2.0]];
    let numeric = Dataset::regression(["x"], "t", &rows, &[1.0, 2.0]).unwrap();
    let ab = Dataset::classification(["x"], "t", &rows, &["a", "b"]).unwrap();
    let ac = Dataset::classification(["x"], "t", &rows, &["a", "c"]).unwrap();

    assert!(ab.schema().ensure_same_labels(ab.schema()).is_ok());
    assert!(ab.schema().ensure_same_labels(ac.schema()).is_err());
    assert!(ab.schema().ensure_same_labels(numeric.schema()).is_err());
    assert!(numeric.schema().ensure_same_labels(ab.schema()).is_err());
}
