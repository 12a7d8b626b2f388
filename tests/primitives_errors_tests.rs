#![cfg(feature = "dev")]

use knn_rs::internals::primitives::errors::KnnError;

#[test]
fn test_knn_error_display() {
    // EmptyInput
    let err = KnnError::EmptyInput;
    assert_eq!(format!("{}", err), "Input dataset is empty");

    // InvalidInput
    let err = KnnError::InvalidInput("test error".to_string());
    assert_eq!(format!("{}", err), "Invalid input: test error");

    // InvalidNumericValue
    let err = KnnError::InvalidNumericValue("x[3]=NaN".to_string());
    assert_eq!(format!("{}", err), "Invalid numeric value: x[3]=NaN");

    // SchemaMismatch
    let err = KnnError::SchemaMismatch("expected 2 features, got 3".to_string());
    assert_eq!(
        format!("{}", err),
        "Schema mismatch: expected 2 features, got 3"
    );

    // InvalidFoldCount
    let err = KnnError::InvalidFoldCount(1);
    assert_eq!(
        format!("{}", err),
        "Invalid fold count: 1 (must be at least 2)"
    );

    // InvalidMinkowskiP
    let err = KnnError::InvalidMinkowskiP(0.5);
    assert_eq!(
        format!("{}", err),
        "Invalid Minkowski order: 0.5 (must be >= 1 and finite)"
    );

    // InvalidProportion
    let err = KnnError::InvalidProportion(1.5);
    assert_eq!(
        format!("{}", err),
        "Invalid proportion: 1.5 (must be > 0 and < 1)"
    );

    // DuplicateParameter
    let err = KnnError::DuplicateParameter { parameter: "k" };
    assert_eq!(
        format!("{}", err),
        "Parameter 'k' was set multiple times. Each parameter can only be configured once."
    );
}

#[test]
fn test_context_suffixes() {
    let err = KnnError::DegenerateFeature {
        feature: "week".to_string(),
        fold: None,
    };
    assert_eq!(
        format!("{}", err),
        "Degenerate feature 'week': zero standard deviation in training data"
    );

    let err = KnnError::DegenerateFeature {
        feature: "week".to_string(),
        fold: Some(3),
    };
    assert_eq!(
        format!("{}", err),
        "Degenerate feature 'week': zero standard deviation in training data (fold 3)"
    );

    let err = KnnError::InvalidK {
        k: 12,
        max: 9,
        fold: Some(0),
    };
    assert_eq!(
        format!("{}", err),
        "Invalid k: 12 (must be in [1, 9]) (fold 0)"
    );

    let err = KnnError::InvalidK {
        k: 0,
        max: usize::MAX,
        fold: None,
    };
    assert_eq!(format!("{}", err), "Invalid k: 0 (must be at least 1)");

    let err = KnnError::InsufficientData {
        required: 5,
        got: 3,
        stratum: Some("fake".to_string()),
    };
    assert_eq!(
        format!("{}", err),
        "Insufficient data in stratum 'fake': got 3 observations, need at least 5"
    );

    let err = KnnError::InsufficientData {
        required: 5,
        got: 3,
        stratum: None,
    };
    assert_eq!(
        format!("{}", err),
        "Insufficient data: got 3 observations, need at least 5"
    );

    let err = KnnError::UndefinedMetric {
        metric: "sensitivity",
        reason: "truth contains no positive observations".to_string(),
        fold: Some(2),
        k: Some(7),
    };
    assert_eq!(
        format!("{}", err),
        "Undefined metric 'sensitivity': truth contains no positive observations (fold 2, k = 7)"
    );
}

#[test]
fn test_in_fold_attaches_context() {
    let err = KnnError::DegenerateFeature {
        feature: "x".to_string(),
        fold: None,
    }
    .in_fold(4);
    assert_eq!(
        err,
        KnnError::DegenerateFeature {
            feature: "x".to_string(),
            fold: Some(4),
        }
    );

    let err = KnnError::InvalidK {
        k: 10,
        max: 8,
        fold: None,
    }
    .in_fold(1);
    assert_eq!(
        err,
        KnnError::InvalidK {
            k: 10,
            max: 8,
            fold: Some(1),
        }
    );
}

#[test]
fn test_in_fold_keeps_existing_context() {
    let err = KnnError::InvalidK {
        k: 10,
        max: 8,
        fold: Some(2),
    }
    .in_fold(5);
    assert_eq!(
        err,
        KnnError::InvalidK {
            k: 10,
            max: 8,
            fold: Some(2),
        }
    );
}

#[test]
fn test_in_fold_ignores_other_variants() {
    assert_eq!(KnnError::EmptyInput.in_fold(3), KnnError::EmptyInput);
    assert_eq!(
        KnnError::InvalidFoldCount(1).in_fold_at_k(0, 5),
        KnnError::InvalidFoldCount(1)
    );
}

#[test]
fn test_in_fold_at_k_tags_metrics() {
    let err = KnnError::UndefinedMetric {
        metric: "rsq",
        reason: "predictions or truth have zero variance".to_string(),
        fold: None,
        k: None,
    }
    .in_fold_at_k(6, 15);

    match err {
        KnnError::UndefinedMetric { fold, k, .. } => {
            assert_eq!(fold, Some(6));
            assert_eq!(k, Some(15));
        }
        other => panic!("unexpected variant: {:?}", other),
    }
}
