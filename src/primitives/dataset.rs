//! Tabular datasets of numeric features with one label column.
//!
//! ## Purpose
//!
//! This module defines the immutable data model consumed by every other layer:
//! a [`Dataset`] of rows sharing one [`Schema`], each row exposing an
//! [`Observation`] view of its features and [`Label`].
//!
//! ## Design notes
//!
//! * **Flat storage**: Features are stored row-major in one contiguous buffer
//!   (`n_rows * n_features`), so a row is a plain slice.
//! * **Validated on construction**: Shape, finiteness and class-set checks run
//!   once in the constructors; every `Dataset` value satisfies the invariants.
//! * **Class codes**: Categorical labels are stored as codes indexing the
//!   schema's class list, so subsets keep the full class set.
//!
//! ## Invariants
//!
//! * At least one row and at least one feature.
//! * Every row has exactly `n_features` values, all finite.
//! * Categorical schemas declare at least two classes.
//!
//! ## Non-goals
//!
//! * This module does not load files or parse CSV.
//! * Constant features are not rejected here; standardization reports them.

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::primitives::errors::KnnError;

// ============================================================================
// Labels and Schema
// ============================================================================

/// The label of one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Label<T> {
    /// Numeric regression target.
    Numeric(T),

    /// Class code indexing [`Schema::classes`].
    Class(usize),
}

impl<T: Copy> Label<T> {
    /// The numeric target, if this is a regression label.
    pub fn as_numeric(&self) -> Option<T> {
        match self {
            Label::Numeric(v) => Some(*v),
            Label::Class(_) => None,
        }
    }

    /// The class code, if this is a categorical label.
    pub fn as_class(&self) -> Option<usize> {
        match self {
            Label::Class(c) => Some(*c),
            Label::Numeric(_) => None,
        }
    }
}

/// Column layout shared by all rows of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    feature_names: Vec<String>,
    label_name: String,
    classes: Option<Vec<String>>,
}

impl Schema {
    /// Names of the feature columns, in order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Name of the label column.
    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    /// Ordered class list for categorical labels.
    pub fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }

    /// True when the label column is categorical.
    pub fn is_categorical(&self) -> bool {
        self.classes.is_some()
    }

    /// Position of a feature column by name.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|f| f == name)
    }

    /// Code of a class by name.
    pub fn class_code(&self, name: &str) -> Option<usize> {
        self.classes
            .as_ref()
            .and_then(|classes| classes.iter().position(|c| c == name))
    }

    /// Check that `other` has the same feature columns as `self`.
    pub fn ensure_same_features(&self, other: &Schema) -> Result<(), KnnError> {
        if self.feature_names.len() != other.feature_names.len() {
            return Err(KnnError::SchemaMismatch(format!(
                "expected {} features, got {}",
                self.feature_names.len(),
                other.feature_names.len()
            )));
        }
        if let Some((expected, got)) = self
            .feature_names
            .iter()
            .zip(other.feature_names.iter())
            .find(|(a, b)| a != b)
        {
            return Err(KnnError::SchemaMismatch(format!(
                "expected feature '{}', got '{}'",
                expected, got
            )));
        }
        Ok(())
    }

    /// Check that `other` has the same label kind and class levels as `self`.
    pub fn ensure_same_labels(&self, other: &Schema) -> Result<(), KnnError> {
        match (&self.classes, &other.classes) {
            (None, None) => Ok(()),
            (Some(expected), Some(got)) if expected == got => Ok(()),
            (Some(expected), Some(got)) => Err(KnnError::SchemaMismatch(format!(
                "expected class levels {:?}, got {:?}",
                expected, got
            ))),
            (Some(_), None) => Err(KnnError::SchemaMismatch(format!(
                "expected a categorical label, '{}' is numeric",
                other.label_name
            ))),
            (None, Some(_)) => Err(KnnError::SchemaMismatch(format!(
                "expected a numeric label, '{}' is categorical",
                other.label_name
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Labels<T> {
    Numeric(Vec<T>),
    Class(Vec<usize>),
}

// ============================================================================
// Observation
// ============================================================================

/// Borrowed view of one dataset row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a, T> {
    /// Row position within the dataset.
    pub index: usize,
    /// Feature values, in schema order.
    pub features: &'a [T],
    /// The row's label.
    pub label: Label<T>,
}

// ============================================================================
// Dataset
// ============================================================================

/// Ordered rows of numeric features sharing one schema, plus one label column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dataset<T> {
    schema: Schema,
    features: Vec<T>,
    labels: Labels<T>,
}

impl<T: Float> Dataset<T> {
    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    /// Build a regression dataset with a numeric label column.
    pub fn regression<N, S, R>(
        feature_names: N,
        label_name: &str,
        rows: &[R],
        targets: &[T],
    ) -> Result<Self, KnnError>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
        R: AsRef<[T]>,
    {
        let feature_names = collect_names(feature_names)?;
        check_row_count(rows.len(), targets.len())?;
        for (i, &t) in targets.iter().enumerate() {
            check_finite(t, label_name, i)?;
        }
        let features = flatten_rows(&feature_names, rows)?;

        Ok(Self {
            schema: Schema {
                feature_names,
                label_name: label_name.to_string(),
                classes: None,
            },
            features,
            labels: Labels::Numeric(targets.to_vec()),
        })
    }

    /// Build a classification dataset whose class list is the sorted set of
    /// distinct labels.
    pub fn classification<N, S, R, L>(
        feature_names: N,
        label_name: &str,
        rows: &[R],
        labels: &[L],
    ) -> Result<Self, KnnError>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
        R: AsRef<[T]>,
        L: AsRef<str>,
    {
        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self::classification_with_classes(feature_names, label_name, &classes, rows, labels)
    }

    /// Build a classification dataset with an explicitly ordered class list.
    ///
    /// Classes may be declared without appearing in `labels`; the first class
    /// is the default positive class for binary metrics.
    pub fn classification_with_classes<N, S, C, R, L>(
        feature_names: N,
        label_name: &str,
        classes: &[C],
        rows: &[R],
        labels: &[L],
    ) -> Result<Self, KnnError>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
        C: AsRef<str>,
        R: AsRef<[T]>,
        L: AsRef<str>,
    {
        let feature_names = collect_names(feature_names)?;
        check_row_count(rows.len(), labels.len())?;

        let classes: Vec<String> = classes.iter().map(|c| c.as_ref().to_string()).collect();
        if classes.len() < 2 {
            return Err(KnnError::InvalidInput(format!(
                "label '{}' needs at least 2 classes, got {}",
                label_name,
                classes.len()
            )));
        }
        for (i, class) in classes.iter().enumerate() {
            if classes[..i].contains(class) {
                return Err(KnnError::InvalidInput(format!(
                    "duplicate class '{}' in label '{}'",
                    class, label_name
                )));
            }
        }

        let mut codes = Vec::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let code = classes.iter().position(|c| c == label).ok_or_else(|| {
                KnnError::InvalidInput(format!(
                    "{}[{}]='{}' is not a declared class",
                    label_name, i, label
                ))
            })?;
            codes.push(code);
        }

        let features = flatten_rows(&feature_names, rows)?;

        Ok(Self {
            schema: Schema {
                feature_names,
                label_name: label_name.to_string(),
                classes: Some(classes),
            },
            features,
            labels: Labels::Class(codes),
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The column layout.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.features.len() / self.schema.n_features()
    }

    /// Always false: datasets hold at least one row.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.schema.n_features()
    }

    /// Ordered class list for categorical labels.
    pub fn classes(&self) -> Option<&[String]> {
        self.schema.classes()
    }

    /// Feature values of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn row(&self, i: usize) -> &[T] {
        let d = self.n_features();
        &self.features[i * d..(i + 1) * d]
    }

    /// Iterate over rows as feature slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.features.chunks_exact(self.n_features())
    }

    /// The flat row-major feature buffer.
    pub fn features(&self) -> &[T] {
        &self.features
    }

    /// Label of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn label(&self, i: usize) -> Label<T> {
        match &self.labels {
            Labels::Numeric(v) => Label::Numeric(v[i]),
            Labels::Class(v) => Label::Class(v[i]),
        }
    }

    /// Observation view of row `i`.
    pub fn observation(&self, i: usize) -> Observation<'_, T> {
        Observation {
            index: i,
            features: self.row(i),
            label: self.label(i),
        }
    }

    /// Iterate over all observations in row order.
    pub fn iter(&self) -> impl Iterator<Item = Observation<'_, T>> + '_ {
        (0..self.len()).map(move |i| self.observation(i))
    }

    /// Numeric targets, if the label is numeric.
    pub fn numeric_targets(&self) -> Option<&[T]> {
        match &self.labels {
            Labels::Numeric(v) => Some(v),
            Labels::Class(_) => None,
        }
    }

    /// Class codes, if the label is categorical.
    pub fn class_codes(&self) -> Option<&[usize]> {
        match &self.labels {
            Labels::Class(v) => Some(v),
            Labels::Numeric(_) => None,
        }
    }

    /// Values of feature column `j`.
    pub fn column(&self, j: usize) -> Vec<T> {
        self.rows().map(|row| row[j]).collect()
    }

    // ------------------------------------------------------------------------
    // Derived datasets
    // ------------------------------------------------------------------------

    /// Build a dataset from the given rows, keeping the schema.
    pub fn subset(&self, indices: &[usize]) -> Result<Self, KnnError> {
        if indices.is_empty() {
            return Err(KnnError::EmptyInput);
        }
        let n = self.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(KnnError::InvalidInput(format!(
                "row index {} out of range for {} rows",
                bad, n
            )));
        }

        let mut features = Vec::with_capacity(indices.len() * self.n_features());
        for &i in indices {
            features.extend_from_slice(self.row(i));
        }
        let labels = match &self.labels {
            Labels::Numeric(v) => Labels::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Labels::Class(v) => Labels::Class(indices.iter().map(|&i| v[i]).collect()),
        };

        Ok(Self {
            schema: self.schema.clone(),
            features,
            labels,
        })
    }

    /// Same labels and schema with a replacement feature buffer.
    pub(crate) fn with_features(&self, features: Vec<T>) -> Self {
        debug_assert_eq!(features.len(), self.features.len());
        Self {
            schema: self.schema.clone(),
            features,
            labels: self.labels.clone(),
        }
    }
}

// ============================================================================
// Construction helpers
// ============================================================================

fn collect_names<N, S>(names: N) -> Result<Vec<String>, KnnError>
where
    N: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    if names.is_empty() {
        return Err(KnnError::InvalidInput(
            "at least one feature column is required".to_string(),
        ));
    }
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(KnnError::InvalidInput(format!(
                "duplicate feature name '{}'",
                name
            )));
        }
    }
    Ok(names)
}

fn check_row_count(rows: usize, labels: usize) -> Result<(), KnnError> {
    if rows == 0 {
        return Err(KnnError::EmptyInput);
    }
    if rows != labels {
        return Err(KnnError::InvalidInput(format!(
            "length mismatch: {} rows, {} labels",
            rows, labels
        )));
    }
    Ok(())
}

fn check_finite<T: Float>(val: T, column: &str, row: usize) -> Result<(), KnnError> {
    if !val.is_finite() {
        return Err(KnnError::InvalidNumericValue(format!(
            "{}[{}]={}",
            column,
            row,
            val.to_f64().unwrap_or(f64::NAN)
        )));
    }
    Ok(())
}

fn flatten_rows<T: Float, R: AsRef<[T]>>(
    feature_names: &[String],
    rows: &[R],
) -> Result<Vec<T>, KnnError> {
    let d = feature_names.len();
    let mut features = Vec::with_capacity(rows.len() * d);
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != d {
            return Err(KnnError::SchemaMismatch(format!(
                "row {} has {} features, expected {}",
                i,
                row.len(),
                d
            )));
        }
        for (name, &val) in feature_names.iter().zip(row.iter()) {
            check_finite(val, name, i)?;
        }
        features.extend_from_slice(row);
    }
    Ok(features)
}
