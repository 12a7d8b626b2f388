//! KNN benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Prediction scalability (1K to 20K reference rows)
//! - Cross-validated tuning over a k grid (sequential and parallel folds)
//! - Weight functions
//! - Distance metrics
//! - Classification with stratified folds
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use knn_rs::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;
use std::hint::black_box;

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

/// Noisy sine surface over `dims` features.
fn generate_regression_data(size: usize, dims: usize, seed: u64) -> Dataset<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.2).unwrap();

    let rows: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..dims).map(|_| rng.random_range(0.0..10.0)).collect())
        .collect();
    let targets: Vec<f64> = rows
        .iter()
        .map(|row| row.iter().map(|x: &f64| x.sin()).sum::<f64>() + noise.sample(&mut rng))
        .collect();
    let names: Vec<String> = (0..dims).map(|j| format!("x{}", j)).collect();
    Dataset::regression(names, "y", &rows, &targets).unwrap()
}

/// Two overlapping Gaussian blobs in two dimensions.
fn generate_classification_data(size: usize, seed: u64) -> Dataset<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let spread = Normal::new(0.0, 1.0).unwrap();

    let mut rows = Vec::with_capacity(size);
    let mut labels = Vec::with_capacity(size);
    for i in 0..size {
        let (center, label) = if i % 3 == 0 { (1.5, "fake") } else { (0.0, "real") };
        rows.push([center + spread.sample(&mut rng), center + spread.sample(&mut rng)]);
        labels.push(label);
    }
    Dataset::classification(["x", "y"], "kind", &rows, &labels).unwrap()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");
    group.sample_size(20);

    for size in [1_000, 5_000, 20_000] {
        let train = generate_regression_data(size, 3, 42);
        let query = generate_regression_data(200, 3, 7);
        let fitted = Knn::new().k(10).build().unwrap().fit(&train).unwrap();

        group.throughput(Throughput::Elements(200));
        group.bench_with_input(BenchmarkId::new("batch", size), &size, |b, _| {
            b.iter(|| fitted.predict(black_box(&query)).unwrap())
        });
    }
    group.finish();
}

fn bench_tuning(c: &mut Criterion) {
    let mut group = c.benchmark_group("tuning");
    group.sample_size(10);

    let data = generate_regression_data(2_000, 2, 42);
    let grid: Vec<usize> = (1..=25).step_by(2).collect();

    for parallel in [false, true] {
        let name = if parallel { "parallel" } else { "sequential" };
        let model = Knn::new()
            .fold_count(10)
            .seed(1)
            .parallel(parallel)
            .build()
            .unwrap();

        group.bench_function(name, |b| {
            b.iter(|| model.tune(black_box(&data), &grid, &[Rmse, Rsq]).unwrap())
        });
    }
    group.finish();
}

fn bench_weight_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("weight_functions");
    group.sample_size(20);

    let train = generate_regression_data(5_000, 2, 42);
    let query = generate_regression_data(200, 2, 9);

    for (name, wf) in [
        ("uniform", Uniform),
        ("triangle", Triangle),
        ("epanechnikov", Epanechnikov),
        ("gaussian", Gaussian),
        ("inverse", Inverse),
    ] {
        let fitted = Knn::new()
            .k(15)
            .weight_function(wf)
            .build()
            .unwrap()
            .fit(&train)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("kernel", name), &wf, |b, _| {
            b.iter(|| fitted.predict(black_box(&query)).unwrap())
        });
    }
    group.finish();
}

fn bench_distance_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_metrics");
    group.sample_size(20);

    let train = generate_regression_data(5_000, 4, 42);
    let query = generate_regression_data(200, 4, 11);

    for (name, metric) in [
        ("euclidean", Euclidean),
        ("manhattan", Manhattan),
        ("chebyshev", Chebyshev),
        ("minkowski_3", Minkowski(3.0)),
    ] {
        let fitted = Knn::new()
            .k(10)
            .distance_metric(metric)
            .build()
            .unwrap()
            .fit(&train)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("metric", name), &name, |b, _| {
            b.iter(|| fitted.predict(black_box(&query)).unwrap())
        });
    }
    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    group.sample_size(10);

    let data = generate_classification_data(3_000, 42);
    let model = Knn::new()
        .mode(Classification)
        .fold_count(5)
        .stratify_by("kind")
        .positive_class("fake")
        .build()
        .unwrap();

    group.bench_function("stratified_tuning", |b| {
        b.iter(|| {
            model
                .tune(
                    black_box(&data),
                    &[1, 5, 11, 21],
                    &[Accuracy, Sensitivity, Specificity],
                )
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_prediction,
    bench_tuning,
    bench_weight_functions,
    bench_distance_metrics,
    bench_classification,
);
criterion_main!(benches);
