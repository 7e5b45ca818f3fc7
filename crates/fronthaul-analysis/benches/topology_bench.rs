//! Criterion benchmarks for similarity + topology inference.
//!
//! Sizes track realistic deployments: tens of cells, thousands of slots.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fronthaul_analysis::{compute_similarity, infer_topology, SimilarityParams, TopologyParams};
use fronthaul_core::config::CutRule;
use fronthaul_core::types::{CellSeries, ClusteringStrategy, SimilarityMethod};
use test_fixtures::random_indicators;

fn series(cells: usize) -> Vec<CellSeries> {
    random_indicators(cells, 2000, 0.1, 42)
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    for cells in [10, 40] {
        let input = series(cells);
        group.bench_with_input(BenchmarkId::new("correlation", cells), &input, |b, s| {
            b.iter(|| compute_similarity(black_box(s), &SimilarityParams::default()))
        });
        let cosine = SimilarityParams {
            method: SimilarityMethod::Cosine,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("cosine", cells), &input, |b, s| {
            b.iter(|| compute_similarity(black_box(s), &cosine))
        });
    }
    group.finish();
}

fn bench_topology(c: &mut Criterion) {
    let matrix = match compute_similarity(&series(40), &SimilarityParams::default()) {
        Ok(m) => m,
        Err(e) => panic!("fixture similarity failed: {e}"),
    };
    let mut group = c.benchmark_group("topology");
    let strategies = [
        ("hierarchical_auto", ClusteringStrategy::Hierarchical, CutRule::Auto),
        ("hierarchical_k4", ClusteringStrategy::Hierarchical, CutRule::Clusters(4)),
        ("kmeans_k4", ClusteringStrategy::KMeans, CutRule::Clusters(4)),
        ("density", ClusteringStrategy::Density, CutRule::Auto),
    ];
    for (name, strategy, cut) in strategies {
        let params = TopologyParams {
            strategy,
            cut,
            ..Default::default()
        };
        group.bench_function(name, |b| b.iter(|| infer_topology(black_box(&matrix), &params)));
    }
    group.finish();
}

criterion_group!(benches, bench_similarity, bench_topology);
criterion_main!(benches);
