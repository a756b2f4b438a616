//! Detection benchmarks on planted-partition graphs.
//!
//! Run with: `cargo bench --bench detection`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use potts::{CpmDetector, DetectionConfig, SparseGraph};
use rand::prelude::*;

/// `blocks` groups of `size` nodes: dense positive inside, sparse negative
/// across. Edges go both ways.
fn planted(blocks: usize, size: usize, seed: u64) -> SparseGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = blocks * size;
    let mut edges = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            let same = a / size == b / size;
            let (p, w) = if same { (0.3, 1.0) } else { (0.01, -1.0) };
            if rng.random::<f64>() < p {
                edges.push((a, b, w));
                edges.push((b, a, w));
            }
        }
    }
    SparseGraph::from_edges(edges).unwrap()
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");
    for blocks in [4, 16, 32] {
        let graph = planted(blocks, 25, 7);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));
        group.bench_with_input(BenchmarkId::new("greedy", blocks), &graph, |b, g| {
            let config = DetectionConfig::default().with_resolution(0.1);
            let detector = CpmDetector::new(config).unwrap();
            b.iter(|| detector.detect(black_box(g)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("refine_2", blocks), &graph, |b, g| {
            let config = DetectionConfig::default()
                .with_resolution(0.1)
                .with_refine_count(2);
            let detector = CpmDetector::new(config).unwrap();
            b.iter(|| detector.detect(black_box(g)).unwrap())
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let graphs: Vec<SparseGraph> = (0..16).map(|i| planted(4, 25, i)).collect();
    let mut group = c.benchmark_group("batch");
    for threads in [1, 4] {
        let config = DetectionConfig::default()
            .with_resolution(0.1)
            .with_threads(threads);
        let detector = CpmDetector::new(config).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(threads), &graphs, |b, gs| {
            b.iter(|| detector.detect_batch(black_box(gs)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_detect, bench_batch);
criterion_main!(benches);
