//! Benchmarks for Algoscope trace generators
//!
//! Measures the cost of:
//! - Snapshot-heavy sorting traces
//! - Graph traversal and shortest-path traces
//! - Replay by fold versus replay by snapshot

use algoscope_algorithms::{
    bfs, bubble_sort, dijkstra, knapsack, quick_sort, BubbleOptions, DijkstraOptions, Graph, Item, QuickOptions,
};
use algoscope_trace::Playback;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_values(n: usize, seed: u64) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1_000..1_000)).collect()
}

/// Grid graph of `side * side` nodes with right and down edges.
fn grid(side: usize) -> Graph {
    let labels = (0..side * side).map(|i| format!("n{i}"));
    let mut graph = Graph::new(labels, false);
    for row in 0..side {
        for col in 0..side {
            let node = row * side + col;
            if col + 1 < side {
                let _ = graph.add_edge(node, node + 1, (node % 7 + 1) as u64);
            }
            if row + 1 < side {
                let _ = graph.add_edge(node, node + side, (node % 5 + 1) as u64);
            }
        }
    }
    graph
}

fn bench_sorting(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorting");

    for &n in &[8usize, 32, 128] {
        let values = random_values(n, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("bubble", n), &values, |b, values| {
            b.iter(|| bubble_sort(black_box(values), &BubbleOptions::default()))
        });
        group.bench_with_input(BenchmarkId::new("quick", n), &values, |b, values| {
            b.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                quick_sort(black_box(values), &QuickOptions::default(), &mut rng)
            })
        });
    }
    group.finish();
}

fn bench_graphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("graphs");

    for &side in &[4usize, 8, 16] {
        let graph = grid(side);
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::new("bfs", side), &graph, |b, graph| {
            b.iter(|| bfs(black_box(graph), 0))
        });
        group.bench_with_input(BenchmarkId::new("dijkstra", side), &graph, |b, graph| {
            b.iter(|| dijkstra(black_box(graph), 0, &DijkstraOptions::default()))
        });
    }
    group.finish();
}

/// Seeking to the last step: knapsack folds the whole prefix, bubble sort reads one snapshot.
fn bench_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek_to_end");

    let items: Vec<_> = (0..12).map(|i| Item::new(format!("i{i}"), i % 5 + 1, (i * 3 % 11 + 1) as u64)).collect();
    let mut fold = Playback::new(knapsack(&items, 30));
    group.bench_function("fold", |b| {
        b.iter(|| {
            fold.go_to(fold.len() - 1);
            black_box(fold.visible_state().best)
        })
    });

    let mut snapshot = Playback::new(bubble_sort(&random_values(64, 3), &BubbleOptions::default()));
    group.bench_function("snapshot", |b| {
        b.iter(|| {
            snapshot.go_to(snapshot.len() - 1);
            black_box(snapshot.visible_state().elements.len())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_sorting, bench_graphs, bench_seek);
criterion_main!(benches);
