//! Search benchmarks.
//!
//! Run with: `cargo bench -p pebbles-mcts`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pebbles_game::GameState;
use pebbles_mcts::{Puct, Search, SearchConfig, TreeNode, UniformEvaluator};

fn bench_expansions(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansions");

    for count in [50u64, 200, 800] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("uniform", count), &count, |b, &count| {
            let config = SearchConfig::default();
            b.iter(|| {
                let mut root = TreeNode::new(GameState::new());
                let mut search = Search::with_config(
                    Puct::with_seed(&config, 42),
                    UniformEvaluator::new(),
                    &config,
                );
                for _ in 0..count {
                    search.expand(&mut root).unwrap();
                }
            })
        });
    }

    group.finish();
}

fn bench_single_expansion_on_grown_tree(c: &mut Criterion) {
    let config = SearchConfig::default();
    let mut root = TreeNode::new(GameState::new());
    let mut search = Search::with_config(
        Puct::with_seed(&config, 7),
        UniformEvaluator::new(),
        &config,
    );
    for _ in 0..1000 {
        search.expand(&mut root).unwrap();
    }

    c.bench_function("expand_grown_tree", |b| {
        b.iter(|| search.expand(&mut root).unwrap())
    });
}

criterion_group!(benches, bench_expansions, bench_single_expansion_on_grown_tree);
criterion_main!(benches);
