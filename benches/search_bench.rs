//! Criterion benchmarks for chef-search.
//!
//! Uses seeded synthetic catalogs so the numbers measure the toggle
//! transition and the engine loop independent of any real ingredient data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chef_search::catalog::{Catalog, CompatibilityTable, Ingredient};
use chef_search::context::SearchContext;
use chef_search::profile::{ConstraintProfile, MustHave, Perk};
use chef_search::recipe::RecipeState;
use chef_search::search::{SearchConfig, SearchEngine, StateBudget};

const TAGS: [&str; 6] = ["Fat", "Fruit", "Sweet", "Meat", "Vegetable", "Grain"];

// ===========================================================================
// Synthetic catalog
// ===========================================================================

fn synthetic_catalog(n: usize, seed: u64) -> Catalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let ingredients: Vec<Ingredient> = (0..n)
        .map(|i| {
            let min_portion = rng.random_range(1..5);
            Ingredient::new(
                format!("I{i}"),
                rng.random_range(0..60),
                rng.random_range(0.05..2.0),
            )
            .with_portions(min_portion, min_portion + rng.random_range(0..30))
            .with_tag(TAGS[rng.random_range(0..TAGS.len())])
            .with_aroma_neutral(rng.random_bool(0.1))
        })
        .collect();

    let mut table = CompatibilityTable::new();
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.random_bool(0.3) {
                table.insert(format!("I{a}"), format!("I{b}"), rng.random_range(-3..6));
            }
        }
    }
    Catalog::new(ingredients, table).expect("synthetic names are unique")
}

fn synthetic_context(n: usize) -> SearchContext {
    let profile = ConstraintProfile::new()
        .with_must_have(MustHave::new(["Fat"], 2, 5))
        .with_avoid("Meat")
        .with_perk(Perk::new("", -6, 0));
    SearchContext::new(synthetic_catalog(n, 42), profile)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle");

    for &n in &[64usize, 256, 1024] {
        let catalog = synthetic_catalog(n, 42);
        let indices: Vec<usize> = (0..n).step_by(n / 8).collect();
        let state = RecipeState::from_indices(&catalog, &indices);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(catalog, state), |b, (cat, s)| {
            b.iter(|| {
                let next = s.toggle(black_box(cat), black_box(n / 2 + 1));
                black_box(next)
            })
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for (n, max_closed) in [(50usize, 1_000usize), (150, 1_000), (150, 5_000)] {
        let context = synthetic_context(n);
        let config = SearchConfig::default()
            .with_ingredient_points(2)
            .with_cooking_time_modifier(0.0)
            .with_stop_by_cost_multiple(1_000.0)
            .with_memory_sample_interval(100)
            .with_max_closed(max_closed);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_closed{}", n, max_closed), n),
            &(context, config),
            |b, (ctx, cfg)| {
                b.iter(|| {
                    let mut engine = SearchEngine::new(black_box(ctx), cfg.clone())
                        .expect("valid config")
                        .with_memory_probe(StateBudget::new(2_000_000));
                    black_box(engine.run(&mut ()))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_toggle, bench_search);
criterion_main!(benches);
