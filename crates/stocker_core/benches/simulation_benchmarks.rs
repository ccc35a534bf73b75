//! Criterion benchmarks for stocker_core simulation
//!
//! Run with: cargo bench -p stocker_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use stocker_core::config::Catalog;
use stocker_core::monte_carlo::{MonteCarlo, MonteCarloConfig};
use stocker_core::scenario::{PiecewiseScenario, Scenario};

fn create_college_savings() -> Scenario {
    Scenario::builder(
        "College Savings",
        &Catalog::builtin()
            .portfolio("all_stocks", 5_000.0)
            .expect("builtin preset"),
        18,
    )
    .annual_contribution(2_500.0)
    .inflation_rate_percent(2.5)
    .end_weights(vec![0.0, 1.0])
    .build()
    .expect("valid scenario")
}

fn create_retirement() -> PiecewiseScenario {
    let catalog = Catalog::builtin();
    let accumulation = Scenario::builder(
        "Accumulation",
        &catalog
            .portfolio("sixty_forty", 50_000.0)
            .expect("builtin preset"),
        30,
    )
    .annual_contribution(10_000.0)
    .annual_contribution_increase_percent(2.0)
    .build()
    .expect("valid scenario");

    let distribution = Scenario::builder(
        "Distribution",
        &catalog
            .portfolio("fifty_fifty", 0.0)
            .expect("builtin preset"),
        30,
    )
    .annual_contribution(-40_000.0)
    .annual_contribution_increase_percent(3.0)
    .build()
    .expect("valid scenario");

    PiecewiseScenario::new("Retirement", vec![accumulation, distribution])
        .expect("non-empty phases")
}

fn bench_single_scenario(c: &mut Criterion) {
    let template = create_college_savings();

    c.bench_function("glide_path_18yr_scenario", |b| {
        b.iter(|| {
            let mut scenario = template.clone();
            let mut rng = SmallRng::seed_from_u64(black_box(42));
            scenario.run(&mut rng).expect("scenario runs");
            scenario.final_value()
        })
    });
}

fn bench_piecewise_scenario(c: &mut Criterion) {
    let template = create_retirement();

    c.bench_function("piecewise_60yr_scenario", |b| {
        b.iter(|| {
            let mut scenario = template.clone();
            let mut rng = SmallRng::seed_from_u64(black_box(42));
            scenario.run(&mut rng).expect("scenario runs");
            scenario.final_value()
        })
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    let template = create_college_savings();

    for runs in [100, 500, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("runs", runs), runs, |b, &runs| {
            b.iter(|| {
                let mut monte_carlo =
                    MonteCarlo::new(template.clone(), MonteCarloConfig::seeded(black_box(42)));
                monte_carlo.run(runs).expect("trials run");
                monte_carlo.results(Some(100_000.0), true)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_scenario,
    bench_piecewise_scenario,
    bench_monte_carlo,
);
criterion_main!(benches);
