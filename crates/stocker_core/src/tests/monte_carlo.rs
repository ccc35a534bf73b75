//! Tests for the Monte Carlo runner
//!
//! These tests verify that:
//! - Trials are reproducible for a fixed seed, batch by batch
//! - The template scenario is never mutated
//! - Statistics and goal probabilities match the collected values
//! - Representative runs can be looked up by median and percentile

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::fixed_return_portfolio;
use crate::config::Catalog;
use crate::error::MonteCarloError;
use crate::monte_carlo::{MonteCarlo, MonteCarloConfig, TerminalValue};
use crate::scenario::{PiecewiseScenario, Scenario};
use crate::stats;

fn college_savings() -> Scenario {
    Scenario::builder(
        "College Savings",
        &Catalog::builtin().portfolio("fifty_fifty", 5_000.0).unwrap(),
        18,
    )
    .annual_contribution(2_500.0)
    .inflation_rate_percent(2.5)
    .build()
    .unwrap()
}

#[test]
fn test_deterministic_positions_always_reach_goal() {
    let portfolio = fixed_return_portfolio(&[6.0, 3.0], &[1.0, 1.0], 10_000.0);
    let scenario = Scenario::builder("Certain", &portfolio, 10)
        .annual_contribution(1_000.0)
        .build()
        .unwrap();

    let mut monte_carlo = MonteCarlo::new(scenario, MonteCarloConfig::seeded(1));
    monte_carlo.run(1_000).unwrap();

    let values = monte_carlo.raw_values();
    assert_eq!(values.len(), 1_000);
    assert!(values.iter().all(|v| v.to_bits() == values[0].to_bits()));

    let terminal = values[0];
    let stats = monte_carlo.results(Some(terminal - 1.0), true).unwrap();
    assert_eq!(stats.num_runs, 1_000);
    assert_eq!(stats.outliers_removed, 0);
    assert_eq!(stats.goal.unwrap().probability, 1.0);
    assert!(stats.std_dev.abs() < 1e-6);
    assert_eq!(stats.mad, 0.0);
    assert_eq!(stats.min, stats.max);
    assert_eq!(stats.median, terminal);

    // Ending exactly on the goal is not success
    assert_eq!(monte_carlo.goal_probability(terminal), Some(0.0));
}

#[test]
fn test_same_seed_same_values() {
    let mut first = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(2018));
    let mut second = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(2018));
    let mut other = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(2019));

    first.run(200).unwrap();
    second.run(200).unwrap();
    other.run(200).unwrap();

    assert_eq!(first.seed(), 2018);
    assert_eq!(first.raw_values(), second.raw_values());
    assert_ne!(first.raw_values(), other.raw_values());
}

#[test]
fn test_batches_append_in_trial_order() {
    let mut batched = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(5));
    batched.run(40).unwrap();
    batched.run(60).unwrap();

    let mut whole = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(5));
    whole.run(100).unwrap();

    assert_eq!(batched.runs().len(), 100);
    assert_eq!(batched.raw_values(), whole.raw_values());
    for (run, value) in batched.runs().iter().zip(batched.raw_values()) {
        assert_eq!(run.final_value(), *value);
        assert_eq!(run.corrected_history().len(), 19);
    }
}

#[test]
fn test_template_is_untouched() {
    let mut template = college_savings();
    template.run(&mut SmallRng::seed_from_u64(0)).unwrap();
    let snapshot = template.clone();

    let mut monte_carlo = MonteCarlo::new(template.clone(), MonteCarloConfig::seeded(8));
    assert_eq!(monte_carlo.scenario().history().years(), 0);

    monte_carlo.run(10).unwrap();
    assert_eq!(monte_carlo.scenario().history().years(), 0);
    assert_eq!(template, snapshot);
}

#[test]
fn test_statistics_match_values() {
    let mut monte_carlo = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(77));
    monte_carlo.run(500).unwrap();

    let trimmed = monte_carlo.values(true);
    let stats = monte_carlo.results(Some(100_000.0), true).unwrap();

    assert_eq!(stats.scenario_name, "College Savings");
    assert_eq!(stats.num_runs, 500);
    assert_eq!(stats.outliers_removed, 500 - trimmed.len());
    assert_eq!(Some(stats.mean), stats::mean(&trimmed));
    assert_eq!(Some(stats.median), stats::median_low(&trimmed));
    assert!(stats.min <= stats.p10 && stats.p10 <= stats.median);
    assert!(stats.median <= stats.p90 && stats.p90 <= stats.max);

    // Goal probability always counts every trial
    let above = monte_carlo
        .raw_values()
        .iter()
        .filter(|v| **v > 100_000.0)
        .count();
    let goal = stats.goal.unwrap();
    assert_eq!(goal.goal, 100_000.0);
    assert_eq!(goal.probability, above as f64 / 500.0);

    let untrimmed = monte_carlo.results(None, false).unwrap();
    assert_eq!(untrimmed.outliers_removed, 0);
    assert!(untrimmed.goal.is_none());
    assert!(untrimmed.max >= stats.max);
}

#[test]
fn test_representative_runs() {
    let mut monte_carlo = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(31));
    monte_carlo.run(101).unwrap();
    let stats = monte_carlo.results(None, false).unwrap();

    let median = monte_carlo.median_run(false).unwrap();
    assert_eq!(median.final_value(), stats.median);

    let low = monte_carlo.percentile_run(10.0, false).unwrap();
    assert_eq!(low.final_value(), stats.p10);
    let high = monte_carlo.percentile_run(90.0, false).unwrap();
    assert_eq!(high.final_value(), stats.p90);
    assert!(low.final_value() <= median.final_value());
    assert!(median.final_value() <= high.final_value());
}

#[test]
fn test_nominal_terminal_value() {
    let config = MonteCarloConfig {
        seed: Some(12),
        terminal_value: TerminalValue::Nominal,
    };
    let mut nominal = MonteCarlo::new(college_savings(), config);
    let mut corrected = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(12));
    nominal.run(50).unwrap();
    corrected.run(50).unwrap();

    for (n, c) in nominal.raw_values().iter().zip(corrected.raw_values()) {
        assert!(n > c, "Nominal {n:.2} should exceed corrected {c:.2}");
    }
    for (run, value) in nominal.runs().iter().zip(nominal.raw_values()) {
        assert_eq!(run.final_nominal_value(), *value);
    }
}

#[test]
fn test_piecewise_trials() {
    let catalog = Catalog::builtin();
    let accumulation = Scenario::builder(
        "Accumulation",
        &catalog.portfolio("all_stocks", 10_000.0).unwrap(),
        10,
    )
    .annual_contribution(5_000.0)
    .build()
    .unwrap();
    let distribution = Scenario::builder(
        "Distribution",
        &catalog.portfolio("all_bonds", 0.0).unwrap(),
        10,
    )
    .annual_contribution(-5_000.0)
    .build()
    .unwrap();
    let template = PiecewiseScenario::new("Lifecycle", vec![accumulation, distribution]).unwrap();

    let mut monte_carlo = MonteCarlo::new(template, MonteCarloConfig::seeded(4));
    monte_carlo.run(20).unwrap();

    for run in monte_carlo.runs() {
        assert_eq!(run.corrected_history().len(), 21);
        assert!(run.final_value() >= 0.0);
    }
}

#[test]
fn test_not_enough_runs() {
    let mut monte_carlo = MonteCarlo::new(college_savings(), MonteCarloConfig::seeded(0));
    assert!(matches!(
        monte_carlo.results(None, false),
        Err(MonteCarloError::NotEnoughRuns { runs: 0 })
    ));
    assert!(monte_carlo.goal_probability(1.0).is_none());
    assert!(monte_carlo.median_run(false).is_none());

    monte_carlo.run(1).unwrap();
    assert!(matches!(
        monte_carlo.results(Some(1.0), false),
        Err(MonteCarloError::NotEnoughRuns { runs: 1 })
    ));
}
