//! Reproducible choice of the samples drawn in a report.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::analysis::classification::{classify, Category};
use crate::data_handling::trajectories::TrajectorySet;
use crate::error::ReportError;
use crate::models::Statistic;

/// Draws `amount` distinct ids from `population` without replacement.
pub fn choose_samples<R: Rng + ?Sized>(
    population: &[i64],
    amount: usize,
    rng: &mut R,
) -> Result<Vec<i64>, ReportError> {
    if amount > population.len() {
        return Err(ReportError::InsufficientPopulation {
            requested: amount,
            available: population.len(),
        });
    }

    Ok(rand::seq::index::sample(rng, population.len(), amount)
        .into_iter()
        .map(|idx| population[idx])
        .collect())
}

/// Like [`choose_samples`], but shrinks the request to the population size.
pub fn choose_samples_clamped<R: Rng + ?Sized>(
    population: &[i64],
    amount: usize,
    rng: &mut R,
) -> Result<Vec<i64>, ReportError> {
    let amount = if amount > population.len() {
        warn!(
            "Requested {} samples but only {} are available, drawing all of them",
            amount,
            population.len()
        );
        population.len()
    } else {
        amount
    };
    choose_samples(population, amount, rng)
}

/// `round(restricted * plotted / total)`, rounding halves to even.
pub fn proportional_count(restricted: usize, plotted: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (restricted as f64 * plotted as f64 / total as f64).round_ties_even() as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    /// Samples drawn in the figure, in draw order
    pub plotted: Vec<i64>,
    /// Proportional draw among samples stopped only under optional continuation.
    /// Drawn for the e-value report but not added to the figure.
    pub continuation_only: Option<Vec<i64>>,
}

pub fn plan_samples(
    set: &TrajectorySet,
    statistic: Statistic,
    num_plotted: usize,
    seed: u64,
) -> Result<SamplePlan, ReportError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let population = set.sample_ids();

    let plotted = choose_samples_clamped(&population, num_plotted, &mut rng)?;

    let continuation_only = match statistic {
        Statistic::PValue => None,
        Statistic::EValue => {
            let restricted: Vec<i64> = set
                .iter()
                .filter(|t| matches!(classify(t.stops.pair(statistic)), Category::ContinuationOnly { .. }))
                .map(|t| t.sample_id)
                .collect();
            let amount = proportional_count(restricted.len(), num_plotted, population.len());
            Some(choose_samples_clamped(&restricted, amount, &mut rng)?)
        }
    };

    info!(
        "Sampled {} of {} trajectories for the {} report",
        plotted.len(),
        set.len(),
        statistic.axis_label()
    );

    Ok(SamplePlan { plotted, continuation_only })
}
