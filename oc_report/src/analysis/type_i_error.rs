//! Type I error rates of the standard and optional-continuation rules.
//!
//! Rates are computed over every sample in the table, not over the plotted
//! subset, so they do not depend on the sampling seed.

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::data_handling::trajectories::SAMPLE_COLUMN;
use crate::error::ReportError;
use crate::models::{Statistic, NOT_STOPPED};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleRate {
    pub stopped: usize,
    pub total: usize,
    pub type_i_error: f64,
}

impl RuleRate {
    pub fn new(stopped: usize, total: usize) -> Self {
        let type_i_error = if total == 0 { 0.0 } else { stopped as f64 / total as f64 };
        RuleRate { stopped, total, type_i_error }
    }

    pub fn rate(&self) -> f64 {
        self.type_i_error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypeIErrors {
    pub standard: RuleRate,
    pub continuation: RuleRate,
}

impl TypeIErrors {
    pub fn standard_label(&self) -> String {
        format!("standard, type I error {:.3}", self.standard.rate())
    }

    pub fn continuation_label(&self) -> String {
        format!("optional continuation, type I error {:.3}", self.continuation.rate())
    }
}

fn distinct_samples(df: &DataFrame) -> PolarsResult<usize> {
    df.column(SAMPLE_COLUMN)?.as_materialized_series().n_unique()
}

/// Number of distinct samples whose `stop_column` is not the sentinel.
fn stopped_samples(df: &DataFrame, stop_column: &str) -> PolarsResult<usize> {
    let stopped = df
        .clone()
        .lazy()
        .filter(col(stop_column).neq(lit(NOT_STOPPED)))
        .collect()?;
    distinct_samples(&stopped)
}

pub fn type_i_errors(df: &DataFrame, statistic: Statistic) -> Result<TypeIErrors, ReportError> {
    let total = distinct_samples(df)?;
    let standard = RuleRate::new(stopped_samples(df, statistic.standard_stop_column())?, total);
    let continuation = RuleRate::new(stopped_samples(df, statistic.continuation_stop_column())?, total);

    info!(
        "{}: standard type I error {:.3} ({}/{}), optional continuation {:.3} ({}/{})",
        statistic.axis_label(),
        standard.rate(),
        standard.stopped,
        total,
        continuation.rate(),
        continuation.stopped,
        total
    );

    Ok(TypeIErrors { standard, continuation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::fixtures::three_sample_frame;

    #[test]
    fn p_report_rates_for_three_samples() {
        let rates = type_i_errors(&three_sample_frame(), Statistic::PValue).unwrap();
        assert_eq!(rates.standard, RuleRate::new(1, 3));
        assert_eq!(rates.continuation, RuleRate::new(2, 3));
        assert_eq!(rates.standard_label(), "standard, type I error 0.333");
        assert_eq!(rates.continuation_label(), "optional continuation, type I error 0.667");
    }

    #[test]
    fn e_report_uses_e_stop_columns() {
        let rates = type_i_errors(&three_sample_frame(), Statistic::EValue).unwrap();
        assert_eq!(rates.standard.stopped, 1);
        assert_eq!(rates.continuation.stopped, 2);
    }

    #[test]
    fn rates_count_samples_not_rows() {
        let df = df![
            "s" => &[0i64, 0, 0, 0, 1, 1],
            "stopTP" => &[3i64, 3, 3, 3, -1, -1],
            "stopTPOC" => &[3i64, 3, 3, 3, -1, -1]
        ]
        .unwrap();

        let rates = type_i_errors(&df, Statistic::PValue).unwrap();
        assert_eq!(rates.standard.stopped, 1);
        assert_eq!(rates.standard.total, 2);
        assert!((rates.standard.rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_population_has_zero_rate() {
        assert_eq!(RuleRate::new(0, 0).rate(), 0.0);
    }
}
