use std::path::PathBuf;

use polars::frame::DataFrame;
use serde::Serialize;
use tracing::info;

use crate::analysis::sampling::plan_samples;
use crate::analysis::trajectory_plot::TrajectoryPlot;
use crate::analysis::type_i_error::{type_i_errors, TypeIErrors};
use crate::data_handling::trajectories::TrajectorySet;
use crate::error::ReportError;
use crate::models::{ReportSettings, Statistic};

/// What one report produced, collected into the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub statistic: Statistic,
    pub plotted: usize,
    pub continuation_subset: Option<usize>,
    pub rates: TypeIErrors,
    pub figure: PathBuf,
}

/// Samples, classifies and renders one report variant.
pub fn run_report(
    df: &DataFrame,
    set: &TrajectorySet,
    statistic: Statistic,
    settings: &ReportSettings,
) -> Result<ReportOutcome, ReportError> {
    info!("Building the {} report", statistic.axis_label());

    let plan = plan_samples(set, statistic, settings.num_plotted, settings.seed)?;
    if let Some(subset) = &plan.continuation_only {
        info!(
            "Drew {} continuation-only samples proportional to the plotted share",
            subset.len()
        );
    }

    let rates = type_i_errors(df, statistic)?;
    let plot = TrajectoryPlot::build(set, &plan.plotted, statistic, &rates, settings.alpha)?;

    let figure = settings.output_dir.join(format!(
        "{}_trajectories.{}",
        statistic.file_stem(),
        settings.format.extension()
    ));
    plot.render_to_file(&figure, settings.format)?;

    Ok(ReportOutcome {
        statistic,
        plotted: plan.plotted.len(),
        continuation_subset: plan.continuation_only.as_ref().map(Vec::len),
        rates,
        figure,
    })
}
