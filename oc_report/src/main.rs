use std::fs::create_dir_all;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analysis::report::run_report;
use crate::data_handling::trajectories::{TrajectoryCsv, TrajectorySet};
use crate::helper_functions::{figure_format_from_env, project_root, write_report_summary, write_type_i_errors};
use crate::models::{Dataset, ReportSettings, Statistic};

mod analysis;
mod data_handling;
mod error;
mod helper_functions;
mod models;

/// Written by the optional continuation simulation
const INPUT_CSV: &str = "oc.csv";
const OUTPUT_DIR: &str = "figures";
const NUM_PLOTTED: usize = 200;
const SEED: u64 = 0;
const ALPHA: f64 = 0.05;

fn main() -> anyhow::Result<()> {
    // Setup logging and project configuration
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting the optional continuation report");

    let root = project_root();
    let settings = ReportSettings {
        alpha: ALPHA,
        num_plotted: NUM_PLOTTED,
        seed: SEED,
        output_dir: root.join(OUTPUT_DIR),
        format: figure_format_from_env()?,
    };

    let dataset = TrajectoryCsv {
        path: root.join(INPUT_CSV),
    };
    let df = dataset.load().context("loading trajectory table")?;
    let trajectories = TrajectorySet::from_frame(&df).context("grouping trajectories")?;

    create_dir_all(&settings.output_dir)
        .with_context(|| format!("creating {}", settings.output_dir.display()))?;

    let mut outcomes = Vec::new();
    for statistic in [Statistic::PValue, Statistic::EValue] {
        let outcome = run_report(&df, &trajectories, statistic, &settings)
            .with_context(|| format!("{} report", statistic.axis_label()))?;
        outcomes.push(outcome);
    }

    write_type_i_errors(&outcomes, &settings.output_dir.join("type_i_errors.csv"))?;
    write_report_summary(&outcomes, settings.seed, &settings.output_dir.join("report_summary.json"))?;

    info!("Finished, figures written to {}", settings.output_dir.display());
    Ok(())
}
