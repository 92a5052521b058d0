//! Error type shared by the loader, sampler and renderer.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// Input file absent, unreadable, malformed or missing required columns
    #[error("failed to load trajectories: {0}")]
    DataLoad(String),

    /// A subset was requested that is larger than the population it is drawn from
    #[error("cannot draw {requested} samples from a population of {available}")]
    InsufficientPopulation { requested: usize, available: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to render figure: {0}")]
    Render(String),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub fn data_load(reason: impl Into<String>) -> Self {
        ReportError::DataLoad(reason.into())
    }
}
