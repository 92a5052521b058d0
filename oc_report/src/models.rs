use std::path::PathBuf;
use std::str::FromStr;

use polars::frame::DataFrame;
use serde::Serialize;

use crate::error::ReportError;

/// Stop time written by the simulator when a rule never triggered.
pub const NOT_STOPPED: i64 = -1;

pub trait Dataset {
    fn load(&self) -> Result<DataFrame, ReportError>;
}

/// The statistic a report is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    PValue,
    EValue,
}

impl Statistic {
    pub fn column(self) -> &'static str {
        match self {
            Statistic::PValue => "p",
            Statistic::EValue => "e",
        }
    }

    pub fn standard_stop_column(self) -> &'static str {
        match self {
            Statistic::PValue => "stopTP",
            Statistic::EValue => "stopTE",
        }
    }

    pub fn continuation_stop_column(self) -> &'static str {
        match self {
            Statistic::PValue => "stopTPOC",
            Statistic::EValue => "stopTEOC",
        }
    }

    /// Rejection boundary: p < alpha, or e > 1/alpha.
    pub fn threshold(self, alpha: f64) -> f64 {
        match self {
            Statistic::PValue => alpha,
            Statistic::EValue => 1.0 / alpha,
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Statistic::PValue => "p-value",
            Statistic::EValue => "e-value",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Statistic::PValue => "T-test with/without optional continuation",
            Statistic::EValue => "E-value test with/without optional continuation",
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            Statistic::PValue => "p_value",
            Statistic::EValue => "e_value",
        }
    }
}

/// Stop times of one simulated run; `None` where the rule never triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopTimes {
    pub standard_p: Option<i64>,
    pub continuation_p: Option<i64>,
    pub standard_e: Option<i64>,
    pub continuation_e: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPair {
    pub standard: Option<i64>,
    pub continuation: Option<i64>,
}

impl StopTimes {
    pub fn from_raw(standard_p: i64, continuation_p: i64, standard_e: i64, continuation_e: i64) -> Self {
        StopTimes {
            standard_p: decode_stop(standard_p),
            continuation_p: decode_stop(continuation_p),
            standard_e: decode_stop(standard_e),
            continuation_e: decode_stop(continuation_e),
        }
    }

    pub fn pair(&self, statistic: Statistic) -> StopPair {
        match statistic {
            Statistic::PValue => StopPair {
                standard: self.standard_p,
                continuation: self.continuation_p,
            },
            Statistic::EValue => StopPair {
                standard: self.standard_e,
                continuation: self.continuation_e,
            },
        }
    }
}

pub fn decode_stop(raw: i64) -> Option<i64> {
    (raw != NOT_STOPPED).then_some(raw)
}

/// All time points of one sample, sorted by `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub sample_id: i64,
    pub t: Vec<f64>,
    pub p: Vec<f64>,
    pub e: Vec<f64>,
    pub stops: StopTimes,
}

impl Trajectory {
    pub fn values(&self, statistic: Statistic) -> &[f64] {
        match statistic {
            Statistic::PValue => &self.p,
            Statistic::EValue => &self.e,
        }
    }

    pub fn points(&self, statistic: Statistic) -> Vec<(f64, f64)> {
        self.t
            .iter()
            .copied()
            .zip(self.values(statistic).iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Png,
    Svg,
}

impl FigureFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FigureFormat::Png => "png",
            FigureFormat::Svg => "svg",
        }
    }
}

impl FromStr for FigureFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(FigureFormat::Png),
            "svg" => Ok(FigureFormat::Svg),
            other => Err(ReportError::Config(format!(
                "unknown figure format `{other}`, expected `png` or `svg`"
            ))),
        }
    }
}

/// Knobs shared by both reports.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Significance level; the e-value threshold is its inverse.
    pub alpha: f64,
    pub num_plotted: usize,
    pub seed: u64,
    pub output_dir: PathBuf,
    pub format: FigureFormat,
}
