//! Loads the simulator's `oc.csv` dump and groups it into per-sample trajectories.

use std::collections::BTreeMap;
use std::path::PathBuf;

use polars::prelude::*;
use tracing::{debug, error, info, warn};

use crate::error::ReportError;
use crate::helper_functions::read_csv;
use crate::models::{Dataset, Statistic, StopTimes, Trajectory};

pub const SAMPLE_COLUMN: &str = "s";
pub const TIME_COLUMN: &str = "t";

/// Columns the reports cannot do without; anything else in the file is ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    SAMPLE_COLUMN,
    TIME_COLUMN,
    "p",
    "e",
    "stopTP",
    "stopTPOC",
    "stopTE",
    "stopTEOC",
];

pub struct TrajectoryCsv {
    pub path: PathBuf,
}

impl Dataset for TrajectoryCsv {
    fn load(&self) -> Result<DataFrame, ReportError> {
        info!("Reading trajectories from {}", self.path.display());

        let df = match read_csv(&self.path) {
            Ok(df) => df,
            Err(e) => {
                error!("Failed to read trajectory CSV: {}", e);
                return Err(ReportError::data_load(format!("{}: {}", self.path.display(), e)));
            }
        };
        debug!("Loaded {} rows", df.height());

        check_required_columns(&df)?;
        Ok(df)
    }
}

pub fn check_required_columns(df: &DataFrame) -> Result<(), ReportError> {
    let present = df.get_column_names();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|&name| !present.iter().any(|c| c.as_str() == name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReportError::data_load(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>, ReportError> {
    let column = df
        .column(name)?
        .cast(&DataType::Int64)
        .map_err(|e| ReportError::data_load(format!("column `{name}` is not an integer column: {e}")))?;
    let values = column.i64()?;
    if values.null_count() > 0 {
        return Err(ReportError::data_load(format!(
            "column `{name}` has {} missing or non-integer value(s)",
            values.null_count()
        )));
    }
    Ok(values.into_no_null_iter().collect())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, ReportError> {
    let column = df
        .column(name)?
        .cast(&DataType::Float64)
        .map_err(|e| ReportError::data_load(format!("column `{name}` is not numeric: {e}")))?;
    let values = column.f64()?;
    if values.null_count() > 0 {
        return Err(ReportError::data_load(format!(
            "column `{name}` has {} missing or non-numeric value(s)",
            values.null_count()
        )));
    }
    Ok(values.into_no_null_iter().collect())
}

/// Every sample of the dataset, ordered by sample id.
#[derive(Debug, Clone)]
pub struct TrajectorySet {
    trajectories: Vec<Trajectory>,
    t_min: f64,
    t_max: f64,
}

impl TrajectorySet {
    pub fn from_frame(df: &DataFrame) -> Result<Self, ReportError> {
        check_required_columns(df)?;
        if df.height() == 0 {
            return Err(ReportError::data_load("trajectory table has no rows"));
        }

        let samples = int_column(df, SAMPLE_COLUMN)?;
        let times = float_column(df, TIME_COLUMN)?;
        let p_values = float_column(df, Statistic::PValue.column())?;
        let e_values = float_column(df, Statistic::EValue.column())?;
        let stop_tp = int_column(df, "stopTP")?;
        let stop_tp_oc = int_column(df, "stopTPOC")?;
        let stop_te = int_column(df, "stopTE")?;
        let stop_te_oc = int_column(df, "stopTEOC")?;

        // Row indices per sample, in file order
        let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (row, &sample) in samples.iter().enumerate() {
            groups.entry(sample).or_default().push(row);
        }

        let mut trajectories = Vec::with_capacity(groups.len());
        for (sample_id, mut rows) in groups {
            // Stop times are run-level facts; the first row of a sample is authoritative.
            let first = rows[0];
            let stops = StopTimes::from_raw(stop_tp[first], stop_tp_oc[first], stop_te[first], stop_te_oc[first]);
            let inconsistent = rows.iter().any(|&row| {
                StopTimes::from_raw(stop_tp[row], stop_tp_oc[row], stop_te[row], stop_te_oc[row]) != stops
            });
            if inconsistent {
                warn!("Sample {} has differing stop times across rows, using the first row", sample_id);
            }

            rows.sort_by(|&a, &b| times[a].total_cmp(&times[b]));
            if rows.windows(2).any(|w| times[w[0]] == times[w[1]]) {
                warn!("Sample {} has duplicate time points", sample_id);
            }

            trajectories.push(Trajectory {
                sample_id,
                t: rows.iter().map(|&row| times[row]).collect(),
                p: rows.iter().map(|&row| p_values[row]).collect(),
                e: rows.iter().map(|&row| e_values[row]).collect(),
                stops,
            });
        }

        let t_min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let t_max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        info!(
            "Grouped {} rows into {} trajectories (t in [{}, {}])",
            df.height(),
            trajectories.len(),
            t_min,
            t_max
        );

        Ok(TrajectorySet { trajectories, t_min, t_max })
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn sample_ids(&self) -> Vec<i64> {
        self.trajectories.iter().map(|t| t.sample_id).collect()
    }

    pub fn get(&self, sample_id: i64) -> Option<&Trajectory> {
        self.trajectories
            .binary_search_by_key(&sample_id, |t| t.sample_id)
            .ok()
            .map(|idx| &self.trajectories[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }

    /// Dataset-wide time range, independent of which samples get plotted.
    pub fn time_range(&self) -> (f64, f64) {
        (self.t_min, self.t_max)
    }
}
