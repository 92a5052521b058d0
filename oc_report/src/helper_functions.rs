use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use polars::error::PolarsResult;
use polars::frame::DataFrame;
use polars::prelude::{CsvReadOptions, SerReader};
use serde::Serialize;
use tracing::info;

use crate::analysis::report::ReportOutcome;
use crate::error::ReportError;
use crate::models::{FigureFormat, Statistic};

pub fn project_root() -> PathBuf {
    match env::var_os("PROJECT_ROOT") {
        Some(val) => PathBuf::from(val),
        None => {
            // Fall back to current directory if PROJECT_ROOT not set
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

/// Reads `OC_FIGURE_FORMAT`, defaulting to png.
pub fn figure_format_from_env() -> Result<FigureFormat, ReportError> {
    match env::var("OC_FIGURE_FORMAT") {
        Ok(val) => val.parse(),
        Err(_) => Ok(FigureFormat::Png),
    }
}

pub fn read_csv(file_path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
        .finish()
}

#[derive(Debug, Serialize)]
struct TypeIErrorRow {
    report: Statistic,
    rule: &'static str,
    stopped: usize,
    total: usize,
    type_i_error: f64,
}

/// One row per report and stopping rule.
pub fn write_type_i_errors(outcomes: &[ReportOutcome], path: &Path) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for outcome in outcomes {
        for (rule, rate) in [
            ("standard", &outcome.rates.standard),
            ("optional_continuation", &outcome.rates.continuation),
        ] {
            writer.serialize(TypeIErrorRow {
                report: outcome.statistic,
                rule,
                stopped: rate.stopped,
                total: rate.total,
                type_i_error: rate.rate(),
            })?;
        }
    }
    writer.flush()?;

    info!("Type I error rates saved to: {}", path.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct ReportSummary<'a> {
    seed: u64,
    reports: &'a [ReportOutcome],
}

pub fn write_report_summary(outcomes: &[ReportOutcome], seed: u64, path: &Path) -> Result<(), ReportError> {
    let summary = ReportSummary { seed, reports: outcomes };
    serde_json::to_writer_pretty(File::create(path)?, &summary)?;

    info!("Report summary saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::analysis::type_i_error::{RuleRate, TypeIErrors};

    #[test]
    fn read_csv_keeps_header_and_row_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "s,t,p").unwrap();
        writeln!(file, "1,0,1.0").unwrap();
        writeln!(file, "0,0,0.5").unwrap();

        let df = read_csv(file.path()).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["s", "t", "p"]);
        let ids: Vec<i64> = df.column("s").unwrap().i64().unwrap().into_no_null_iter().collect();
        assert_eq!(ids, vec![1, 0]);
    }

    fn outcomes() -> Vec<ReportOutcome> {
        vec![
            ReportOutcome {
                statistic: Statistic::PValue,
                plotted: 3,
                continuation_subset: None,
                rates: TypeIErrors {
                    standard: RuleRate::new(1, 3),
                    continuation: RuleRate::new(2, 3),
                },
                figure: PathBuf::from("figures/p_value_trajectories.png"),
            },
            ReportOutcome {
                statistic: Statistic::EValue,
                plotted: 3,
                continuation_subset: Some(1),
                rates: TypeIErrors {
                    standard: RuleRate::new(0, 3),
                    continuation: RuleRate::new(1, 3),
                },
                figure: PathBuf::from("figures/e_value_trajectories.png"),
            },
        ]
    }

    #[test]
    fn type_i_error_table_has_a_row_per_rule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("type_i_errors.csv");
        write_type_i_errors(&outcomes(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "report,rule,stopped,total,type_i_error");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("p_value,standard,1,3,0.333"));
        assert!(lines[4].starts_with("e_value,optional_continuation,1,3,"));
    }

    #[test]
    fn report_summary_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report_summary.json");
        write_report_summary(&outcomes(), 0, &path).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 0);
        assert_eq!(value["reports"][1]["statistic"], "e_value");
        assert_eq!(value["reports"][1]["continuation_subset"], 1);
        assert_eq!(value["reports"][0]["rates"]["continuation"]["stopped"], 2);
    }

    #[test]
    fn read_csv_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_csv(&dir.path().join("oc.csv")).is_err());
    }
}
