use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::analysis::classification::{classify, split_at_stop, Category};
use crate::analysis::type_i_error::TypeIErrors;
use crate::data_handling::trajectories::TrajectorySet;
use crate::error::ReportError;
use crate::models::{FigureFormat, Statistic};

const FIGURE_SIZE: (u32, u32) = (900, 650);

/// Dash and gap length in pixels, so short suffixes still read as dashed.
const DASH_SIZE: u32 = 6;
const DASH_SPACING: u32 = 4;

/// Colour roles; one per display category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    Standard,
    Continuation,
    NeverStopped,
}

impl Swatch {
    pub fn rgb(self) -> RGBColor {
        match self {
            Swatch::Standard => RGBColor(0, 255, 0),
            Swatch::Continuation => RGBColor(255, 0, 0),
            Swatch::NeverStopped => RGBColor(0, 0, 0),
        }
    }

    pub fn opacity(self) -> f64 {
        match self {
            Swatch::NeverStopped => 0.1,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub sample_id: i64,
    pub points: Vec<(f64, f64)>,
    pub swatch: Swatch,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub swatches: Vec<Swatch>,
}

/// Everything drawn in one report figure.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub threshold: f64,
    pub lines: Vec<PlotLine>,
    pub legend: Vec<LegendEntry>,
}

fn render_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> ReportError {
    ReportError::Render(e.to_string())
}

impl TrajectoryPlot {
    pub fn build(
        set: &TrajectorySet,
        plotted: &[i64],
        statistic: Statistic,
        rates: &TypeIErrors,
        alpha: f64,
    ) -> Result<Self, ReportError> {
        let mut lines = Vec::with_capacity(plotted.len());

        for &sample_id in plotted {
            let trajectory = set
                .get(sample_id)
                .ok_or_else(|| ReportError::Render(format!("sample {sample_id} is not in the dataset")))?;

            // Log axis: values <= 0 cannot be placed
            let points: Vec<(f64, f64)> = trajectory
                .points(statistic)
                .into_iter()
                .filter(|&(_, v)| v > 0.0 && v.is_finite())
                .collect();
            if points.len() < trajectory.t.len() {
                debug!(
                    "Sample {}: dropped {} non-positive {} value(s)",
                    sample_id,
                    trajectory.t.len() - points.len(),
                    statistic.axis_label()
                );
            }

            match classify(trajectory.stops.pair(statistic)) {
                Category::Standard => lines.push(PlotLine {
                    sample_id,
                    points,
                    swatch: Swatch::Standard,
                    style: LineStyle::Solid,
                }),
                Category::ContinuationOnly { stop } => {
                    let split = split_at_stop(&points, stop);
                    lines.push(PlotLine {
                        sample_id,
                        points: split.real,
                        swatch: Swatch::Continuation,
                        style: LineStyle::Solid,
                    });
                    lines.push(PlotLine {
                        sample_id,
                        points: split.hypothetical,
                        swatch: Swatch::Continuation,
                        style: LineStyle::Dashed,
                    });
                }
                Category::NeverStopped => lines.push(PlotLine {
                    sample_id,
                    points,
                    swatch: Swatch::NeverStopped,
                    style: LineStyle::Solid,
                }),
            }
        }

        let (t_min, t_max) = set.time_range();
        let x_range = if t_max > t_min { (t_min, t_max) } else { (t_min, t_min + 1.0) };

        Ok(TrajectoryPlot {
            title: statistic.title().to_string(),
            x_label: "n".to_string(),
            y_label: statistic.axis_label().to_string(),
            x_range,
            threshold: statistic.threshold(alpha),
            lines,
            legend: vec![
                LegendEntry {
                    label: rates.standard_label(),
                    swatches: vec![Swatch::Standard],
                },
                LegendEntry {
                    label: rates.continuation_label(),
                    swatches: vec![Swatch::Standard, Swatch::Continuation],
                },
            ],
        })
    }

    /// Log-axis bounds covering every drawn value and the threshold.
    pub fn y_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .lines
            .iter()
            .flat_map(|line| line.points.iter().map(|&(_, v)| v))
            .fold((self.threshold, self.threshold), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if lo < hi {
            (lo / 1.5, hi * 1.5)
        } else {
            (lo / 10.0, hi * 10.0)
        }
    }

    pub fn render_to_file(&self, path: &Path, format: FigureFormat) -> Result<(), ReportError> {
        match format {
            FigureFormat::Png => {
                let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
                self.draw(&root)?;
                root.present().map_err(render_err)?;
            }
            FigureFormat::Svg => {
                let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
                self.draw(&root)?;
                root.present().map_err(render_err)?;
            }
        }

        info!("Trajectory plot saved to: {}", path.display());
        Ok(())
    }

    pub(crate) fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), ReportError> {
        root.fill(&WHITE).map_err(render_err)?;

        let (x_min, x_max) = self.x_range;
        let (y_min, y_max) = self.y_range();

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .axis_desc_style(("sans-serif", 18))
            .draw()
            .map_err(render_err)?;

        // Draw order follows the sampler so layering matches the plotted subset
        for line in &self.lines {
            let style = line.swatch.rgb().mix(line.swatch.opacity()).stroke_width(1);
            let drawn = match line.style {
                LineStyle::Solid => chart.draw_series(LineSeries::new(line.points.iter().copied(), style)),
                LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(
                    line.points.iter().copied(),
                    DASH_SIZE,
                    DASH_SPACING,
                    style,
                )),
            };
            drawn.map_err(render_err)?;
        }

        chart
            .draw_series(LineSeries::new(
                vec![(x_min, self.threshold), (x_max, self.threshold)],
                BLACK.stroke_width(3),
            ))
            .map_err(render_err)?;

        for entry in &self.legend {
            let anno = chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
                .map_err(render_err)?;
            anno.label(entry.label.as_str());

            match entry.swatches.as_slice() {
                [only] => {
                    let colour = only.rgb();
                    anno.legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], colour.filled()));
                }
                [first, second, ..] => {
                    let (first, second) = (first.rgb(), second.rgb());
                    anno.legend(move |(x, y)| {
                        EmptyElement::at((x, y))
                            + Rectangle::new([(0, -6), (12, 6)], first.filled())
                            + Rectangle::new([(14, -6), (26, 6)], second.filled())
                    });
                }
                [] => {}
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .legend_area_size(35)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(render_err)?;

        Ok(())
    }
}
