use std::fmt::Display;
use std::fs;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{info, warn};

use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_MESSAGE, FONT_SIZE_TITLE, LINE_WIDTH_LEGEND, LINE_WIDTH_PLOT,
    PLOT_HEIGHT, PLOT_WIDTH, SCATTER_MARKER_SIZE,
};
use crate::errors::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Scatter,
}

#[derive(Debug, Clone)]
pub struct OverlaySeries {
    pub label: String,
    pub data: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub style: SeriesStyle,
}

impl OverlaySeries {
    pub fn line(label: impl Into<String>, data: Vec<(f64, f64)>, color: RGBColor) -> Self {
        OverlaySeries {
            label: label.into(),
            data,
            color,
            style: SeriesStyle::Line,
        }
    }

    pub fn scatter(label: impl Into<String>, data: Vec<(f64, f64)>, color: RGBColor) -> Self {
        OverlaySeries {
            label: label.into(),
            data,
            color,
            style: SeriesStyle::Scatter,
        }
    }

    fn finite_points(&self) -> impl Iterator<Item = &(f64, f64)> + '_ {
        self.data
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// Several named series drawn on one pair of shared axes.
#[derive(Debug, Clone)]
pub struct OverlayChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<OverlaySeries>,
}

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Splits a line at non-finite points so NaN rows show as gaps.
pub fn finite_segments(data: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in data {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn render_error<E: Display>(error: E) -> AnalysisError {
    AnalysisError::Render(error.to_string())
}

impl OverlayChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        OverlayChart {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: OverlaySeries) -> Self {
        self.series.push(series);
        self
    }

    /// Padded x and y ranges over every finite point; `None` when there is
    /// nothing to draw.
    pub fn data_bounds(&self) -> Option<(Range<f64>, Range<f64>)> {
        let mut points = self.series.iter().flat_map(|s| s.finite_points()).peekable();
        points.peek()?;

        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        let (x_lo, x_hi) = calculate_range(x_min, x_max);
        let (y_lo, y_hi) = calculate_range(y_min, y_max);
        Some((x_lo..x_hi, y_lo..y_hi))
    }

    /// Renders the chart to a PNG. Empty series are skipped; a chart with no
    /// drawable points gets a placeholder message instead of axes.
    pub fn render(&self, output_path: &Path) -> Result<(), AnalysisError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let root = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        match self.data_bounds() {
            Some((x_range, y_range)) => self.draw_chart(&root, x_range, y_range)?,
            None => {
                warn!("'{}' has no data points, drawing placeholder", self.title);
                let message = format!("{}: no data points", self.title);
                let style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
                root.draw(&Text::new(
                    message,
                    (PLOT_WIDTH as i32 / 4, PLOT_HEIGHT as i32 / 2),
                    style,
                ))
                .map_err(render_error)?;
            }
        }

        root.present().map_err(render_error)?;
        info!("Chart '{}' saved to {}", self.title, output_path.display());
        Ok(())
    }

    fn draw_chart(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        x_range: Range<f64>,
        y_range: Range<f64>,
    ) -> Result<(), AnalysisError> {
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", FONT_SIZE_TITLE))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(&self.x_label)
            .y_desc(&self.y_label)
            .axis_desc_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()
            .map_err(render_error)?;

        for series in self.series.iter().filter(|s| !s.data.is_empty()) {
            let color = series.color;
            match series.style {
                SeriesStyle::Line => {
                    let mut labelled = false;
                    for segment in finite_segments(&series.data) {
                        let drawn = chart
                            .draw_series(LineSeries::new(
                                segment,
                                color.stroke_width(LINE_WIDTH_PLOT),
                            ))
                            .map_err(render_error)?;
                        if !labelled {
                            drawn.label(&series.label).legend(move |(x, y)| {
                                PathElement::new(
                                    vec![(x, y), (x + 20, y)],
                                    color.stroke_width(LINE_WIDTH_LEGEND),
                                )
                            });
                            labelled = true;
                        }
                    }
                }
                SeriesStyle::Scatter => {
                    chart
                        .draw_series(series.finite_points().map(|&(x, y)| {
                            Circle::new((x, y), SCATTER_MARKER_SIZE, color.filled())
                        }))
                        .map_err(render_error)?
                        .label(&series.label)
                        .legend(move |(x, y)| {
                            Circle::new((x + 10, y), SCATTER_MARKER_SIZE, color.filled())
                        });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        Ok(())
    }
}
