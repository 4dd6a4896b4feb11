use serde::Serialize;
use tracing::debug;

use super::drag_model::{predict_row, DragCoefficients};
use crate::data_system::flight_table::FlightRow;
use crate::errors::AnalysisError;

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Result<Self, AnalysisError> {
        if start.is_nan() || end.is_nan() {
            return Err(AnalysisError::InvalidParameter(
                "window bounds must be numbers".to_string(),
            ));
        }
        if start > end {
            return Err(AnalysisError::InvalidParameter(format!(
                "window start {} is after window end {}",
                start, end
            )));
        }
        Ok(TimeWindow { start, end })
    }

    pub fn unbounded() -> Self {
        TimeWindow {
            start: f64::NEG_INFINITY,
            end: f64::INFINITY,
        }
    }

    /// Inclusive at both ends; NaN is never contained.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedPoint {
    pub time: f64,
    pub predicted: f64,
    pub reference: f64,
    pub residual: f64,
}

/// Model output for the rows inside one window, rebuilt on every pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedSeries {
    pub window: Option<TimeWindow>,
    points: Vec<DerivedPoint>,
}

impl DerivedSeries {
    pub fn points(&self) -> &[DerivedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    /// (time, predicted acceleration) pairs.
    pub fn predicted(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time, p.predicted)).collect()
    }

    /// (time, reference vertical acceleration) pairs over the same rows.
    pub fn reference(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time, p.reference)).collect()
    }

    pub fn residual_stats(&self) -> ResidualStats {
        ResidualStats::from_residuals(self.points.iter().map(|p| p.residual))
    }
}

/// Evaluates the drag model for every row whose time lies in `window`.
///
/// Rows outside the window are skipped, input order is kept and nothing is
/// interpolated across the window edges.
pub fn build_windowed_series(
    rows: &[FlightRow],
    coefficients: &DragCoefficients,
    window: TimeWindow,
) -> DerivedSeries {
    let points: Vec<DerivedPoint> = rows
        .iter()
        .filter(|row| window.contains(row.time))
        .map(|row| {
            let predicted = predict_row(row, coefficients);
            DerivedPoint {
                time: row.time,
                predicted,
                reference: row.vertical_acceleration,
                residual: row.vertical_acceleration - predicted,
            }
        })
        .collect();

    debug!(
        "Window [{}, {}] kept {} of {} row(s)",
        window.start,
        window.end,
        points.len(),
        rows.len()
    );

    DerivedSeries {
        window: Some(window),
        points,
    }
}

/// Reference-minus-prediction summary over the finite residuals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualStats {
    pub count: usize,
    pub mean: f64,
    pub rms: f64,
    pub max_abs: f64,
}

impl ResidualStats {
    pub fn from_residuals(residuals: impl Iterator<Item = f64>) -> Self {
        let (count, sum, sum_sq, max_abs) = residuals.filter(|r| r.is_finite()).fold(
            (0usize, 0.0, 0.0, 0.0f64),
            |(count, sum, sum_sq, max_abs), r| {
                (count + 1, sum + r, sum_sq + r * r, max_abs.max(r.abs()))
            },
        );

        if count == 0 {
            return ResidualStats {
                count,
                mean: f64::NAN,
                rms: f64::NAN,
                max_abs: f64::NAN,
            };
        }

        let n = count as f64;
        ResidualStats {
            count,
            mean: sum / n,
            rms: (sum_sq / n).sqrt(),
            max_abs,
        }
    }
}
