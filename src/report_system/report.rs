use std::fmt;
use std::path::PathBuf;

use crate::fit_system::polynomial_fitter::{format_optional, FittedPolynomial};
use crate::trajectory_system::drag_model::DragCoefficients;
use crate::trajectory_system::windowed_series::{DerivedSeries, ResidualStats, TimeWindow};

pub fn format_time(elapsed_time: f64) -> String {
    if !elapsed_time.is_finite() {
        return if elapsed_time > 0.0 {
            "end".to_string()
        } else if elapsed_time < 0.0 {
            "start".to_string()
        } else {
            "n/a".to_string()
        };
    }
    let sign = if elapsed_time < 0.0 { "-" } else { "" };
    let elapsed_time = elapsed_time.abs();
    if elapsed_time >= 3600.0 {
        let hours = (elapsed_time / 3600.0).floor();
        let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
        let seconds = elapsed_time % 60.0;
        format!("{}{:.0}h {:.0}m {:05.2}s", sign, hours, minutes, seconds)
    } else if elapsed_time >= 60.0 {
        let minutes = (elapsed_time / 60.0).floor();
        let seconds = elapsed_time % 60.0;
        format!("{}{:.0}m {:05.2}s", sign, minutes, seconds)
    } else {
        format!("{}{:.2}s", sign, elapsed_time)
    }
}

fn format_acceleration(value: f64) -> String {
    if value.is_finite() {
        format!("{:.3} m/s²", value)
    } else {
        "n/a".to_string()
    }
}

/// Run summary for the drag-model comparison.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub source: PathBuf,
    pub window: TimeWindow,
    pub coefficients: DragCoefficients,
    pub table_rows: usize,
    pub table_span: Option<(f64, f64)>,
    pub window_rows: usize,
    pub min_predicted: f64,
    pub max_predicted: f64,
    pub residuals: ResidualStats,
}

impl ComparisonReport {
    pub fn new(
        source: PathBuf,
        coefficients: DragCoefficients,
        table_rows: usize,
        table_span: Option<(f64, f64)>,
        series: &DerivedSeries,
    ) -> Self {
        let finite = series
            .points()
            .iter()
            .map(|p| p.predicted)
            .filter(|v| v.is_finite());
        let (min_predicted, max_predicted) = finite.fold((f64::NAN, f64::NAN), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        ComparisonReport {
            source,
            window: series.window.unwrap_or_else(TimeWindow::unbounded),
            coefficients,
            table_rows,
            table_span,
            window_rows: series.len(),
            min_predicted,
            max_predicted,
            residuals: series.residual_stats(),
        }
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Drag Model Comparison ---")?;
        writeln!(f, "Source: {}", self.source.display())?;
        writeln!(f, "C_f: {}", self.coefficients)?;
        match self.table_span {
            Some((first, last)) => writeln!(
                f,
                "Flight data: {} to {}",
                format_time(first),
                format_time(last)
            )?,
            None => writeln!(f, "Flight data: n/a")?,
        }
        writeln!(
            f,
            "Window: {} to {}",
            format_time(self.window.start),
            format_time(self.window.end)
        )?;
        writeln!(
            f,
            "Rows in window: {} of {}",
            self.window_rows, self.table_rows
        )?;
        writeln!(
            f,
            "Predicted acceleration: {} to {}",
            format_acceleration(self.min_predicted),
            format_acceleration(self.max_predicted)
        )?;
        writeln!(f, "\n--- Residuals (reference - predicted) ---")?;
        writeln!(f, "Points: {}", self.residuals.count)?;
        writeln!(f, "Mean: {}", format_acceleration(self.residuals.mean))?;
        writeln!(f, "RMS: {}", format_acceleration(self.residuals.rms))?;
        write!(f, "Max |residual|: {}", format_acceleration(self.residuals.max_abs))
    }
}

/// Run summary for the coefficient fit.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub source: PathBuf,
    pub samples: usize,
    pub fit: FittedPolynomial,
}

impl fmt::Display for FitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Coefficient Fit ---")?;
        writeln!(f, "Source: {}", self.source.display())?;
        writeln!(f, "Samples: {}", self.samples)?;
        writeln!(f, "F(v) = {}", self.fit.polynomial)?;
        writeln!(
            f,
            "Coefficients (increasing degree): [{}]",
            self.fit
                .coefficients()
                .iter()
                .map(|c| format!("{:.6}", c))
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(
            f,
            "R² (regression of fitted curve on sampled force): {}",
            format_optional(self.fit.regression.map(|r| r.r_squared))
        )?;
        write!(
            f,
            "R² (direct, 1 - SS_res/SS_tot): {}",
            format_optional(self.fit.determination)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_system::flight_table::FlightRow;
    use crate::trajectory_system::windowed_series::build_windowed_series;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(2.5), "2.50s");
        assert_eq!(format_time(62.5), "1m 02.50s");
        assert_eq!(format_time(3725.0), "1h 2m 05.00s");
        assert_eq!(format_time(-1.25), "-1.25s");
        assert_eq!(format_time(f64::INFINITY), "end");
        assert_eq!(format_time(f64::NEG_INFINITY), "start");
    }

    #[test]
    fn test_comparison_report_summary() {
        let rows: Vec<FlightRow> = (0..5)
            .map(|i| FlightRow {
                time: i as f64,
                zenith_deg: 90.0,
                total_velocity: 10.0,
                gravity: 9.81,
                vertical_acceleration: -10.0,
            })
            .collect();
        let coefficients = DragCoefficients::new(0.1, 0.0, 0.0);
        let series =
            build_windowed_series(&rows, &coefficients, TimeWindow::new(1.0, 3.0).unwrap());
        let report = ComparisonReport::new(
            PathBuf::from("raw data.csv"),
            coefficients,
            5,
            Some((0.0, 4.0)),
            &series,
        );

        assert_eq!(report.window_rows, 3);
        assert_eq!(report.residuals.count, 3);
        let text = report.to_string();
        assert!(text.contains("Rows in window: 3 of 5"));
        assert!(text.contains("Flight data: 0.00s to 4.00s"));
        assert!(text.contains("Window: 1.00s to 3.00s"));
        assert!(text.contains("-9.910 m/s²"));
    }

    #[test]
    fn test_fit_report_lists_both_r_squared() {
        let fit =
            FittedPolynomial::fit(&[0.0, 1.0, 2.0, 3.0], &[0.0, 6.0, 18.0, 36.0], 2).unwrap();
        let report = FitReport {
            source: PathBuf::from("samples.csv"),
            samples: 4,
            fit,
        };
        let text = report.to_string();
        assert!(text.contains("R² (regression of fitted curve on sampled force): 1.000000"));
        assert!(text.contains("R² (direct, 1 - SS_res/SS_tot): 1.000000"));
    }
}
