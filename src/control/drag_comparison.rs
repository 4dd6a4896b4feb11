use std::path::PathBuf;

use tracing::info;

use super::analysis_config::{ComparisonConfig, ComparisonParams};
use crate::constants::{COLOR_PREDICTED, COLOR_REFERENCE};
use crate::data_system::flight_table::FlightTable;
use crate::errors::AnalysisError;
use crate::report_system::overlay_renderer::{OverlayChart, OverlaySeries};
use crate::report_system::report::ComparisonReport;
use crate::trajectory_system::drag_model::DragCoefficients;
use crate::trajectory_system::windowed_series::{build_windowed_series, DerivedSeries};

/// Result of one comparison pass: the derived series plus what produced it.
#[derive(Debug, Clone)]
pub struct DragComparison {
    pub source: PathBuf,
    pub coefficients: DragCoefficients,
    pub table_rows: usize,
    pub table_span: Option<(f64, f64)>,
    pub series: DerivedSeries,
}

/// Runs the model over `table` with `params`. Calling it again with new
/// parameters is how a re-run happens; nothing is cached between calls.
pub fn compare(
    table: &FlightTable,
    params: &ComparisonParams,
) -> Result<DragComparison, AnalysisError> {
    params.validate()?;
    let window = params.resolve_window(table)?;
    let series = build_windowed_series(&table.rows, &params.coefficients, window);

    info!(
        "Compared C_f {} over [{}, {}]: {} of {} row(s)",
        params.coefficients,
        window.start,
        window.end,
        series.len(),
        table.len()
    );

    Ok(DragComparison {
        source: table.source.clone(),
        coefficients: params.coefficients,
        table_rows: table.len(),
        table_span: table.time_span(),
        series,
    })
}

/// Loads the configured flight table and runs one comparison pass.
pub fn run_comparison(config: &ComparisonConfig) -> Result<DragComparison, AnalysisError> {
    let params = config.params();
    params.validate()?;
    let table = FlightTable::load(&config.source()?, &config.columns)?;
    compare(&table, &params)
}

impl DragComparison {
    pub fn report(&self) -> ComparisonReport {
        ComparisonReport::new(
            self.source.clone(),
            self.coefficients,
            self.table_rows,
            self.table_span,
            &self.series,
        )
    }

    /// Predicted and reference vertical acceleration over the window.
    pub fn chart(&self) -> OverlayChart {
        OverlayChart::new(
            format!("Drag model vs simulation (C_f = {})", self.coefficients),
            "Time (s)",
            "Vertical acceleration (m/s²)",
        )
        .with_series(OverlaySeries::line(
            "Simulated vertical acceleration",
            self.series.reference(),
            *COLOR_REFERENCE,
        ))
        .with_series(OverlaySeries::line(
            "Predicted acceleration",
            self.series.predicted(),
            *COLOR_PREDICTED,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::analysis_config::WindowBound;
    use crate::data_system::flight_events::{FlightEvent, FlightEventKind};
    use crate::data_system::flight_table::FlightRow;

    fn table() -> FlightTable {
        let rows = (0..10)
            .map(|i| FlightRow {
                time: i as f64 * 0.5,
                zenith_deg: 85.0,
                total_velocity: 20.0 * i as f64,
                gravity: 9.81,
                vertical_acceleration: -9.81,
            })
            .collect();
        FlightTable::from_rows(rows).with_events(vec![
            FlightEvent {
                kind: FlightEventKind::Burnout,
                time: 1.0,
            },
            FlightEvent {
                kind: FlightEventKind::Apogee,
                time: 3.0,
            },
        ])
    }

    #[test]
    fn test_burnout_to_apogee() {
        let params = ComparisonParams {
            coefficients: DragCoefficients::new(0.0, 0.01, 0.001),
            window_start: WindowBound::Event(FlightEventKind::Burnout),
            window_end: WindowBound::Event(FlightEventKind::Apogee),
        };
        let comparison = compare(&table(), &params).unwrap();
        assert_eq!(comparison.series.times(), vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        assert_eq!(comparison.table_rows, 10);
        assert_eq!(comparison.table_span, Some((0.0, 4.5)));
        assert!(comparison
            .report()
            .to_string()
            .contains("Flight data: 0.00s to 4.50s"));
    }

    #[test]
    fn test_rerun_with_new_coefficients_rebuilds_series() {
        let table = table();
        let first = compare(&table, &ComparisonParams::default()).unwrap();
        let second = compare(
            &table,
            &ComparisonParams {
                coefficients: DragCoefficients::new(0.5, 0.0, 0.0),
                ..ComparisonParams::default()
            },
        )
        .unwrap();

        assert_eq!(first.series.len(), second.series.len());
        assert!(first
            .series
            .points()
            .iter()
            .zip(second.series.points())
            .all(|(a, b)| b.predicted < a.predicted));
    }

    #[test]
    fn test_out_of_range_coefficient_is_rejected() {
        let params = ComparisonParams {
            coefficients: DragCoefficients::new(0.0, 0.0, -1.5),
            ..ComparisonParams::default()
        };
        assert!(matches!(
            compare(&table(), &params),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_chart_overlays_reference_and_prediction() {
        let comparison = compare(&table(), &ComparisonParams::default()).unwrap();
        let chart = comparison.chart();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].data.len(), 10);
        assert_eq!(chart.series[1].data.len(), 10);
    }
}
