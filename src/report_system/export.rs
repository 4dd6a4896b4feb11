use std::fs;
use std::path::Path;

use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::data_system::sample_table::SampleTable;
use crate::errors::AnalysisError;
use crate::fit_system::polynomial_fitter::FittedPolynomial;
use crate::trajectory_system::windowed_series::DerivedSeries;

const DERIVED_SERIES_HEADER: [&str; 4] = ["time", "predicted", "reference", "residual"];

#[derive(Debug, Serialize)]
struct FitTerm {
    term: String,
    value: Option<f64>,
}

#[derive(Debug, Serialize)]
struct FitCurveRow {
    velocity: f64,
    force: f64,
    fitted: f64,
}

fn create_writer(path: &Path) -> Result<Writer<fs::File>, AnalysisError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Writer::from_path(path).map_err(|e| write_error(path, e))
}

fn write_error(path: &Path, error: csv::Error) -> AnalysisError {
    match error.into_kind() {
        csv::ErrorKind::Io(e) => AnalysisError::Io(e),
        other => AnalysisError::DataFormat(format!(
            "failed to write {}: {:?}",
            path.display(),
            other
        )),
    }
}

/// Writes `time,predicted,reference,residual` rows.
pub fn export_derived_series(series: &DerivedSeries, path: &Path) -> Result<(), AnalysisError> {
    let mut writer = create_writer(path)?;
    // serde only emits the header alongside the first row
    if series.is_empty() {
        writer
            .write_record(DERIVED_SERIES_HEADER)
            .map_err(|e| write_error(path, e))?;
    }
    for point in series.points() {
        writer.serialize(point).map_err(|e| write_error(path, e))?;
    }
    writer.flush()?;
    info!("Exported {} derived point(s) to {}", series.len(), path.display());
    Ok(())
}

/// Writes `term,value` rows: `c0..cN`, then the reported and the direct R².
pub fn export_fit(fit: &FittedPolynomial, path: &Path) -> Result<(), AnalysisError> {
    let mut writer = create_writer(path)?;

    let coefficient_terms = fit
        .coefficients()
        .iter()
        .enumerate()
        .map(|(power, &value)| FitTerm {
            term: format!("c{}", power),
            value: Some(value),
        });
    let statistic_terms = [
        FitTerm {
            term: "r_squared".to_string(),
            value: fit.regression.map(|r| r.r_squared),
        },
        FitTerm {
            term: "r_squared_direct".to_string(),
            value: fit.determination,
        },
    ];

    for term in coefficient_terms.chain(statistic_terms) {
        writer.serialize(term).map_err(|e| write_error(path, e))?;
    }
    writer.flush()?;
    info!("Exported fit coefficients to {}", path.display());
    Ok(())
}

/// Writes each sample next to the fitted curve's value at its velocity.
pub fn export_fit_curve(
    samples: &SampleTable,
    fit: &FittedPolynomial,
    path: &Path,
) -> Result<(), AnalysisError> {
    let mut writer = create_writer(path)?;
    for point in &samples.points {
        writer
            .serialize(FitCurveRow {
                velocity: point.velocity,
                force: point.force,
                fitted: fit.evaluate(point.velocity),
            })
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush()?;
    info!("Exported fitted curve to {}", path.display());
    Ok(())
}
