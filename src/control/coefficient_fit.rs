use tracing::info;

use super::analysis_config::FitConfig;
use crate::constants::{COLOR_FITTED, COLOR_SAMPLES, FITTED_CURVE_RESOLUTION};
use crate::data_system::sample_table::SampleTable;
use crate::errors::AnalysisError;
use crate::fit_system::polynomial_fitter::FittedPolynomial;
use crate::report_system::overlay_renderer::{OverlayChart, OverlaySeries};
use crate::report_system::report::FitReport;

#[derive(Debug, Clone)]
pub struct CoefficientFit {
    pub samples: SampleTable,
    pub fit: FittedPolynomial,
}

/// Fits force as a polynomial of velocity.
pub fn fit_samples(samples: SampleTable, degree: usize) -> Result<CoefficientFit, AnalysisError> {
    let fit = FittedPolynomial::fit(&samples.velocities(), &samples.forces(), degree)?;
    Ok(CoefficientFit { samples, fit })
}

/// Loads the configured sample table and fits it.
pub fn run_fit(config: &FitConfig) -> Result<CoefficientFit, AnalysisError> {
    let samples = SampleTable::load(&config.source()?, &config.columns)?;
    let result = fit_samples(samples, config.degree)?;
    info!(
        "Fitted {} sample(s) from {}",
        result.samples.len(),
        result.samples.source.display()
    );
    Ok(result)
}

impl CoefficientFit {
    pub fn report(&self) -> FitReport {
        FitReport {
            source: self.samples.source.clone(),
            samples: self.samples.len(),
            fit: self.fit.clone(),
        }
    }

    /// The fitted curve sampled evenly across the velocity range of the data.
    pub fn fitted_curve(&self, resolution: usize) -> Vec<(f64, f64)> {
        let velocities = self.samples.velocities();
        let (lo, hi) = velocities
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() || !hi.is_finite() || resolution == 0 {
            return Vec::new();
        }
        if resolution == 1 || hi == lo {
            return vec![(lo, self.fit.evaluate(lo))];
        }

        let step = (hi - lo) / (resolution - 1) as f64;
        (0..resolution)
            .map(|i| {
                let v = if i == resolution - 1 { hi } else { lo + step * i as f64 };
                (v, self.fit.evaluate(v))
            })
            .collect()
    }

    pub fn chart(&self) -> OverlayChart {
        let samples = self
            .samples
            .points
            .iter()
            .map(|p| (p.velocity, p.force))
            .collect();

        OverlayChart::new(
            format!("Drag force fit: F(v) = {}", self.fit.polynomial),
            "Velocity",
            "Added force",
        )
        .with_series(OverlaySeries::scatter("CFD samples", samples, *COLOR_SAMPLES))
        .with_series(OverlaySeries::line(
            "Fitted polynomial",
            self.fitted_curve(FITTED_CURVE_RESOLUTION),
            *COLOR_FITTED,
        ))
    }
}
