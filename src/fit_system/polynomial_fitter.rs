use std::fmt;

use nalgebra::{DMatrix, DVector};
use tracing::{debug, info};

use super::linear_regression::{regress, LinearRegression};
use crate::constants::SINGULAR_VALUE_TOLERANCE;
use crate::errors::AnalysisError;

/// Polynomial with coefficients in increasing-degree order:
/// `coefficients[k]` multiplies `x^k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Polynomial { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (power, c) in self.coefficients.iter().enumerate() {
            if power > 0 {
                write!(f, " {} ", if *c < 0.0 { '-' } else { '+' })?;
            } else if *c < 0.0 {
                write!(f, "-")?;
            }
            let magnitude = c.abs();
            match power {
                0 => write!(f, "{:.4}", magnitude)?,
                1 => write!(f, "{:.4}·v", magnitude)?,
                2 => write!(f, "{:.4}·v²", magnitude)?,
                3 => write!(f, "{:.4}·v³", magnitude)?,
                _ => write!(f, "{:.4}·v^{}", magnitude, power)?,
            }
        }
        Ok(())
    }
}

/// Least-squares polynomial of `degree` through `(x, y)`.
///
/// Fails with `RankDeficient` when there are fewer than `degree + 1` distinct
/// x-values; no best-effort coefficients are returned.
pub fn fit_polynomial(x: &[f64], y: &[f64], degree: usize) -> Result<Polynomial, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::DataFormat(format!(
            "fit input has {} x-value(s) but {} y-value(s)",
            x.len(),
            y.len()
        )));
    }
    if let Some(index) = x
        .iter()
        .zip(y)
        .position(|(xi, yi)| !xi.is_finite() || !yi.is_finite())
    {
        return Err(AnalysisError::DataFormat(format!(
            "fit sample {} is not finite: ({}, {})",
            index + 1,
            x[index],
            y[index]
        )));
    }

    let distinct = distinct_count(x);
    if distinct < degree + 1 {
        return Err(AnalysisError::RankDeficient { distinct, degree });
    }

    let columns = degree + 1;
    let design = DMatrix::from_fn(x.len(), columns, |i, j| x[i].powi(j as i32));
    let observations = DVector::from_column_slice(y);

    let svd = design.svd(true, true);
    let tolerance = svd.singular_values.max() * SINGULAR_VALUE_TOLERANCE;
    if svd.rank(tolerance) < columns {
        return Err(AnalysisError::RankDeficient { distinct, degree });
    }
    let solution = svd
        .solve(&observations, tolerance)
        .map_err(|e| AnalysisError::DataFormat(format!("least-squares solve failed: {}", e)))?;

    let polynomial = Polynomial::new(solution.iter().copied().collect());
    debug!("Fitted degree {} polynomial: {}", degree, polynomial);
    Ok(polynomial)
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}

/// 1 - SS_res / SS_tot of `model` against the samples.
pub fn coefficient_of_determination(model: &Polynomial, x: &[f64], y: &[f64]) -> Option<f64> {
    if y.is_empty() {
        return None;
    }
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|yi| (yi - mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| (yi - model.evaluate(xi)).powi(2))
        .sum();

    if ss_tot > 0.0 {
        Some(1.0 - ss_res / ss_tot)
    } else {
        None
    }
}

/// A fitted polynomial together with its two goodness-of-fit figures.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPolynomial {
    pub polynomial: Polynomial,
    /// OLS line with the sampled y as the independent variable and the fitted
    /// curve at each sample as the dependent one. Its R² is the reported figure.
    pub regression: Option<LinearRegression>,
    /// Direct 1 - SS_res/SS_tot of the polynomial against the samples.
    pub determination: Option<f64>,
}

impl FittedPolynomial {
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self, AnalysisError> {
        let polynomial = fit_polynomial(x, y, degree)?;

        let fitted: Vec<f64> = x.iter().map(|&xi| polynomial.evaluate(xi)).collect();
        let regression = regress(y, &fitted);
        let determination = coefficient_of_determination(&polynomial, x, y);

        info!(
            "Fit over {} sample(s): {} (R² = {}, direct R² = {})",
            x.len(),
            polynomial,
            format_optional(regression.map(|r| r.r_squared)),
            format_optional(determination)
        );

        Ok(FittedPolynomial {
            polynomial,
            regression,
            determination,
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.polynomial.coefficients
    }

    /// The reported R²; NaN when the regression is undefined.
    pub fn r_squared(&self) -> f64 {
        self.regression.map_or(f64::NAN, |r| r.r_squared)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.polynomial.evaluate(x)
    }
}

pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.6}", v))
}
