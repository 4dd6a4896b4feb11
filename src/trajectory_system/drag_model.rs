use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{COEFFICIENT_COUNT, COEFFICIENT_MAX, COEFFICIENT_MIN};
use crate::data_system::flight_table::FlightRow;
use crate::errors::AnalysisError;

/// C_f: constant, linear and quadratic terms of the drag-acceleration model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragCoefficients(pub [f64; COEFFICIENT_COUNT]);

impl DragCoefficients {
    pub fn new(constant: f64, linear: f64, quadratic: f64) -> Self {
        DragCoefficients([constant, linear, quadratic])
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, AnalysisError> {
        let values: [f64; COEFFICIENT_COUNT] = values.try_into().map_err(|_| {
            AnalysisError::InvalidParameter(format!(
                "expected {} drag coefficients, got {}",
                COEFFICIENT_COUNT,
                values.len()
            ))
        })?;
        Ok(DragCoefficients(values))
    }

    /// C_f[0] + C_f[1]·v + C_f[2]·v²
    pub fn drag_term(&self, total_velocity: f64) -> f64 {
        let [c0, c1, c2] = self.0;
        c0 + c1 * total_velocity + c2 * total_velocity.powi(2)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (index, value) in self.0.iter().enumerate() {
            if !value.is_finite() || *value < COEFFICIENT_MIN || *value > COEFFICIENT_MAX {
                return Err(AnalysisError::InvalidParameter(format!(
                    "C_f[{}] = {} is outside [{}, {}]",
                    index, value, COEFFICIENT_MIN, COEFFICIENT_MAX
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for DragCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [c0, c1, c2] = self.0;
        write!(f, "[{:.4}, {:.4}, {:.4}]", c0, c1, c2)
    }
}

/// Axial-to-vertical projection factor u_z for a zenith angle in degrees.
pub fn vertical_projection(zenith_deg: f64) -> f64 {
    zenith_deg.to_radians().sin()
}

/// a = -u_z·(C_f[0] + C_f[1]·v + C_f[2]·v²) - g
///
/// Total over the reals; NaN inputs give a NaN result.
pub fn predict_acceleration(
    u_z: f64,
    coefficients: &DragCoefficients,
    total_velocity: f64,
    g: f64,
) -> f64 {
    -u_z * coefficients.drag_term(total_velocity) - g
}

pub fn predict_row(row: &FlightRow, coefficients: &DragCoefficients) -> f64 {
    predict_acceleration(
        vertical_projection(row.zenith_deg),
        coefficients,
        row.total_velocity,
        row.gravity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_zero_coefficients_leave_pure_gravity() {
        let zero = DragCoefficients::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let u_z = rng.gen_range(-1.0..=1.0);
            let velocity = rng.gen_range(-500.0..500.0);
            let g = rng.gen_range(0.0..20.0);
            assert_relative_eq!(
                predict_acceleration(u_z, &zero, velocity, g),
                -g,
                epsilon = EPSILON
            );
        }
    }

    #[test]
    fn test_known_value() {
        let coefficients = DragCoefficients::new(0.1, 0.02, 0.003);
        // 0.1 + 0.02*100 + 0.003*10000 = 32.1
        let acceleration = predict_acceleration(0.5, &coefficients, 100.0, 9.81);
        assert_relative_eq!(acceleration, -0.5 * 32.1 - 9.81, epsilon = EPSILON);
    }

    #[test]
    fn test_drag_grows_with_speed_for_sane_coefficients() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let coefficients = DragCoefficients::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
            );
            let u_z = rng.gen_range(0.01..=1.0);
            let g = 9.81;

            let mut velocity = 0.0;
            let mut previous = predict_acceleration(u_z, &coefficients, velocity, g);
            while velocity < 300.0 {
                velocity += 2.5;
                let current = predict_acceleration(u_z, &coefficients, velocity, g);
                assert!(
                    current <= previous,
                    "acceleration rose from {} to {} at v = {} for C_f {}",
                    previous,
                    current,
                    velocity,
                    coefficients
                );
                previous = current;
            }
        }
    }

    #[test]
    fn test_nan_propagates() {
        let coefficients = DragCoefficients::new(0.1, 0.1, 0.1);
        assert!(predict_acceleration(0.5, &coefficients, f64::NAN, 9.81).is_nan());
        assert!(predict_acceleration(f64::NAN, &coefficients, 10.0, 9.81).is_nan());
        assert!(predict_acceleration(0.5, &coefficients, 10.0, f64::NAN).is_nan());
    }

    #[test]
    fn test_vertical_projection() {
        assert_relative_eq!(vertical_projection(90.0), 1.0, epsilon = EPSILON);
        assert_relative_eq!(vertical_projection(0.0), 0.0, epsilon = EPSILON);
        assert_relative_eq!(vertical_projection(30.0), 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_predict_row_keeps_gravity_and_velocity_distinct() {
        let row = FlightRow {
            time: 1.0,
            zenith_deg: 90.0,
            total_velocity: 50.0,
            gravity: 9.8,
            vertical_acceleration: 0.0,
        };
        let coefficients = DragCoefficients::new(0.0, 0.0, 0.001);
        assert_relative_eq!(
            predict_row(&row, &coefficients),
            -(0.001 * 2500.0) - 9.8,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_coefficient_validation() {
        assert!(DragCoefficients::new(-1.0, 0.0, 1.0).validate().is_ok());
        assert!(DragCoefficients::new(1.5, 0.0, 0.0).validate().is_err());
        assert!(DragCoefficients::new(0.0, f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_from_slice_requires_three_values() {
        assert_eq!(
            DragCoefficients::from_slice(&[0.1, 0.2, 0.3]).unwrap(),
            DragCoefficients::new(0.1, 0.2, 0.3)
        );
        assert!(DragCoefficients::from_slice(&[0.1, 0.2]).is_err());
    }
}
