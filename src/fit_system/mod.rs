pub mod linear_regression;
pub mod polynomial_fitter;
