pub mod constants;
pub mod control;
pub mod data_system;
pub mod errors;
pub mod fit_system;
pub mod report_system;
pub mod trajectory_system;

pub use control::analysis_config::{
    AnalysisConfig, ComparisonConfig, ComparisonParams, FitConfig, WindowBound,
};
pub use control::coefficient_fit::{fit_samples, run_fit, CoefficientFit};
pub use control::drag_comparison::{compare, run_comparison, DragComparison};
pub use errors::AnalysisError;

// Re-export commonly used items from data_system
pub use data_system::flight_events::{FlightEvent, FlightEventKind};
pub use data_system::flight_table::{FlightColumns, FlightRow, FlightTable};
pub use data_system::sample_table::{SampleColumns, SamplePoint, SampleTable};
pub use data_system::table_loader::TableSource;

// Re-export commonly used items from trajectory_system and fit_system
pub use fit_system::polynomial_fitter::{fit_polynomial, FittedPolynomial, Polynomial};
pub use trajectory_system::drag_model::{predict_acceleration, vertical_projection, DragCoefficients};
pub use trajectory_system::windowed_series::{build_windowed_series, DerivedSeries, TimeWindow};

// Re-export commonly used items from report_system
pub use report_system::overlay_renderer::{OverlayChart, OverlaySeries, SeriesStyle};
