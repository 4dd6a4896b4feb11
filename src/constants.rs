use plotters::style::colors::full_palette::{BLUE, DEEPORANGE, GREEN, GREY};
use plotters::style::RGBColor;

// Flight-simulator export layout
pub const DEFAULT_FLIGHT_SHEET: &str = "raw data";
pub const COLUMN_TIME: &str = "Time (s)";
pub const COLUMN_ZENITH: &str = "Vertical orientation (zenith) (°)";
pub const COLUMN_TOTAL_VELOCITY: &str = "Total velocity (m/s)";
pub const COLUMN_GRAVITY: &str = "Gravitational acceleration (m/s²)";
pub const COLUMN_VERTICAL_ACCELERATION: &str = "Vertical acceleration (m/s²)";

// CFD sample layout
pub const DEFAULT_SAMPLE_SHEET: &str = "samples";
pub const COLUMN_VELOCITY: &str = "velocity";
pub const COLUMN_ADDED_FORCE: &str = "added_force";

pub const SHEET_EXTENSION: &str = "csv";
pub const COMMENT_PREFIX: char = '#';

// Drag coefficient bounds (inclusive)
pub const COEFFICIENT_MIN: f64 = -1.0;
pub const COEFFICIENT_MAX: f64 = 1.0;
pub const COEFFICIENT_COUNT: usize = 3;

// Fitting
pub const DEFAULT_FIT_DEGREE: usize = 2;
pub const SINGULAR_VALUE_TOLERANCE: f64 = 1e-12; // relative to the largest singular value
pub const FITTED_CURVE_RESOLUTION: usize = 200;

// Output
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const COMPARISON_PLOT_FILE: &str = "drag_comparison.png";
pub const COMPARISON_EXPORT_FILE: &str = "drag_comparison.csv";
pub const FIT_PLOT_FILE: &str = "coefficient_fit.png";
pub const FIT_EXPORT_FILE: &str = "coefficient_fit.csv";
pub const FIT_CURVE_EXPORT_FILE: &str = "coefficient_fit_curve.csv";

// Plot dimensions and styling
pub const PLOT_WIDTH: u32 = 1280;
pub const PLOT_HEIGHT: u32 = 800;
pub const FONT_SIZE_TITLE: u32 = 28;
pub const FONT_SIZE_AXIS_LABEL: u32 = 18;
pub const FONT_SIZE_MESSAGE: u32 = 24;
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 3;
pub const SCATTER_MARKER_SIZE: u32 = 4;

pub const COLOR_PREDICTED: &RGBColor = &DEEPORANGE;
pub const COLOR_REFERENCE: &RGBColor = &BLUE;
pub const COLOR_SAMPLES: &RGBColor = &GREY;
pub const COLOR_FITTED: &RGBColor = &GREEN;
