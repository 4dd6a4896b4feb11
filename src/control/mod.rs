pub mod analysis_config;
pub mod coefficient_fit;
pub mod drag_comparison;
