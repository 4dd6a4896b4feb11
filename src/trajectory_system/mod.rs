pub mod drag_model;
pub mod windowed_series;
