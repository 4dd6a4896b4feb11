pub mod export;
pub mod overlay_renderer;
pub mod report;
