use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error(
        "Rank deficient fit: {distinct} distinct x-value(s), a degree {degree} polynomial needs at least {}",
        .degree + 1
    )]
    RankDeficient { distinct: usize, degree: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
