use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum RigError {
    #[error("no input file given")]
    NoInput,
    #[error("input file {} not found", .0.display())]
    InputNotFound(PathBuf),
    #[error("input has no `{0}` column")]
    MissingColumn(String),
    #[error("invalid ADC code {value:?} on line {line}")]
    InvalidCode { line: u64, value: String },
    #[error("capture is empty (no header line)")]
    EmptyCapture,
    #[error("resistance table has no data rows")]
    EmptyTable,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for RigError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        RigError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for RigError {
    fn from(value: image::ImageError) -> Self {
        RigError::Plot(value.to_string())
    }
}
