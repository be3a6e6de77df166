/// Error types for the DANA data model
use thiserror::Error;

/// Main error type for loading and interpreting story data
#[derive(Error, Debug)]
pub enum MeteoError {
    /// The payload was not valid JSON for the expected shape
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload decoded but is missing something the story needs
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Geometry type other than Polygon / MultiPolygon
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

/// Type alias for Results using MeteoError
pub type Result<T> = std::result::Result<T, MeteoError>;
