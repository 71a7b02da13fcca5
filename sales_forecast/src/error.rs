//! Error types for the sales_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Synthetic history could not be generated from the given parameters
    #[error("Data generation error: {0}")]
    DataGeneration(String),

    /// Too little or degenerate data to fit or evaluate the model
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A model artifact exists but cannot be read back
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A prediction was requested before any model was trained or loaded
    #[error("Model not ready: {0}")]
    NotReady(String),

    /// The requested forecast horizon is out of range
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model artifact could not be written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Forecast export failed
    #[error("Export error: {0}")]
    Export(String),

    /// Error from the numeric layer
    #[error("Math error: {0}")]
    Math(MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            other => ForecastError::Math(other),
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Export(err.to_string())
    }
}
