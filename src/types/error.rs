//! Error types for order loading and validation

use thiserror::Error;

/// Errors raised while reading, validating or rendering orders
#[derive(Debug, Error)]
pub enum OrderStatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Invalid date '{value}' (expected YYYY-DD-MM)")]
    InvalidDateFormat { value: String },

    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid {field} value: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Negative {field}: {value}")]
    NegativeValue { field: &'static str, value: String },

    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
}

impl From<simd_json::Error> for OrderStatsError {
    fn from(e: simd_json::Error) -> Self {
        OrderStatsError::Json(e.to_string())
    }
}

impl From<serde_json::Error> for OrderStatsError {
    fn from(e: serde_json::Error) -> Self {
        OrderStatsError::Json(e.to_string())
    }
}

impl OrderStatsError {
    /// Short, stable label used when tallying dropped records
    pub fn reason(&self) -> &'static str {
        match self {
            OrderStatsError::Io(_) => "io",
            OrderStatsError::Csv(_) => "csv",
            OrderStatsError::Json(_) => "json",
            OrderStatsError::InvalidDateFormat { .. } => "invalid date",
            OrderStatsError::MissingRequiredField { .. } => "missing field",
            OrderStatsError::MissingColumns(_) => "missing columns",
            OrderStatsError::InvalidNumber { .. } => "invalid number",
            OrderStatsError::InvalidValue { .. } => "invalid value",
            OrderStatsError::NegativeValue { .. } => "negative value",
            OrderStatsError::DuplicateOrderId(_) => "duplicate order id",
            OrderStatsError::UnsupportedFormat(_) => "unsupported format",
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderStatsError>;
