use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Feed could not be decoded: {0}")]
    Decode(String),

    #[error("Feed body is empty: {0}")]
    EmptyFeed(String),

    #[error("Data for {year}-{month:02} is not available before day {available_from}")]
    DataNotYetAvailable {
        year: i32,
        month: u32,
        available_from: u32,
    },

    #[error("Invalid date '{value}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ")]
    InvalidDate { value: String },

    #[error("Start time {start} must be before or equal to end time {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Unknown index '{name}', allowed are: {allowed}")]
    InvalidIndex { name: String, allowed: String },

    #[error("Unknown status option '{name}', allowed are: all, def")]
    InvalidStatus { name: String },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}
