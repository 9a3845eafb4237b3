use thiserror::Error;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file has no '{column}' column")]
    MissingColumn { column: String },

    #[error("Input closed before a threshold was entered")]
    PromptClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejected threshold input. The prompt recovers from these by asking again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("Invalid input. Enter a number like 0.7 or type '?' to view similarity descriptions.")]
    NotANumber,

    #[error("Please enter a value between 0.0 and 1.0.")]
    OutOfRange(f64),
}
