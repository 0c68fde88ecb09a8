/// Errors reading or writing a history file
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to access history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed history CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date {value:?} on row {row}")]
    InvalidDate { row: usize, value: String },
}

/// Errors saving a check-in's history and progress together
#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error("Failed to write check-in files: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reading or writing a progress file
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Failed to access progress file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed progress JSON: {0}")]
    Json(#[from] serde_json::Error),
}
