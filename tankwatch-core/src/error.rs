use thiserror::Error;

#[derive(Debug, Error)]
pub enum TankwatchError {
    #[error("Tank '{0}' not found")]
    TankNotFound(String),

    #[error("Maintenance schedule for '{0}' not found")]
    ScheduleNotFound(String),

    #[error("Ward '{0}' not found")]
    WardNotFound(String),

    #[error("Alert '{0}' not found")]
    AlertNotFound(String),

    #[error("Invalid date '{0}'. Expected 'YYYY-MM-DD'")]
    InvalidDate(String),

    #[error("Insufficient history: need {required} samples, have {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),
}
