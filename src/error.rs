use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Plan not ready for export, missing: {}", .0.join(", "))]
    NotReady(Vec<&'static str>),
}

/// Why a text field could not be used as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a finite number")]
    NotFinite(String),

    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
