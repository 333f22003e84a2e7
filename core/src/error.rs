use thiserror::Error;

/// Errors surfaced by the core library.
///
/// None of these are fatal: callers show the message and let the user
/// correct the input. An aggregation that matches no entries is not an
/// error and simply yields nothing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid profile {field}: {reason}")]
    InvalidProfile { field: &'static str, reason: String },

    #[error("Unknown food '{0}'")]
    UnknownFood(String),

    #[error("Invalid {field}: {reason}")]
    InvalidEntry { field: &'static str, reason: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("No log entry with id '{0}'")]
    EntryNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn profile(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn entry(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
