use thiserror::Error;

/// searchlead error types
#[derive(Error, Debug)]
pub enum LeadError {
    /// Malformed numeric or date text in a source table
    #[error("parse error in column '{column}': cannot parse '{value}'")]
    Parse { column: String, value: String },

    /// Max-normalization over an empty or all-zero series
    #[error("division by zero: series '{0}' has no positive maximum")]
    DivisionByZero(String),

    /// Unknown indicator name
    #[error("no indicator named '{0}'")]
    NotFound(String),

    /// Two indicators registered under the same name
    #[error("duplicate indicator name '{0}'")]
    DuplicateName(String),

    /// Data fetch failed in an acquisition source
    #[error("acquisition error: {0}")]
    Acquisition(String),

    /// Source authentication failed or was never performed
    #[error("auth error: {0}")]
    Auth(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl LeadError {
    pub fn parse(column: &str, value: &str) -> Self {
        Self::Parse {
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for searchlead
pub type Result<T> = std::result::Result<T, LeadError>;
