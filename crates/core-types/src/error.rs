use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Bar timestamps must be strictly increasing: {current} does not follow {previous}")]
    UnorderedTimestamps {
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("Bar at {timestamp} has an invalid {field} value: {value}")]
    InvalidPrice {
        timestamp: DateTime<Utc>,
        field: String,
        value: f64,
    },

    #[error("Unknown price field: '{0}'")]
    UnknownField(String),
}
