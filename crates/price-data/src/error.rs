use chrono::NaiveDate;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read price data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path}: required column '{column}' is missing")]
    MissingColumn { path: String, column: String },

    #[error("{path}, line {line}: cannot parse {column} value '{value}'")]
    InvalidValue {
        path: String,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{path}: date {date} appears more than once")]
    DuplicateDate { path: String, date: NaiveDate },

    #[error("No price data available for symbol '{0}'")]
    UnknownSymbol(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Price data failed validation: {0}")]
    Invalid(#[from] CoreError),
}
