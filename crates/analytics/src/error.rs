use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: series '{0}' has no bars")]
    EmptySeries(String),

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(String),

    #[error("Cannot normalize '{field}' of '{symbol}': the maximum value is zero")]
    ZeroMaximum { symbol: String, field: String },

    #[error("Series '{0}' and '{1}' share no common timestamp")]
    NoOverlap(String, String),

    #[error("Invalid moving-average window: {0}")]
    InvalidWindow(usize),

    #[error("Invalid investment amount: {0}")]
    InvalidAmount(String),

    #[error("Simulated value of {0} overflows the decimal range")]
    AmountOverflow(String),

    #[error("Return of {0} cannot be applied to a money amount")]
    NonFiniteReturn(f64),
}
