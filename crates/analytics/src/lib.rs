//! # Vantage Analytics
//!
//! This crate turns the price history of an instrument and its benchmark into
//! the numbers a comparison dashboard shows: period returns, a simulated
//! investment, normalized daily returns and a trailing moving average.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0) and never logs or prints.
//! - **Stateless Calculation:** Every function takes immutable `PriceSeries` references and
//!   returns new values. Nothing is cached or written back into the inputs.
//! - **Explicit Gaps:** A value that cannot be computed is `None`, never `0.0`.
//!
//! ## Public API
//!
//! - `total_return`, `percent_change_series`: period and step returns.
//! - `normalize`, `align_and_compare_daily_returns`: instrument-vs-benchmark comparison.
//! - `rolling_mean`: trailing simple moving average.
//! - `AnalyticsEngine`: assembles all of the above into a `DashboardReport`.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod comparison;
pub mod engine;
pub mod error;
pub mod moving_average;
pub mod report;
pub mod returns;
pub mod simulation;

#[cfg(test)]
mod test_support;

// Re-export the key components to create a clean, public-facing API.
pub use comparison::{DailyReturnRow, align_and_compare_daily_returns, normalize};
pub use engine::{AnalyticsEngine, DashboardSettings};
pub use error::AnalyticsError;
pub use moving_average::rolling_mean;
pub use report::{DashboardReport, MovingAveragePoint, PricePoint, VolumePoint};
pub use returns::{PercentChange, percent_change, percent_change_series, total_return};
pub use simulation::{Outcome, SimulatedInvestment};
