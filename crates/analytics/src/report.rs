use crate::comparison::DailyReturnRow;
use crate::simulation::SimulatedInvestment;
use chrono::{DateTime, Utc};
use core_types::Bar;
use serde::{Deserialize, Serialize};

/// Everything the presentation layer needs to draw one stock-vs-benchmark view.
///
/// This struct is the final output of the `AnalyticsEngine`. Missing markers
/// serialize as `null` so a chart can render them as gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    // I. Headline metrics
    pub symbol: String,
    pub benchmark_symbol: String,
    pub instrument_return: f64,
    pub benchmark_return: f64,
    pub simulation: SimulatedInvestment,

    // II. Derived series
    pub daily_returns: Vec<DailyReturnRow>,
    pub volume: Vec<VolumePoint>,
    pub moving_average: Vec<MovingAveragePoint>,
    /// Number of bars in each moving-average window.
    pub moving_average_window: usize,

    // III. Chart data
    /// The instrument's OHLCV bars, for a candlestick chart.
    pub candles: Vec<Bar>,
    /// The benchmark's adjusted close, drawn over the candles.
    pub benchmark_close: Vec<PricePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub timestamp: DateTime<Utc>,
    pub volume: f64,
}

/// A raw value next to its trailing average, for the price/MA line chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAveragePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub average: Option<f64>,
}
