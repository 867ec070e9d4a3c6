use crate::comparison::align_and_compare_daily_returns;
use crate::error::AnalyticsError;
use crate::moving_average::rolling_mean;
use crate::report::{DashboardReport, MovingAveragePoint, PricePoint, VolumePoint};
use crate::returns::total_return;
use crate::simulation::SimulatedInvestment;
use core_types::{PriceField, PriceSeries};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Inputs that shape a dashboard besides the two price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub investment_amount: Decimal,
    /// Column compared between instrument and benchmark.
    pub comparison_field: PriceField,
    pub moving_average_field: PriceField,
    pub moving_average_window: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            investment_amount: dec!(1000),
            comparison_field: PriceField::Close,
            moving_average_field: PriceField::Close,
            moving_average_window: 10,
        }
    }
}

/// A stateless calculator that turns an instrument and its benchmark into a
/// [`DashboardReport`].
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for building a dashboard.
    ///
    /// # Arguments
    ///
    /// * `instrument` - The series the user picked.
    /// * `benchmark` - The market index it is compared against.
    /// * `settings` - Investment amount, compared column and moving-average shape.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `DashboardReport` or the first `AnalyticsError`
    /// raised by any of the underlying calculations.
    pub fn build_dashboard(
        &self,
        instrument: &PriceSeries,
        benchmark: &PriceSeries,
        settings: &DashboardSettings,
    ) -> Result<DashboardReport, AnalyticsError> {
        let instrument_return = total_return(instrument)?;
        let benchmark_return = total_return(benchmark)?;
        let simulation =
            SimulatedInvestment::from_return(settings.investment_amount, instrument_return)?;

        let daily_returns =
            align_and_compare_daily_returns(instrument, benchmark, settings.comparison_field)?;

        let volume = instrument
            .bars()
            .iter()
            .map(|bar| VolumePoint {
                timestamp: bar.timestamp,
                volume: bar.volume,
            })
            .collect();

        let moving_average = self.moving_average_points(instrument, settings)?;

        let benchmark_close = benchmark
            .bars()
            .iter()
            .map(|bar| PricePoint {
                timestamp: bar.timestamp,
                value: bar.adjusted_close,
            })
            .collect();

        Ok(DashboardReport {
            symbol: instrument.symbol().to_string(),
            benchmark_symbol: benchmark.symbol().to_string(),
            instrument_return,
            benchmark_return,
            simulation,
            daily_returns,
            volume,
            moving_average,
            moving_average_window: settings.moving_average_window,
            candles: instrument.bars().to_vec(),
            benchmark_close,
        })
    }

    /// Pairs each raw value with its trailing average.
    fn moving_average_points(
        &self,
        series: &PriceSeries,
        settings: &DashboardSettings,
    ) -> Result<Vec<MovingAveragePoint>, AnalyticsError> {
        let field = settings.moving_average_field;
        let averages = rolling_mean(series, field, settings.moving_average_window)?;

        Ok(series
            .bars()
            .iter()
            .zip(averages)
            .map(|(bar, average)| MovingAveragePoint {
                timestamp: bar.timestamp,
                value: bar.value(field),
                average,
            })
            .collect())
    }
}
