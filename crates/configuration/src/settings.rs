use crate::error::ConfigError;
use analytics::DashboardSettings;
use chrono::NaiveDate;
use core_types::PriceField;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSettings,
    pub dashboard: DashboardConfig,
    pub logging: LoggingSettings,
}

/// Where price files live and which index to compare against.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Directory holding one `<SYMBOL>.csv` file per instrument.
    pub directory: PathBuf,
    /// The benchmark index (e.g., "^GSPC" for the S&P 500).
    pub benchmark_symbol: String,
}

/// Default parameters for a dashboard run. Command-line flags override these.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// The simulated amount invested at the first bar.
    pub investment_amount: Decimal,
    /// The default start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The default end date of the period (inclusive). Today when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub comparison_field: PriceField,
    pub moving_average_field: PriceField,
    pub moving_average_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as "info" or "price_data=debug".
    pub level: String,
    /// When set, log lines are also written to daily-rolling files here.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Rejects values that would only fail later, deep inside a calculation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.benchmark_symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.benchmark_symbol must not be empty".to_string(),
            ));
        }
        if self.dashboard.investment_amount < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "dashboard.investment_amount must not be negative, got {}",
                self.dashboard.investment_amount
            )));
        }
        if self.dashboard.moving_average_window == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard.moving_average_window must be at least 1".to_string(),
            ));
        }
        if let Some(end) = self.dashboard.end_date {
            if end < self.dashboard.start_date {
                return Err(ConfigError::ValidationError(format!(
                    "dashboard.end_date {} is before start_date {}",
                    end, self.dashboard.start_date
                )));
            }
        }
        Ok(())
    }
}

impl DashboardConfig {
    /// The analytics engine's view of this section.
    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            investment_amount: self.investment_amount,
            comparison_field: self.comparison_field,
            moving_average_field: self.moving_average_field,
            moving_average_window: self.moving_average_window,
        }
    }
}
