//! Series builders shared by the unit tests.

use chrono::{Duration, TimeZone, Utc};
use core_types::{Bar, PriceSeries};

/// Builds a series from `(day offset, close, adjusted close)` triples.
pub fn series(symbol: &str, rows: &[(i64, f64, f64)]) -> PriceSeries {
    let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let bars = rows
        .iter()
        .map(|&(day, close, adjusted_close)| Bar {
            timestamp: origin + Duration::days(day),
            open: close,
            high: close,
            low: close,
            close,
            adjusted_close,
            volume: 1000.0,
        })
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

/// Builds a series on the given day offsets with close == adjusted close.
pub fn series_on_days(symbol: &str, rows: &[(i64, f64)]) -> PriceSeries {
    let rows: Vec<_> = rows.iter().map(|&(day, close)| (day, close, close)).collect();
    series(symbol, &rows)
}

/// Builds a series on consecutive days with close == adjusted close.
pub fn series_from_closes(symbol: &str, closes: &[f64]) -> PriceSeries {
    let rows: Vec<_> = closes
        .iter()
        .enumerate()
        .map(|(day, &close)| (day as i64, close, close))
        .collect();
    series(symbol, &rows)
}
