use crate::error::AnalyticsError;
use core_types::{PriceField, PriceSeries};

/// Trailing simple moving average of `field`.
///
/// Position `i` is `None` until `window` observations are available, then the
/// mean of the last `window` values. A window longer than the series is valid
/// and produces only missing markers.
pub fn rolling_mean(
    series: &PriceSeries,
    field: PriceField,
    window: usize,
) -> Result<Vec<Option<f64>>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow(window));
    }

    let values: Vec<f64> = series.values(field).collect();
    let warmup = (window - 1).min(values.len());

    let mut averages = vec![None; warmup];
    averages.extend(
        values
            .windows(window)
            .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
    );

    Ok(averages)
}
