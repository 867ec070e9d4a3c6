//! Period returns and step-by-step percentage change.

use crate::error::AnalyticsError;
use core_types::{PriceField, PriceSeries};

/// Realized return between the first and last bar, based on adjusted close.
///
/// `total_return = last.adjusted_close / first.adjusted_close - 1`
pub fn total_return(series: &PriceSeries) -> Result<f64, AnalyticsError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AnalyticsError::EmptySeries(series.symbol().to_string())),
    };

    if first.adjusted_close == 0.0 {
        return Err(AnalyticsError::DivisionByZero(format!(
            "total_return({})",
            series.symbol()
        )));
    }

    Ok(last.adjusted_close / first.adjusted_close - 1.0)
}

/// Lazy percentage-change adapter.
///
/// Yields exactly one item per input value. The first item is always `None`
/// because there is no prior observation; later items are
/// `(v[i] - v[i-1]) / v[i-1]`, or `None` when the previous value is zero.
/// Cloning the adapter before consuming it gives an independent pass over the
/// same input.
#[derive(Debug, Clone)]
pub struct PercentChange<I> {
    values: I,
    previous: Option<f64>,
}

impl<I> PercentChange<I>
where
    I: Iterator<Item = f64>,
{
    pub fn new(values: I) -> Self {
        Self {
            values,
            previous: None,
        }
    }
}

impl<I> Iterator for PercentChange<I>
where
    I: Iterator<Item = f64>,
{
    type Item = Option<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.values.next()?;
        let change = self
            .previous
            .filter(|prev| *prev != 0.0)
            .map(|prev| (current - prev) / prev);
        self.previous = Some(current);
        Some(change)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<I> ExactSizeIterator for PercentChange<I> where I: ExactSizeIterator<Item = f64> {}

/// Percentage change over a plain slice of values.
pub fn percent_change(values: &[f64]) -> PercentChange<std::iter::Copied<std::slice::Iter<'_, f64>>> {
    PercentChange::new(values.iter().copied())
}

/// Percentage change of one column of a series, aligned one-to-one with its bars.
pub fn percent_change_series(
    series: &PriceSeries,
    field: PriceField,
) -> PercentChange<impl ExactSizeIterator<Item = f64> + Clone + '_> {
    PercentChange::new(series.values(field))
}
