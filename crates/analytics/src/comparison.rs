//! Puts two instruments on a common 0-1 scale and lines up their daily moves.

use crate::error::AnalyticsError;
use crate::returns::PercentChange;
use chrono::{DateTime, Utc};
use core_types::{PriceField, PriceSeries};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One timestamp present in both series, with each side's normalized daily return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturnRow {
    pub timestamp: DateTime<Utc>,
    pub instrument: Option<f64>,
    pub benchmark: Option<f64>,
}

/// Divides every value of `field` by that field's maximum across the series.
///
/// Price fields are non-negative, so the output lies in `[0, 1]`. The maximum
/// of the output is exactly 1, so normalizing the result again changes nothing;
/// that holds only because the first pass already scaled to a unit maximum and
/// should not be read as a general property of rescaling.
pub fn normalize(series: &PriceSeries, field: PriceField) -> Result<Vec<f64>, AnalyticsError> {
    let max = series
        .values(field)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .ok_or_else(|| AnalyticsError::EmptySeries(series.symbol().to_string()))?;

    if max == 0.0 {
        return Err(AnalyticsError::ZeroMaximum {
            symbol: series.symbol().to_string(),
            field: field.to_string(),
        });
    }

    Ok(series.values(field).map(|v| v / max).collect())
}

/// Normalizes both series, takes each one's percentage change, then inner-joins
/// the two on timestamp.
///
/// Normalization happens before differencing and each side is differenced
/// against its own previous bar, so a row's value does not depend on which
/// timestamps the other series has. Rows keep their missing markers instead of
/// being dropped.
pub fn align_and_compare_daily_returns(
    instrument: &PriceSeries,
    benchmark: &PriceSeries,
    field: PriceField,
) -> Result<Vec<DailyReturnRow>, AnalyticsError> {
    for series in [instrument, benchmark] {
        if series.is_empty() {
            return Err(AnalyticsError::EmptySeries(series.symbol().to_string()));
        }
    }

    let instrument_changes: Vec<Option<f64>> =
        PercentChange::new(normalize(instrument, field)?.into_iter()).collect();
    let benchmark_changes: Vec<Option<f64>> =
        PercentChange::new(normalize(benchmark, field)?.into_iter()).collect();

    let left = instrument.bars();
    let right = benchmark.bars();
    let mut rows = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);

    // Both sides are strictly increasing, so a merge walk yields the
    // intersection already in ascending order.
    while i < left.len() && j < right.len() {
        match left[i].timestamp.cmp(&right[j].timestamp) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                rows.push(DailyReturnRow {
                    timestamp: left[i].timestamp,
                    instrument: instrument_changes[i],
                    benchmark: benchmark_changes[j],
                });
                i += 1;
                j += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(AnalyticsError::NoOverlap(
            instrument.symbol().to_string(),
            benchmark.symbol().to_string(),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{series_from_closes, series_on_days};

    #[test]
    fn normalize_scales_to_unit_maximum() {
        let s = series_from_closes("A", &[5.0, 10.0, 2.5]);
        assert_eq!(normalize(&s, PriceField::Close).unwrap(), vec![0.5, 1.0, 0.25]);
    }

    #[test]
    fn normalize_output_is_within_unit_interval() {
        let s = series_from_closes("A", &[3.0, 17.0, 0.0, 9.5, 12.25]);
        let normalized = normalize(&s, PriceField::Close).unwrap();
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(normalized.iter().any(|v| *v == 1.0));
    }

    #[test]
    fn normalize_twice_is_stable_only_because_max_is_one() {
        let once = normalize(&series_from_closes("A", &[2.0, 4.0, 8.0]), PriceField::Close).unwrap();
        let twice = normalize(&series_from_closes("A", &once), PriceField::Close).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_rejects_empty_series() {
        let s = series_from_closes("A", &[]);
        assert_eq!(
            normalize(&s, PriceField::Close),
            Err(AnalyticsError::EmptySeries("A".to_string()))
        );
    }

    #[test]
    fn normalize_rejects_all_zero_series() {
        let s = series_from_closes("A", &[0.0, 0.0, 0.0]);
        assert!(matches!(
            normalize(&s, PriceField::Close),
            Err(AnalyticsError::ZeroMaximum { .. })
        ));
    }

    #[test]
    fn compare_joins_on_common_timestamps() {
        let a = series_on_days("A", &[(1, 10.0), (2, 20.0), (3, 10.0), (5, 40.0)]);
        let b = series_on_days("B", &[(2, 5.0), (3, 10.0), (4, 10.0), (5, 20.0)]);
        let rows = align_and_compare_daily_returns(&a, &b, PriceField::Close).unwrap();

        let days: Vec<_> = rows.iter().map(|r| r.timestamp).collect();
        assert_eq!(days, vec![a.bars()[1].timestamp, a.bars()[2].timestamp, a.bars()[3].timestamp]);

        // Day 2: A moved 10 -> 20 within A; B has no prior bar.
        assert!((rows[0].instrument.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(rows[0].benchmark, None);
        // Day 3: A halves, B doubles.
        assert!((rows[1].instrument.unwrap() + 0.5).abs() < 1e-12);
        assert!((rows[1].benchmark.unwrap() - 1.0).abs() < 1e-12);
        // Day 5: A compared with day 3, B with day 4.
        assert!((rows[2].instrument.unwrap() - 3.0).abs() < 1e-12);
        assert!((rows[2].benchmark.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn compare_output_is_bounded_and_shared() {
        let a = series_on_days("A", &[(1, 1.0), (3, 2.0), (4, 3.0), (6, 4.0), (7, 5.0)]);
        let b = series_on_days("B", &[(2, 1.0), (3, 1.5), (6, 2.0)]);
        let rows = align_and_compare_daily_returns(&a, &b, PriceField::Close).unwrap();
        assert!(rows.len() <= a.len().min(b.len()));
        for row in &rows {
            assert!(a.timestamps().any(|t| t == row.timestamp));
            assert!(b.timestamps().any(|t| t == row.timestamp));
        }
        assert!(rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn compare_keeps_first_row_with_missing_markers() {
        let a = series_on_days("A", &[(1, 10.0), (2, 11.0)]);
        let b = series_on_days("B", &[(1, 20.0), (2, 22.0)]);
        let rows = align_and_compare_daily_returns(&a, &b, PriceField::Close).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].instrument, None);
        assert_eq!(rows[0].benchmark, None);
    }

    #[test]
    fn compare_rejects_disjoint_series() {
        let a = series_on_days("A", &[(1, 10.0), (2, 11.0)]);
        let b = series_on_days("B", &[(3, 20.0), (4, 22.0)]);
        assert_eq!(
            align_and_compare_daily_returns(&a, &b, PriceField::Close),
            Err(AnalyticsError::NoOverlap("A".to_string(), "B".to_string()))
        );
    }

    #[test]
    fn compare_rejects_empty_input() {
        let a = series_on_days("A", &[(1, 10.0)]);
        let b = series_on_days("B", &[]);
        assert_eq!(
            align_and_compare_daily_returns(&a, &b, PriceField::Close),
            Err(AnalyticsError::EmptySeries("B".to_string()))
        );
    }
}
