use crate::enums::PriceField;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time-stamped OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Closing price adjusted for splits and dividends.
    pub adjusted_close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns the value of the selected column.
    pub fn value(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjustedClose => self.adjusted_close,
            PriceField::Volume => self.volume,
        }
    }
}

/// An ordered, immutable sequence of [`Bar`]s for one instrument.
///
/// The constructor enforces the invariants every calculation relies on:
/// timestamps are strictly increasing and every numeric field is finite and
/// non-negative. An empty series is representable; calculations that need data
/// reject it themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "must not be empty".to_string(),
            ));
        }

        for bar in &bars {
            for field in PriceField::ALL {
                let value = bar.value(field);
                if !value.is_finite() || value < 0.0 {
                    return Err(CoreError::InvalidPrice {
                        timestamp: bar.timestamp,
                        field: field.to_string(),
                        value,
                    });
                }
            }
        }

        if let Some(pair) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(CoreError::UnorderedTimestamps {
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The earliest bar, if any.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// The most recent bar, if any.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Iterates over one column in timestamp order.
    pub fn values(&self, field: PriceField) -> impl ExactSizeIterator<Item = f64> + Clone + '_ {
        self.bars.iter().map(move |bar| bar.value(field))
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + Clone + '_ {
        self.bars.iter().map(|bar| bar.timestamp)
    }

    /// Returns a new series holding only the bars inside `[start, end]`.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> PriceSeries {
        let from = self.bars.partition_point(|bar| bar.timestamp < start);
        let to = self.bars.partition_point(|bar| bar.timestamp <= end);
        let bars = if from < to {
            self.bars[from..to].to_vec()
        } else {
            Vec::new()
        };
        PriceSeries {
            symbol: self.symbol.clone(),
            bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            adjusted_close: close,
            volume: 100.0,
        }
    }

    #[test]
    fn accepts_ordered_bars() {
        let series = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().close, 10.0);
        assert_eq!(series.last().unwrap().close, 11.0);
        assert_eq!(series.values(PriceField::Close).collect::<Vec<_>>(), vec![10.0, 11.0]);
    }

    #[test]
    fn accepts_empty_series() {
        let series = PriceSeries::new("AAPL", Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.first().is_none());
    }

    #[test]
    fn rejects_duplicate_and_unordered_timestamps() {
        let duplicate = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(2, 11.0)]);
        assert!(matches!(duplicate, Err(CoreError::UnorderedTimestamps { .. })));

        let reversed = PriceSeries::new("AAPL", vec![bar(3, 10.0), bar(2, 11.0)]);
        assert!(matches!(reversed, Err(CoreError::UnorderedTimestamps { .. })));
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        let mut negative = bar(2, 10.0);
        negative.low = -1.0;
        let err = PriceSeries::new("AAPL", vec![negative]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { ref field, .. } if field == "low"));

        let mut nan = bar(2, 10.0);
        nan.volume = f64::NAN;
        assert!(PriceSeries::new("AAPL", vec![nan]).is_err());
    }

    #[test]
    fn rejects_blank_symbol() {
        assert!(matches!(
            PriceSeries::new("  ", vec![bar(2, 1.0)]),
            Err(CoreError::InvalidInput(..))
        ));
    }

    #[test]
    fn between_is_inclusive() {
        let series =
            PriceSeries::new("AAPL", vec![bar(2, 1.0), bar(3, 2.0), bar(4, 3.0), bar(5, 4.0)])
                .unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        let window = series.between(start, end);
        assert_eq!(window.values(PriceField::Close).collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(window.symbol(), "AAPL");

        assert!(series.between(end, start).is_empty());
    }
}
