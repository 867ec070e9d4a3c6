//! Parser for Yahoo-style daily OHLCV exports.
//!
//! Expected header (case and spacing are not significant):
//! `Date,Open,High,Low,Close,Adj Close,Volume`. Extra columns are ignored.

use crate::error::DataError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use core_types::{Bar, PriceField};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;

/// Values some exporters write for days without trading.
const NULL_MARKERS: [&str; 3] = ["", "null", "nan"];

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    fields: HashMap<PriceField, usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, source: &str) -> Result<Self, DataError> {
        let mut date = None;
        let mut fields = HashMap::new();

        for (idx, header) in headers.iter().enumerate() {
            let name = header.trim().to_ascii_lowercase();
            if name == "date" || name == "timestamp" {
                date.get_or_insert(idx);
            } else if let Ok(field) = name.parse::<PriceField>() {
                fields.entry(field).or_insert(idx);
            }
        }

        // Some exporters only ship unadjusted prices.
        if !fields.contains_key(&PriceField::AdjustedClose) {
            if let Some(&close) = fields.get(&PriceField::Close) {
                tracing::debug!(source, "No adjusted close column, using close");
                fields.insert(PriceField::AdjustedClose, close);
            }
        }

        let date = date.ok_or_else(|| DataError::MissingColumn {
            path: source.to_string(),
            column: "date".to_string(),
        })?;
        for field in PriceField::ALL {
            if !fields.contains_key(&field) {
                return Err(DataError::MissingColumn {
                    path: source.to_string(),
                    column: field.to_string(),
                });
            }
        }

        Ok(Self { date, fields })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Reads every row into a bar, sorted by date.
///
/// Rows whose price cells hold a null marker are skipped. A date that occurs
/// twice is an error rather than a silent overwrite.
pub fn read_bars<R: Read>(reader: R, source: &str) -> Result<Vec<(NaiveDate, Bar)>, DataError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::resolve(rdr.headers()?, source)?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let raw_date = cell(columns.date);
        let date = parse_date(raw_date).ok_or_else(|| DataError::InvalidValue {
            path: source.to_string(),
            line,
            column: "date".to_string(),
            value: raw_date.to_string(),
        })?;

        if PriceField::ALL.iter().any(|field| {
            let raw = cell(columns.fields[field]).to_ascii_lowercase();
            NULL_MARKERS.contains(&raw.as_str())
        }) {
            skipped += 1;
            continue;
        }

        let value = |field: PriceField| -> Result<f64, DataError> {
            let raw = cell(columns.fields[&field]);
            raw.parse::<f64>().map_err(|_| DataError::InvalidValue {
                path: source.to_string(),
                line,
                column: field.to_string(),
                value: raw.to_string(),
            })
        };

        let bar = Bar {
            timestamp: date.and_time(NaiveTime::MIN).and_utc(),
            open: value(PriceField::Open)?,
            high: value(PriceField::High)?,
            low: value(PriceField::Low)?,
            close: value(PriceField::Close)?,
            adjusted_close: value(PriceField::AdjustedClose)?,
            volume: value(PriceField::Volume)?,
        };
        rows.push((date, bar));
    }

    if skipped > 0 {
        tracing::warn!(source, skipped, "Skipped rows with missing prices");
    }

    rows.sort_by_key(|(date, _)| *date);
    if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(DataError::DuplicateDate {
            path: source.to_string(),
            date: pair[0].0,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAHOO: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-03,11,12,10,11.5,11.4,2000
2024-01-02,10,11,9,10.5,10.4,1000
";

    #[test]
    fn reads_and_sorts_yahoo_export() {
        let rows = read_bars(YAHOO.as_bytes(), "test").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(rows[0].1.adjusted_close, 10.4);
        assert_eq!(rows[1].1.volume, 2000.0);
    }

    #[test]
    fn accepts_lowercase_snake_case_headers() {
        let csv = "date,open,high,low,close,adjusted_close,volume\n2024-01-02,1,1,1,1,1,5\n";
        let rows = read_bars(csv.as_bytes(), "test").unwrap();
        assert_eq!(rows[0].1.volume, 5.0);
    }

    #[test]
    fn falls_back_to_close_without_adjusted_column() {
        let csv = "Date,Open,High,Low,Close,Volume\n2024-01-02,1,2,1,1.5,5\n";
        let rows = read_bars(csv.as_bytes(), "test").unwrap();
        assert_eq!(rows[0].1.adjusted_close, 1.5);
    }

    #[test]
    fn skips_null_rows() {
        let csv = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,1,1,1,1,1,5
2024-01-03,null,null,null,null,null,null
2024-01-04,2,2,2,2,2,6
";
        let rows = read_bars(csv.as_bytes(), "test").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn reports_missing_column() {
        let csv = "Date,Open,High,Low,Close\n2024-01-02,1,1,1,1\n";
        let err = read_bars(csv.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "volume"));
    }

    #[test]
    fn reports_unparseable_value_with_line() {
        let csv = "Date,Open,High,Low,Close,Adj Close,Volume\n2024-01-02,1,1,1,abc,1,5\n";
        let err = read_bars(csv.as_bytes(), "test").unwrap_err();
        match err {
            DataError::InvalidValue { line, column, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "close");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_dates() {
        let csv = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,1,1,1,1,1,5
2024-01-02,2,2,2,2,2,6
";
        assert!(matches!(
            read_bars(csv.as_bytes(), "test"),
            Err(DataError::DuplicateDate { .. })
        ));
    }

    #[test]
    fn parses_datetime_dates() {
        assert_eq!(
            parse_date("2024-01-02 00:00:00"),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert_eq!(
            parse_date("2024-01-02T00:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert_eq!(parse_date("02/01/2024"), None);
    }
}
