use crate::csv_reader::read_bars;
use crate::error::DataError;
use chrono::{NaiveDate, NaiveTime};
use core_types::PriceSeries;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// File in the data directory that maps symbols to security names.
pub const SYMBOL_DIRECTORY_FILE: &str = "symbols.csv";

/// A provider of daily price history.
///
/// Implementations return a validated series covering `start..=end`; callers
/// never see unordered or negative data.
pub trait PriceSource {
    fn load(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError>;

    /// All symbols this source can load, sorted.
    fn symbols(&self) -> Result<Vec<String>, DataError>;
}

/// Reads `<root>/<SYMBOL>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    root: PathBuf,
}

impl CsvPriceSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, symbol: &str) -> Result<PathBuf, DataError> {
        if symbol.is_empty() || symbol.contains(['/', '\\']) || symbol.contains("..") {
            return Err(DataError::UnknownSymbol(symbol.to_string()));
        }
        Ok(self.root.join(format!("{symbol}.csv")))
    }
}

impl PriceSource for CsvPriceSource {
    /// Symbols are case-insensitive and stored upper-case on disk.
    fn load(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        if start > end {
            return Err(DataError::InvalidRange { start, end });
        }

        let symbol = symbol.trim().to_ascii_uppercase();
        let path = self.path_for(&symbol)?;
        if !path.is_file() {
            return Err(DataError::UnknownSymbol(symbol));
        }

        let source = path.display().to_string();
        tracing::debug!(path = %source, "Reading price file");
        let reader = BufReader::new(File::open(&path)?);
        let rows = read_bars(reader, &source)?;

        // The whole file is validated, not only the requested window.
        let history = PriceSeries::new(
            symbol.as_str(),
            rows.into_iter().map(|(_, bar)| bar).collect(),
        )?;
        let series = history.between(
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(NaiveTime::MIN).and_utc(),
        );

        tracing::info!(
            %symbol,
            %start,
            %end,
            kept = series.len(),
            total = history.len(),
            "Loaded price history"
        );

        Ok(series)
    }

    fn symbols(&self) -> Result<Vec<String>, DataError> {
        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let is_directory_file = path
                .file_name()
                .is_some_and(|name| name == SYMBOL_DIRECTORY_FILE);
            if is_csv && !is_directory_file {
                symbols.push(stem.to_ascii_uppercase());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
