//! Local price history for the analytics engine.
//!
//! `PriceSource` is the seam between the calculations and wherever bars come
//! from. `CsvPriceSource` serves a directory of exported daily CSV files.

pub mod csv_reader;
pub mod directory;
pub mod error;
pub mod source;

pub use directory::SymbolDirectory;
pub use error::DataError;
pub use source::{CsvPriceSource, PriceSource, SYMBOL_DIRECTORY_FILE};
