use crate::error::DataError;
use crate::source::SYMBOL_DIRECTORY_FILE;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DirectoryRow {
    #[serde(alias = "Symbol", alias = "NASDAQ Symbol", alias = "ticker")]
    symbol: String,
    #[serde(alias = "Security Name", alias = "name")]
    security_name: String,
}

/// Human-readable security names keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolDirectory {
    names: HashMap<String, String>,
}

impl SymbolDirectory {
    /// Loads `<root>/symbols.csv`. A missing file yields an empty directory.
    pub fn load(root: &Path) -> Result<Self, DataError> {
        let path = root.join(SYMBOL_DIRECTORY_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No symbol directory file");
            return Ok(Self::default());
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let mut names = HashMap::new();
        for result in rdr.deserialize() {
            let row: DirectoryRow = result?;
            names.insert(row.symbol.to_ascii_uppercase(), row.security_name);
        }

        tracing::debug!(entries = names.len(), "Loaded symbol directory");
        Ok(Self { names })
    }

    pub fn security_name(&self, symbol: &str) -> Option<&str> {
        self.names
            .get(&symbol.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
