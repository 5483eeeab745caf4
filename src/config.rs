//! Key/value configuration loaded from a two-column CSV file.
//!
//! ```text
//! key,value
//! spreadsheetID,1AbC...xyz
//! ```
//!
//! The first row is a header and is discarded. Rows that don't have exactly
//! two columns are skipped, and a repeated key keeps its last value. The
//! mapping is loaded once at startup and read-only after that.

use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Config key holding the spreadsheet identifier.
pub const SPREADSHEET_ID_KEY: &str = "spreadsheetID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("config file must have at least a header and one row")]
    Format,
    #[error("{0} not found in config")]
    MissingKey(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Like [`Config::get`], but a missing key is an error.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    if records.len() < 2 {
        return Err(ConfigError::Format);
    }

    let values = records[1..]
        .iter()
        .filter(|record| record.len() == 2)
        .map(|record| (record[0].to_owned(), record[1].to_owned()))
        .collect();

    Ok(Config { values })
}
