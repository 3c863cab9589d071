//! CSV-based tax table loader
//!
//! Loads federal brackets and state rates from CSV files in data/tax/

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use super::tables::{FilingStatus, TaxBracket, TaxTables};
use crate::error::{ProjectionError, Result};

/// Default path to tax tables directory
pub const DEFAULT_TAX_PATH: &str = "data/tax";

/// Load federal brackets from CSV
/// Columns: filing_status, threshold, rate ("inf" threshold for the top bracket)
pub fn load_federal_brackets(path: &Path) -> Result<HashMap<FilingStatus, Vec<TaxBracket>>> {
    let file = File::open(path.join("federal_brackets.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut brackets: HashMap<FilingStatus, Vec<TaxBracket>> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let status: FilingStatus = record[0].parse()?;
        let threshold = parse_amount(&record[1])?;
        let rate = parse_amount(&record[2])?;
        brackets.entry(status).or_default().push(TaxBracket::new(threshold, rate));
    }

    Ok(brackets)
}

/// Load flat state rates from CSV
/// Columns: state, rate
pub fn load_state_rates(path: &Path) -> Result<HashMap<String, f64>> {
    let file = File::open(path.join("state_rates.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rates = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let state = record[0].trim().to_ascii_uppercase();
        let rate = parse_amount(&record[1])?;
        rates.insert(state, rate);
    }

    Ok(rates)
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ProjectionError::ReferenceData(format!("bad number '{}': {}", raw, e)))
}

impl TaxTables {
    /// Load tax tables from the default location (data/tax/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(DEFAULT_TAX_PATH))
    }

    /// Load tax tables from a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let tables = Self {
            federal: load_federal_brackets(path)?,
            state_rates: load_state_rates(path)?,
        };
        log::info!(
            "Loaded tax tables from {}: {} filing statuses, {} states",
            path.display(),
            tables.federal.len(),
            tables.state_rates.len()
        );
        Ok(tables)
    }
}
