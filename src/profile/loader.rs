//! CSV-based reference table loader
//!
//! Loads location cost-of-living and occupation income tables from CSV files
//! in data/reference/

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use super::reference::{LocationCosts, LocationData, ReferenceTables};
use crate::error::{ProjectionError, Result};
use crate::tax::loader::parse_amount;

/// Default path to reference tables directory
pub const DEFAULT_REFERENCE_PATH: &str = "data/reference";

const LOCATION_COLUMNS: usize = 12;

/// Load location data from CSV
/// Columns: location, nine monthly cost categories, income_adjustment, home_price
pub fn load_locations(path: &Path) -> Result<HashMap<String, LocationData>> {
    let file = File::open(path.join("locations.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut locations = HashMap::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < LOCATION_COLUMNS {
            return Err(ProjectionError::ReferenceData(format!(
                "locations.csv: expected {} columns, found {} in {:?}",
                LOCATION_COLUMNS,
                record.len(),
                record
            )));
        }

        let name = record[0].trim().to_string();
        let data = LocationData {
            name: name.clone(),
            costs: LocationCosts {
                housing: parse_amount(&record[1])?,
                transportation: parse_amount(&record[2])?,
                food: parse_amount(&record[3])?,
                healthcare: parse_amount(&record[4])?,
                insurance: parse_amount(&record[5])?,
                apparel: parse_amount(&record[6])?,
                services: parse_amount(&record[7])?,
                entertainment: parse_amount(&record[8])?,
                other: parse_amount(&record[9])?,
            },
            income_adjustment: parse_amount(&record[10])?,
            home_price: parse_amount(&record[11])?,
        };
        locations.insert(name, data);
    }

    Ok(locations)
}

/// Load monthly occupation income from CSV
/// Columns: occupation, monthly_income
pub fn load_occupations(path: &Path) -> Result<HashMap<String, f64>> {
    let file = File::open(path.join("occupations.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut occupations = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let title = record[0].trim().to_string();
        let monthly = parse_amount(&record[1])?;
        occupations.insert(title, monthly);
    }

    Ok(occupations)
}

impl ReferenceTables {
    /// Load reference tables from the default location (data/reference/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(DEFAULT_REFERENCE_PATH))
    }

    /// Load reference tables from a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let tables = Self {
            locations: load_locations(path)?,
            occupations: load_occupations(path)?,
        };
        log::info!(
            "Loaded reference tables from {}: {} locations, {} occupations",
            path.display(),
            tables.locations.len(),
            tables.occupations.len()
        );
        Ok(tables)
    }
}
