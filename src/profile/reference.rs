//! Cost-of-living and occupation reference tables

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};

/// Monthly cost of living by category for one location
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationCosts {
    pub housing: f64,
    pub transportation: f64,
    pub food: f64,
    pub healthcare: f64,
    pub insurance: f64,
    pub apparel: f64,
    pub services: f64,
    pub entertainment: f64,
    pub other: f64,
}

impl LocationCosts {
    pub fn total(&self) -> f64 {
        self.housing
            + self.transportation
            + self.food
            + self.healthcare
            + self.insurance
            + self.apparel
            + self.services
            + self.entertainment
            + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    /// "City, ST"
    pub name: String,
    pub costs: LocationCosts,
    /// Multiplier applied to occupation income in this location
    pub income_adjustment: f64,
    /// Average price of a starter home
    pub home_price: f64,
}

/// Lookup tables the profile builder resolves a profile against
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub locations: HashMap<String, LocationData>,
    /// Monthly income by occupation title
    pub occupations: HashMap<String, f64>,
}

// name, [housing, transportation, food, healthcare, insurance, apparel,
// services, entertainment, other], income adjustment, starter home price
const BUILTIN_LOCATIONS: &[(&str, [f64; 9], f64, f64)] = &[
    ("Austin, TX", [1650.0, 420.0, 520.0, 410.0, 180.0, 110.0, 240.0, 210.0, 160.0], 1.05, 425_000.0),
    ("Boston, MA", [2600.0, 380.0, 600.0, 470.0, 210.0, 130.0, 300.0, 250.0, 190.0], 1.25, 650_000.0),
    ("Chicago, IL", [1800.0, 360.0, 540.0, 430.0, 190.0, 115.0, 260.0, 220.0, 170.0], 1.10, 330_000.0),
    ("Denver, CO", [1850.0, 410.0, 550.0, 440.0, 190.0, 120.0, 260.0, 230.0, 170.0], 1.10, 550_000.0),
    ("Miami, FL", [2300.0, 430.0, 560.0, 450.0, 260.0, 125.0, 270.0, 240.0, 175.0], 1.00, 480_000.0),
    ("New York, NY", [3400.0, 330.0, 690.0, 500.0, 230.0, 150.0, 340.0, 300.0, 220.0], 1.35, 780_000.0),
    ("Phoenix, AZ", [1500.0, 430.0, 500.0, 400.0, 170.0, 105.0, 230.0, 200.0, 155.0], 0.98, 410_000.0),
    ("San Francisco, CA", [3300.0, 400.0, 700.0, 520.0, 220.0, 150.0, 350.0, 310.0, 230.0], 1.45, 1_100_000.0),
    ("Seattle, WA", [2400.0, 400.0, 620.0, 480.0, 200.0, 135.0, 310.0, 270.0, 200.0], 1.30, 750_000.0),
    ("St. Louis, MO", [1100.0, 380.0, 470.0, 390.0, 160.0, 100.0, 210.0, 180.0, 140.0], 0.92, 220_000.0),
];

const BUILTIN_OCCUPATIONS: &[(&str, f64)] = &[
    ("Accountant", 6_800.0),
    ("Electrician", 5_600.0),
    ("Graphic Designer", 4_700.0),
    ("Mechanical Engineer", 8_200.0),
    ("Physician", 19_500.0),
    ("Registered Nurse", 7_100.0),
    ("Software Developer", 11_000.0),
    ("Teacher", 5_200.0),
];

impl ReferenceTables {
    /// Small built-in set of US metro areas and occupations
    pub fn builtin() -> Self {
        let locations = BUILTIN_LOCATIONS
            .iter()
            .map(|(name, c, income_adjustment, home_price)| {
                let data = LocationData {
                    name: name.to_string(),
                    costs: LocationCosts {
                        housing: c[0],
                        transportation: c[1],
                        food: c[2],
                        healthcare: c[3],
                        insurance: c[4],
                        apparel: c[5],
                        services: c[6],
                        entertainment: c[7],
                        other: c[8],
                    },
                    income_adjustment: *income_adjustment,
                    home_price: *home_price,
                };
                (name.to_string(), data)
            })
            .collect();

        let occupations = BUILTIN_OCCUPATIONS
            .iter()
            .map(|(title, monthly)| (title.to_string(), *monthly))
            .collect();

        Self { locations, occupations }
    }

    /// Location by name; exact match first, then case-insensitive
    pub fn location(&self, name: &str) -> Result<&LocationData> {
        let name = name.trim();
        self.locations
            .get(name)
            .or_else(|| {
                self.locations
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, data)| data)
            })
            .ok_or_else(|| ProjectionError::ProfileNotFound {
                field: "location",
                key: name.to_string(),
            })
    }

    /// Monthly income for an occupation; exact match first, then case-insensitive
    pub fn occupation_income(&self, title: &str) -> Result<f64> {
        let title = title.trim();
        self.occupations
            .get(title)
            .or_else(|| {
                self.occupations
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(title))
                    .map(|(_, monthly)| monthly)
            })
            .copied()
            .ok_or_else(|| ProjectionError::ProfileNotFound {
                field: "occupation",
                key: title.to_string(),
            })
    }
}
