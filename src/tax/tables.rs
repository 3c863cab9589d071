//! Federal bracket schedules and state rates

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Filing status used to pick a bracket schedule and Medicare threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilingStatus {
    #[default]
    Single,
    /// Married filing jointly
    Joint,
}

impl FilingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::Joint => "Joint",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatus {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(FilingStatus::Single),
            "joint" | "married" | "married_joint" => Ok(FilingStatus::Joint),
            other => Err(ProjectionError::InvalidInput(format!("Unknown filing status: {}", other))),
        }
    }
}

/// One marginal bracket: income up to `threshold` is taxed at `rate`
/// (the slice above the previous bracket's threshold)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the bracket; `f64::INFINITY` for the top bracket
    pub threshold: f64,
    pub rate: f64,
}

impl TaxBracket {
    pub const fn new(threshold: f64, rate: f64) -> Self {
        Self { threshold, rate }
    }
}

/// 2024 federal brackets, single filers
pub const FEDERAL_SINGLE_2024: [TaxBracket; 7] = [
    TaxBracket::new(11_600.0, 0.10),
    TaxBracket::new(47_150.0, 0.12),
    TaxBracket::new(100_525.0, 0.22),
    TaxBracket::new(191_950.0, 0.24),
    TaxBracket::new(243_725.0, 0.32),
    TaxBracket::new(609_350.0, 0.35),
    TaxBracket::new(f64::INFINITY, 0.37),
];

/// 2024 federal brackets, married filing jointly
pub const FEDERAL_JOINT_2024: [TaxBracket; 7] = [
    TaxBracket::new(23_200.0, 0.10),
    TaxBracket::new(94_300.0, 0.12),
    TaxBracket::new(201_050.0, 0.22),
    TaxBracket::new(383_900.0, 0.24),
    TaxBracket::new(487_450.0, 0.32),
    TaxBracket::new(731_200.0, 0.35),
    TaxBracket::new(f64::INFINITY, 0.37),
];

/// Top marginal state income tax rates (2024)
const STATE_RATES_2024: [(&str, f64); 50] = [
    ("AL", 0.05), ("AK", 0.00), ("AZ", 0.0459), ("AR", 0.055), ("CA", 0.133),
    ("CO", 0.0444), ("CT", 0.0699), ("DE", 0.066), ("FL", 0.00), ("GA", 0.0575),
    ("HI", 0.11), ("ID", 0.058), ("IL", 0.0495), ("IN", 0.0323), ("IA", 0.06),
    ("KS", 0.057), ("KY", 0.045), ("LA", 0.0425), ("ME", 0.0715), ("MD", 0.0575),
    ("MA", 0.05), ("MI", 0.0425), ("MN", 0.0985), ("MS", 0.05), ("MO", 0.0495),
    ("MT", 0.0675), ("NE", 0.0664), ("NV", 0.00), ("NH", 0.05), ("NJ", 0.1075),
    ("NM", 0.059), ("NY", 0.109), ("NC", 0.0499), ("ND", 0.029), ("OH", 0.0399),
    ("OK", 0.0475), ("OR", 0.099), ("PA", 0.0307), ("RI", 0.0599), ("SC", 0.07),
    ("SD", 0.00), ("TN", 0.00), ("TX", 0.00), ("UT", 0.0485), ("VT", 0.0875),
    ("VA", 0.0575), ("WA", 0.00), ("WV", 0.065), ("WI", 0.0765), ("WY", 0.00),
];

/// Raw tax tables, before validation by [`super::TaxCalculator::new`]
#[derive(Debug, Clone, Default)]
pub struct TaxTables {
    pub federal: HashMap<FilingStatus, Vec<TaxBracket>>,
    /// Flat rate by 2-letter state code
    pub state_rates: HashMap<String, f64>,
}

impl TaxTables {
    /// Built-in 2024 federal brackets and state rates
    pub fn default_2024() -> Self {
        let mut federal = HashMap::new();
        federal.insert(FilingStatus::Single, FEDERAL_SINGLE_2024.to_vec());
        federal.insert(FilingStatus::Joint, FEDERAL_JOINT_2024.to_vec());

        let state_rates = STATE_RATES_2024
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect();

        Self { federal, state_rates }
    }

    pub fn state_rate(&self, state_code: &str) -> Option<f64> {
        self.state_rates.get(state_code).copied()
    }
}
