//! Asset variants: appreciating home, contribution-driven investment, depreciating vehicle

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Asset, ValuedOverYear};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Home,
    Investment,
    DepreciableAsset,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetKind::Home => "Home",
            AssetKind::Investment => "Investment",
            AssetKind::DepreciableAsset => "DepreciableAsset",
        };
        f.write_str(label)
    }
}

/// Real estate appreciating geometrically
#[derive(Debug, Clone)]
pub struct Home {
    pub name: String,
    pub initial_value: f64,
    pub appreciation_rate: f64,
}

impl Home {
    pub fn new(name: impl Into<String>, initial_value: f64, appreciation_rate: f64) -> Self {
        Self {
            name: name.into(),
            initial_value,
            appreciation_rate,
        }
    }
}

impl ValuedOverYear for Home {
    fn value_at(&self, year: u32) -> f64 {
        (self.initial_value * (1.0 + self.appreciation_rate).powi(year as i32)).max(0.0)
    }
}

impl Asset for Home {
    fn name(&self) -> &str {
        &self.name
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Home
    }
}

/// Invested balance compounding with yearly contributions
///
/// Each year the contribution is added to the prior balance and the sum grows
/// by `return_rate`. The contribution history itself is not stored here; the
/// projection engine owns it for the duration of a run.
#[derive(Debug, Clone)]
pub struct Investment {
    pub name: String,
    pub initial_value: f64,
    pub return_rate: f64,
}

impl Investment {
    pub fn new(name: impl Into<String>, initial_value: f64, return_rate: f64) -> Self {
        Self {
            name: name.into(),
            initial_value,
            return_rate,
        }
    }

    /// The account projected cash flow is reinvested into
    pub fn savings(initial_value: f64, return_rate: f64) -> Self {
        Self::new("Savings", initial_value, return_rate)
    }

    /// One year of growth: `(prior + contribution) * (1 + r)`
    pub fn roll_forward(&self, prior: f64, contribution: f64) -> f64 {
        (prior + contribution) * (1.0 + self.return_rate)
    }

    /// Value at the end of `year` given contributions for years 0..=year
    ///
    /// Years without a recorded contribution contribute nothing.
    pub fn value_with_contributions(&self, year: u32, contributions: &[f64]) -> f64 {
        (0..=year as usize).fold(self.initial_value, |value, i| {
            self.roll_forward(value, contributions.get(i).copied().unwrap_or(0.0))
        })
    }
}

impl ValuedOverYear for Investment {
    fn value_at(&self, year: u32) -> f64 {
        self.value_with_contributions(year, &[])
    }
}

impl Asset for Investment {
    fn name(&self) -> &str {
        &self.name
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Investment
    }
}

/// Asset losing a fixed fraction of its value each year, floored at zero
#[derive(Debug, Clone)]
pub struct DepreciableAsset {
    pub name: String,
    pub initial_value: f64,
    pub depreciation_rate: f64,
}

impl DepreciableAsset {
    pub fn new(name: impl Into<String>, initial_value: f64, depreciation_rate: f64) -> Self {
        Self {
            name: name.into(),
            initial_value,
            depreciation_rate,
        }
    }
}

impl ValuedOverYear for DepreciableAsset {
    fn value_at(&self, year: u32) -> f64 {
        (self.initial_value * (1.0 - self.depreciation_rate).powi(year as i32)).max(0.0)
    }
}

impl Asset for DepreciableAsset {
    fn name(&self) -> &str {
        &self.name
    }
    fn kind(&self) -> AssetKind {
        AssetKind::DepreciableAsset
    }
}
