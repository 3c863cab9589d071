//! Yearly projection output structures

use serde::{Deserialize, Serialize};

use crate::tax::FilingStatus;

/// Expense category holding each year's total tax
pub const TAX_CATEGORY: &str = "Taxes";

/// Tax breakdown row keys, in output order
pub const TAX_TYPES: [&str; 4] = ["Federal", "State", "Social Security", "Medicare"];

/// Totals for one projected year, in whole currency units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: u32,
    pub filing_status: FilingStatus,

    // Income and tax
    pub income: i64,
    pub federal_tax: i64,
    pub state_tax: i64,
    pub social_security: i64,
    pub medicare: i64,
    pub total_tax: i64,

    // Spending
    /// Expenses excluding tax
    pub regular_expenses: i64,
    /// Regular expenses plus total tax
    pub total_expenses: i64,
    pub cash_flow: i64,

    // Balance sheet
    /// End-of-year value of the savings account the cash flow is reinvested in
    pub investment_growth: i64,
    pub total_assets: i64,
    pub total_liabilities: i64,
    /// Scheduled payments due on all liabilities this year
    pub loan_payments: i64,
    pub net_worth: i64,
}

impl YearRow {
    pub fn new(year: u32) -> Self {
        Self {
            year,
            filing_status: FilingStatus::default(),
            income: 0,
            federal_tax: 0,
            state_tax: 0,
            social_security: 0,
            medicare: 0,
            total_tax: 0,
            regular_expenses: 0,
            total_expenses: 0,
            cash_flow: 0,
            investment_growth: 0,
            total_assets: 0,
            total_liabilities: 0,
            loan_payments: 0,
            net_worth: 0,
        }
    }
}

/// One breakdown line: a label and its value for every projected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub key: String,
    pub values: Vec<i64>,
}

impl SeriesRow {
    pub fn new(key: impl Into<String>, capacity: usize) -> Self {
        Self {
            key: key.into(),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn at(&self, year: u32) -> Option<i64> {
        self.values.get(year as usize).copied()
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Yearly totals
    pub years: Vec<YearRow>,

    /// One row per income source, in entity order
    pub income_breakdown: Vec<SeriesRow>,

    /// One row per expense category, the tax row last
    pub expense_breakdown: Vec<SeriesRow>,

    /// Federal, state, Social Security and Medicare rows
    pub tax_breakdown: Vec<SeriesRow>,

    /// One row per asset keyed `Kind:name`, savings first
    pub asset_breakdown: Vec<SeriesRow>,

    /// One row per liability keyed `Kind:name`
    pub liability_breakdown: Vec<SeriesRow>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self {
            years: Vec::new(),
            income_breakdown: Vec::new(),
            expense_breakdown: Vec::new(),
            tax_breakdown: Vec::new(),
            asset_breakdown: Vec::new(),
            liability_breakdown: Vec::new(),
        }
    }

    /// Add a year row
    pub fn add_row(&mut self, row: YearRow) {
        self.years.push(row);
    }

    pub fn num_years(&self) -> u32 {
        self.years.len() as u32
    }

    pub fn year(&self, year: u32) -> Option<&YearRow> {
        self.years.get(year as usize)
    }

    pub fn net_worth(&self) -> Vec<i64> {
        self.years.iter().map(|r| r.net_worth).collect()
    }

    pub fn expense_category(&self, key: &str) -> Option<&SeriesRow> {
        self.expense_breakdown.iter().find(|r| r.key == key)
    }

    /// All asset rows with this key (same-named assets keep separate rows)
    pub fn asset_rows<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a SeriesRow> + 'a {
        self.asset_breakdown.iter().filter(move |r| r.key == key)
    }

    pub fn liability_rows<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a SeriesRow> + 'a {
        self.liability_breakdown.iter().filter(move |r| r.key == key)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_income: i64 = self.years.iter().map(|r| r.income).sum();
        let total_tax: i64 = self.years.iter().map(|r| r.total_tax).sum();
        let total_expenses: i64 = self.years.iter().map(|r| r.total_expenses).sum();
        let total_cash_flow: i64 = self.years.iter().map(|r| r.cash_flow).sum();

        let last = self.years.last();
        let final_savings = last.map(|r| r.investment_growth).unwrap_or(0);
        let final_assets = last.map(|r| r.total_assets).unwrap_or(0);
        let final_liabilities = last.map(|r| r.total_liabilities).unwrap_or(0);
        let final_net_worth = last.map(|r| r.net_worth).unwrap_or(0);
        let peak_net_worth = self.years.iter().map(|r| r.net_worth).max().unwrap_or(0);

        let effective_tax_rate = if total_income > 0 {
            total_tax as f64 / total_income as f64
        } else {
            0.0
        };

        ProjectionSummary {
            num_years: self.num_years(),
            total_income,
            total_tax,
            total_expenses,
            total_cash_flow,
            final_savings,
            final_assets,
            final_liabilities,
            final_net_worth,
            peak_net_worth,
            effective_tax_rate,
        }
    }
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub num_years: u32,
    pub total_income: i64,
    pub total_tax: i64,
    pub total_expenses: i64,
    pub total_cash_flow: i64,
    pub final_savings: i64,
    pub final_assets: i64,
    pub final_liabilities: i64,
    pub final_net_worth: i64,
    pub peak_net_worth: i64,
    /// Lifetime tax over lifetime income
    pub effective_tax_rate: f64,
}
