//! Federal, state and payroll tax computation

use serde::{Deserialize, Serialize};

use super::tables::{FilingStatus, TaxBracket, TaxTables};
use crate::error::{ProjectionError, Result};

pub const SOCIAL_SECURITY_RATE: f64 = 0.062;
/// 2024 Social Security wage base
pub const SOCIAL_SECURITY_WAGE_BASE: f64 = 168_600.0;
pub const MEDICARE_RATE: f64 = 0.0145;
pub const ADDITIONAL_MEDICARE_RATE: f64 = 0.009;
pub const ADDITIONAL_MEDICARE_THRESHOLD_SINGLE: f64 = 200_000.0;
pub const ADDITIONAL_MEDICARE_THRESHOLD_JOINT: f64 = 250_000.0;

/// Tax owed on one year's income, split by tax type
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub federal: f64,
    pub state: f64,
    pub social_security: f64,
    pub medicare: f64,
    pub total: f64,
    pub effective_rate: f64,
}

/// Extract the 2-letter state code from a "City, ST" location string
pub fn city_to_state(location: &str) -> Option<String> {
    let (_, state) = location.rsplit_once(',')?;
    let state = state.trim().to_ascii_uppercase();
    if state.len() == 2 && state.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(state)
    } else {
        None
    }
}

/// Stateless tax calculator over validated tables
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    single: Vec<TaxBracket>,
    joint: Vec<TaxBracket>,
    tables: TaxTables,
}

impl TaxCalculator {
    /// Validate tables and build a calculator
    ///
    /// Every filing status needs a non-empty schedule whose last bracket is
    /// unbounded; anything else is a configuration error.
    pub fn new(tables: TaxTables) -> Result<Self> {
        let single = Self::validated_schedule(&tables, FilingStatus::Single)?;
        let joint = Self::validated_schedule(&tables, FilingStatus::Joint)?;
        Ok(Self { single, joint, tables })
    }

    /// Calculator over the built-in 2024 tables
    pub fn default_2024() -> Self {
        let tables = TaxTables::default_2024();
        Self {
            single: tables.federal[&FilingStatus::Single].clone(),
            joint: tables.federal[&FilingStatus::Joint].clone(),
            tables,
        }
    }

    fn validated_schedule(tables: &TaxTables, status: FilingStatus) -> Result<Vec<TaxBracket>> {
        let schedule = tables
            .federal
            .get(&status)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProjectionError::MissingTaxTable(status.to_string()))?;

        let mut schedule = schedule.clone();
        schedule.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));

        if !schedule.last().map(|b| b.threshold.is_infinite()).unwrap_or(false) {
            return Err(ProjectionError::ReferenceData(format!(
                "top {} bracket must be unbounded",
                status
            )));
        }
        Ok(schedule)
    }

    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    fn brackets(&self, status: FilingStatus) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::Joint => &self.joint,
        }
    }

    /// Progressive federal income tax
    pub fn federal_tax(&self, income: f64, status: FilingStatus) -> f64 {
        let mut tax = 0.0;
        let mut remaining = income;
        let mut lower = 0.0;

        for bracket in self.brackets(status) {
            if remaining <= 0.0 {
                break;
            }
            let width = bracket.threshold - lower;
            let taxable = remaining.min(width);
            tax += taxable * bracket.rate;
            remaining -= taxable;
            lower = bracket.threshold;
        }

        tax
    }

    /// Flat state tax; unknown or untaxed states owe nothing
    pub fn state_tax(&self, income: f64, location: &str) -> f64 {
        match city_to_state(location).and_then(|code| self.tables.state_rate(&code)) {
            Some(rate) => income * rate,
            None => {
                log::debug!("No state income tax rate for '{}', taxing at 0", location);
                0.0
            }
        }
    }

    /// Social Security and Medicare portions of FICA
    pub fn fica(&self, income: f64, status: FilingStatus) -> (f64, f64) {
        let social_security = income.min(SOCIAL_SECURITY_WAGE_BASE) * SOCIAL_SECURITY_RATE;

        let threshold = match status {
            FilingStatus::Single => ADDITIONAL_MEDICARE_THRESHOLD_SINGLE,
            FilingStatus::Joint => ADDITIONAL_MEDICARE_THRESHOLD_JOINT,
        };
        let medicare = income * MEDICARE_RATE
            + (income - threshold).max(0.0) * ADDITIONAL_MEDICARE_RATE;

        (social_security, medicare)
    }

    /// All taxes on `income`; negative income is rejected
    pub fn total_tax(&self, income: f64, location: &str, status: FilingStatus) -> Result<TaxBreakdown> {
        if income < 0.0 || !income.is_finite() {
            return Err(ProjectionError::InvalidInput(format!(
                "taxable income must be a non-negative amount, got {}",
                income
            )));
        }

        let federal = self.federal_tax(income, status);
        let state = self.state_tax(income, location);
        let (social_security, medicare) = self.fica(income, status);
        let total = federal + state + social_security + medicare;

        Ok(TaxBreakdown {
            federal,
            state,
            social_security,
            medicare,
            total,
            effective_rate: if income > 0.0 { total / income } else { 0.0 },
        })
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::default_2024()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_city_to_state() {
        assert_eq!(city_to_state("Austin, TX").as_deref(), Some("TX"));
        assert_eq!(city_to_state("Portland,  or ").as_deref(), Some("OR"));
        assert_eq!(city_to_state("Springfield"), None);
        assert_eq!(city_to_state("Somewhere, Texas"), None);
    }

    #[test]
    fn test_federal_single_80k() {
        let calc = TaxCalculator::default_2024();
        // 11,600 * 10% + 35,550 * 12% + 32,850 * 22%
        let expected = 1_160.0 + 4_266.0 + 7_227.0;
        assert_abs_diff_eq!(calc.federal_tax(80_000.0, FilingStatus::Single), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_federal_joint_lower_than_single() {
        let calc = TaxCalculator::default_2024();
        let single = calc.federal_tax(150_000.0, FilingStatus::Single);
        let joint = calc.federal_tax(150_000.0, FilingStatus::Joint);
        assert!(joint < single);
    }

    #[test]
    fn test_top_bracket_unbounded() {
        let calc = TaxCalculator::default_2024();
        let at_one_million = calc.federal_tax(1_000_000.0, FilingStatus::Single);
        let at_two_million = calc.federal_tax(2_000_000.0, FilingStatus::Single);
        assert_abs_diff_eq!(at_two_million - at_one_million, 370_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_total_tax_texas_single() {
        let calc = TaxCalculator::default_2024();
        let tax = calc.total_tax(80_000.0, "Austin, TX", FilingStatus::Single).unwrap();

        assert_abs_diff_eq!(tax.federal, 12_653.0, epsilon = 1e-6);
        assert_eq!(tax.state, 0.0);
        assert_abs_diff_eq!(tax.social_security, 80_000.0 * 0.062, epsilon = 1e-6);
        assert_abs_diff_eq!(tax.medicare, 80_000.0 * 0.0145, epsilon = 1e-6);
        assert_abs_diff_eq!(tax.total, 12_653.0 + 4_960.0 + 1_160.0, epsilon = 1e-6);
        assert_abs_diff_eq!(tax.effective_rate, tax.total / 80_000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_state_tax_lookup() {
        let calc = TaxCalculator::default_2024();
        assert_abs_diff_eq!(calc.state_tax(100_000.0, "San Jose, CA"), 13_300.0, epsilon = 1e-6);
        assert_eq!(calc.state_tax(100_000.0, "Nowhere"), 0.0);
        assert_eq!(calc.state_tax(100_000.0, "San Juan, PR"), 0.0);
    }

    #[test]
    fn test_fica_wage_base_and_additional_medicare() {
        let calc = TaxCalculator::default_2024();

        let (ss, medicare) = calc.fica(300_000.0, FilingStatus::Single);
        assert_abs_diff_eq!(ss, 168_600.0 * 0.062, epsilon = 1e-6);
        assert_abs_diff_eq!(medicare, 300_000.0 * 0.0145 + 100_000.0 * 0.009, epsilon = 1e-6);

        let (_, joint_medicare) = calc.fica(300_000.0, FilingStatus::Joint);
        assert_abs_diff_eq!(joint_medicare, 300_000.0 * 0.0145 + 50_000.0 * 0.009, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_income_rejected() {
        let calc = TaxCalculator::default_2024();
        let err = calc.total_tax(-1.0, "Austin, TX", FilingStatus::Single).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InputValidation);
    }

    #[test]
    fn test_zero_income() {
        let calc = TaxCalculator::default_2024();
        let tax = calc.total_tax(0.0, "Austin, TX", FilingStatus::Single).unwrap();
        assert_eq!(tax.total, 0.0);
        assert_eq!(tax.effective_rate, 0.0);
    }

    #[test]
    fn test_missing_filing_status_fails_at_construction() {
        let mut tables = TaxTables::default_2024();
        tables.federal.remove(&FilingStatus::Joint);

        let err = TaxCalculator::new(tables).unwrap_err();
        assert!(matches!(err, ProjectionError::MissingTaxTable(ref s) if s == "Joint"));
    }

    #[test]
    fn test_bounded_top_bracket_rejected() {
        let mut tables = TaxTables::default_2024();
        tables.federal.insert(FilingStatus::Single, vec![TaxBracket::new(50_000.0, 0.1)]);
        assert!(TaxCalculator::new(tables).is_err());
    }
}
