//! Per-kind milestone parameters
//!
//! Amounts are annual unless the field name says monthly. Every field has a
//! default so callers only send what they know.

use serde::{Deserialize, Serialize};

use crate::entities::{DEFAULT_INCOME_GROWTH, DEFAULT_RETURN_RATE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarriageParams {
    pub wedding_cost: f64,
    pub spouse_income: f64,
    pub spouse_income_growth: f64,
    /// Fractional change in baseline living costs, e.g. 0.15 for +15%
    pub lifestyle_adjustment: f64,
    pub spouse_savings: f64,
    pub spouse_savings_return: f64,
    pub spouse_debt: f64,
    pub spouse_debt_rate: f64,
    pub spouse_debt_term_years: u32,
    pub insurance_cost: f64,
}

impl Default for MarriageParams {
    fn default() -> Self {
        Self {
            wedding_cost: 0.0,
            spouse_income: 0.0,
            spouse_income_growth: DEFAULT_INCOME_GROWTH,
            lifestyle_adjustment: 0.0,
            spouse_savings: 0.0,
            spouse_savings_return: DEFAULT_RETURN_RATE,
            spouse_debt: 0.0,
            spouse_debt_rate: 0.06,
            spouse_debt_term_years: 10,
            insurance_cost: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomePurchaseParams {
    pub home_price: f64,
    pub down_payment_pct: f64,
    pub mortgage_rate: f64,
    pub term_years: u32,
    pub appreciation_rate: f64,
    pub monthly_utilities: f64,
    pub monthly_hoa: f64,
    pub annual_renovation: f64,
    /// Share of the home used as an office, 0 to 1
    pub office_percentage: f64,
}

impl Default for HomePurchaseParams {
    fn default() -> Self {
        Self {
            home_price: 0.0,
            down_payment_pct: 0.20,
            mortgage_rate: 0.065,
            term_years: 30,
            appreciation_rate: 0.03,
            monthly_utilities: 0.0,
            monthly_hoa: 0.0,
            annual_renovation: 0.0,
            office_percentage: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EducationParams {
    pub institution: Option<String>,
    pub annual_cost: f64,
    pub program_years: u32,
    /// Amount borrowed each program year
    pub annual_loan: f64,
    /// Grant aid per program year
    pub scholarship: f64,
    pub loan_rate: f64,
    pub loan_term_years: u32,
    pub part_time_income: f64,
    /// Extra annual income from graduation onward
    pub salary_increase: f64,
}

impl Default for EducationParams {
    fn default() -> Self {
        Self {
            institution: None,
            annual_cost: 0.0,
            program_years: 4,
            annual_loan: 0.0,
            scholarship: 0.0,
            loan_rate: 0.055,
            loan_term_years: 10,
            part_time_income: 0.0,
            salary_increase: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarPurchaseParams {
    pub car_price: f64,
    pub down_payment_pct: f64,
    pub loan_rate: f64,
    pub term_years: u32,
    pub depreciation_rate: f64,
    pub monthly_fuel: f64,
    pub monthly_parking: f64,
}

impl Default for CarPurchaseParams {
    fn default() -> Self {
        Self {
            car_price: 0.0,
            down_payment_pct: 0.20,
            loan_rate: 0.07,
            term_years: 5,
            depreciation_rate: 0.15,
            monthly_fuel: 0.0,
            monthly_parking: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChildParams {
    pub childcare_cost: f64,
    pub education_savings: f64,
    pub healthcare_cost: f64,
    pub insurance_cost: f64,
    pub tax_benefit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromotionParams {
    pub salary_increase: f64,
    pub growth_rate: f64,
}

impl Default for PromotionParams {
    fn default() -> Self {
        Self {
            salary_increase: 0.0,
            growth_rate: DEFAULT_INCOME_GROWTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomParams {
    pub name: String,
    pub one_time_cost: f64,
    pub annual_expense: f64,
    pub annual_income: f64,
    pub asset_value: f64,
    pub asset_return_rate: f64,
}

impl Default for CustomParams {
    fn default() -> Self {
        Self {
            name: "Custom".to_string(),
            one_time_cost: 0.0,
            annual_expense: 0.0,
            annual_income: 0.0,
            asset_value: 0.0,
            asset_return_rate: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omitted_fields_take_defaults() {
        let params: HomePurchaseParams = serde_json::from_str(r#"{"home_price": 400000}"#).unwrap();
        assert_eq!(params.home_price, 400_000.0);
        assert_eq!(params.down_payment_pct, 0.20);
        assert_eq!(params.mortgage_rate, 0.065);
        assert_eq!(params.term_years, 30);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<CarPurchaseParams, _> = serde_json::from_str(r#"{"car_prize": 30000}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        let result: Result<EducationParams, _> = serde_json::from_str(r#"{"program_years": "two"}"#);
        assert!(result.is_err());
    }
}
