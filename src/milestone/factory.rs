//! Milestone constructors: parameters in, effect lists out

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::params::{
    CarPurchaseParams, ChildParams, CustomParams, EducationParams, HomePurchaseParams, MarriageParams,
    PromotionParams,
};
use super::{ExpenseAdjustment, ExpenseEffect, ExpenseTarget, Milestone, MilestoneKind};
use crate::entities::{
    DepreciableAsset, FixedExpense, Home, IncomeStream, Investment, Loan, LoanPayment, OneTimeExpense, Salary,
    TimeGated, DEFAULT_INCOME_GROWTH, DEFAULT_INFLATION,
};
use crate::error::{ProjectionError, Result};
use crate::tax::FilingStatus;

/// Annual property tax as a share of the purchase price
pub const PROPERTY_TAX_RATE: f64 = 0.015;
/// Annual homeowner's insurance as a share of the purchase price
pub const HOME_INSURANCE_RATE: f64 = 0.005;
/// Annual maintenance as a share of the purchase price
pub const HOME_MAINTENANCE_RATE: f64 = 0.01;
/// Annual home-office deduction per unit of office share of the purchase price
pub const HOME_OFFICE_DEDUCTION_RATE: f64 = 0.05;

/// A milestone as supplied by callers: type name, trigger year and a JSON
/// object of kind-specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub trigger_year: u32,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl MilestoneSpec {
    pub fn new(kind: impl Into<String>, trigger_year: u32, params: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            trigger_year,
            params,
        }
    }

    pub fn build(&self) -> Result<Milestone> {
        build_milestone(&self.kind, self.trigger_year, &self.params)
    }
}

/// Validate the type name, decode its parameters and build the milestone
///
/// A `null` params value means "all defaults".
pub fn build_milestone(kind: &str, trigger_year: u32, params: &serde_json::Value) -> Result<Milestone> {
    let kind = MilestoneKind::parse(kind)?;
    let milestone = match kind {
        MilestoneKind::Marriage => Milestone::marriage(trigger_year, &decode(kind, params)?),
        MilestoneKind::HomePurchase => Milestone::home_purchase(trigger_year, &decode(kind, params)?),
        MilestoneKind::Education => Milestone::education(trigger_year, &decode(kind, params)?),
        MilestoneKind::CarPurchase => Milestone::car_purchase(trigger_year, &decode(kind, params)?),
        MilestoneKind::Child => Milestone::child(trigger_year, &decode(kind, params)?),
        MilestoneKind::Promotion => Milestone::promotion(trigger_year, &decode(kind, params)?),
        MilestoneKind::Custom => Milestone::custom(trigger_year, &decode(kind, params)?),
    }?;

    log::debug!(
        "Built {} milestone '{}' at year {}",
        milestone.kind,
        milestone.name,
        milestone.trigger_year
    );
    Ok(milestone)
}

fn decode<T: DeserializeOwned + Default>(kind: MilestoneKind, params: &serde_json::Value) -> Result<T> {
    if params.is_null() {
        return Ok(T::default());
    }
    T::deserialize(params).map_err(|source| ProjectionError::InvalidParams {
        kind: kind.to_string(),
        source,
    })
}

fn check_amount(milestone: &str, field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ProjectionError::InvalidInput(format!(
            "{}: {} must be a non-negative amount, got {}",
            milestone, field, value
        )))
    }
}

fn check_fraction(milestone: &str, field: &str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ProjectionError::InvalidInput(format!(
            "{}: {} must be between 0 and 1, got {}",
            milestone, field, value
        )))
    }
}

/// Growth, return and adjustment rates: finite and above -100%
fn check_rate(milestone: &str, field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > -1.0 {
        Ok(value)
    } else {
        Err(ProjectionError::InvalidInput(format!(
            "{}: {} must be a rate above -1, got {}",
            milestone, field, value
        )))
    }
}

impl Milestone {
    pub fn marriage(trigger_year: u32, p: &MarriageParams) -> Result<Self> {
        let kind = MilestoneKind::Marriage;
        let label = kind.as_str();
        let mut m = Milestone::new(kind, label, trigger_year);

        let wedding = check_amount(label, "wedding_cost", p.wedding_cost)?;
        let spouse_income = check_amount(label, "spouse_income", p.spouse_income)?;
        let spouse_growth = check_rate(label, "spouse_income_growth", p.spouse_income_growth)?;
        let lifestyle = check_rate(label, "lifestyle_adjustment", p.lifestyle_adjustment)?;
        let savings = check_amount(label, "spouse_savings", p.spouse_savings)?;
        let savings_return = check_rate(label, "spouse_savings_return", p.spouse_savings_return)?;
        let debt = check_amount(label, "spouse_debt", p.spouse_debt)?;
        let insurance = check_amount(label, "insurance_cost", p.insurance_cost)?;

        if wedding > 0.0 {
            m.one_time_expenses.push(Arc::new(OneTimeExpense::new("Wedding", label, wedding, 0)));
        }
        if spouse_income > 0.0 {
            m.income_adjustments
                .push(Arc::new(Salary::new("Spouse Income", spouse_income, spouse_growth, 1.0)));
        }
        if savings > 0.0 {
            m.assets.push(Arc::new(Investment::new("Spouse Savings", savings, savings_return)));
        }
        if debt > 0.0 {
            let loan = Loan::new("Spouse Debt", debt, p.spouse_debt_rate, p.spouse_debt_term_years)?;
            m.recurring_expenses.push(Arc::new(LoanPayment::new("Spouse Debt Payment", loan.clone())));
            m.liabilities.push(Arc::new(loan));
        }
        if insurance > 0.0 {
            m.recurring_expenses
                .push(Arc::new(FixedExpense::new("Joint Insurance", insurance, DEFAULT_INFLATION)));
        }
        if lifestyle != 0.0 {
            m.expense_adjustments.push(ExpenseAdjustment::new(
                ExpenseTarget::Baseline,
                ExpenseEffect::Scale(1.0 + lifestyle),
            ));
        }
        m.filing_status = Some(FilingStatus::Joint);

        Ok(m)
    }

    pub fn home_purchase(trigger_year: u32, p: &HomePurchaseParams) -> Result<Self> {
        let kind = MilestoneKind::HomePurchase;
        let label = kind.as_str();
        let mut m = Milestone::new(kind, label, trigger_year);

        let price = check_amount(label, "home_price", p.home_price)?;
        let down_pct = check_fraction(label, "down_payment_pct", p.down_payment_pct)?;
        let appreciation = check_rate(label, "appreciation_rate", p.appreciation_rate)?;
        let utilities = check_amount(label, "monthly_utilities", p.monthly_utilities)?;
        let hoa = check_amount(label, "monthly_hoa", p.monthly_hoa)?;
        let renovation = check_amount(label, "annual_renovation", p.annual_renovation)?;
        let office_pct = check_fraction(label, "office_percentage", p.office_percentage)?;

        let down_payment = price * down_pct;
        let loan_amount = price - down_payment;

        m.assets.push(Arc::new(Home::new("Home", price, appreciation)));
        if loan_amount > 0.0 {
            let mortgage = Loan::new("Mortgage", loan_amount, p.mortgage_rate, p.term_years)?;
            m.recurring_expenses.push(Arc::new(LoanPayment::new("Mortgage Payment", mortgage.clone())));
            m.liabilities.push(Arc::new(mortgage));
        }
        if down_payment > 0.0 {
            m.one_time_expenses
                .push(Arc::new(OneTimeExpense::new("Down Payment", label, down_payment, 0)));
        }

        let ownership_costs = [
            ("Property Tax", price * PROPERTY_TAX_RATE),
            ("Home Insurance", price * HOME_INSURANCE_RATE),
            ("Home Maintenance", price * HOME_MAINTENANCE_RATE),
            ("Utilities", utilities * 12.0),
            ("HOA", hoa * 12.0),
            ("Renovation", renovation),
        ];
        for (name, amount) in ownership_costs {
            if amount > 0.0 {
                m.recurring_expenses
                    .push(Arc::new(FixedExpense::new(name, amount, DEFAULT_INFLATION)));
            }
        }
        // Negative expense: the deduction offsets spending every year
        if office_pct > 0.0 {
            let deduction = price * office_pct * HOME_OFFICE_DEDUCTION_RATE;
            m.recurring_expenses.push(Arc::new(FixedExpense::new(
                "Home Office Deduction",
                -deduction,
                DEFAULT_INFLATION,
            )));
        }

        Ok(m)
    }

    /// Education program: tuition and part-time work last `program_years`,
    /// the salary increase starts at graduation
    pub fn education(trigger_year: u32, p: &EducationParams) -> Result<Self> {
        let kind = MilestoneKind::Education;
        let name = match p.institution.as_deref().map(str::trim) {
            Some(inst) if !inst.is_empty() => format!("Education: {}", inst),
            _ => kind.as_str().to_string(),
        };
        let mut m = Milestone::new(kind, name.clone(), trigger_year);

        if p.program_years == 0 {
            return Err(ProjectionError::InvalidInput(format!(
                "{}: program_years must be at least 1",
                name
            )));
        }
        let cost = check_amount(&name, "annual_cost", p.annual_cost)?;
        let annual_loan = check_amount(&name, "annual_loan", p.annual_loan)?;
        let scholarship = check_amount(&name, "scholarship", p.scholarship)?;
        let part_time = check_amount(&name, "part_time_income", p.part_time_income)?;
        let increase = check_amount(&name, "salary_increase", p.salary_increase)?;
        let years = p.program_years;

        let tuition = (cost - annual_loan - scholarship).max(0.0);
        if tuition > 0.0 {
            m.recurring_expenses.push(Arc::new(TimeGated::active_until(
                FixedExpense::new("Tuition", tuition, DEFAULT_INFLATION),
                years,
            )));
        }
        if annual_loan > 0.0 {
            let loan = Loan::new("Student Loan", annual_loan * years as f64, p.loan_rate, p.loan_term_years)?;
            m.recurring_expenses.push(Arc::new(LoanPayment::new("Student Loan Payment", loan.clone())));
            m.liabilities.push(Arc::new(loan));
        }
        if part_time > 0.0 {
            m.income_adjustments.push(Arc::new(TimeGated::active_until(
                IncomeStream::new("Part-time Income", part_time, DEFAULT_INCOME_GROWTH),
                years,
            )));
        }
        if increase > 0.0 {
            m.income_adjustments.push(Arc::new(TimeGated::rebased_from(
                IncomeStream::new("Education Salary Increase", increase, DEFAULT_INCOME_GROWTH),
                years,
            )));
        }

        Ok(m)
    }

    pub fn car_purchase(trigger_year: u32, p: &CarPurchaseParams) -> Result<Self> {
        let kind = MilestoneKind::CarPurchase;
        let label = kind.as_str();
        let mut m = Milestone::new(kind, label, trigger_year);

        let price = check_amount(label, "car_price", p.car_price)?;
        let down_pct = check_fraction(label, "down_payment_pct", p.down_payment_pct)?;
        let depreciation = check_fraction(label, "depreciation_rate", p.depreciation_rate)?;
        let fuel = check_amount(label, "monthly_fuel", p.monthly_fuel)?;
        let parking = check_amount(label, "monthly_parking", p.monthly_parking)?;

        let down_payment = price * down_pct;
        let financed = price - down_payment;

        m.assets.push(Arc::new(DepreciableAsset::new("Car", price, depreciation)));
        if financed > 0.0 {
            let loan = Loan::new("Car Loan", financed, p.loan_rate, p.term_years)?;
            m.recurring_expenses.push(Arc::new(LoanPayment::new("Car Payment", loan.clone())));
            m.liabilities.push(Arc::new(loan));
        }
        if down_payment > 0.0 {
            m.one_time_expenses
                .push(Arc::new(OneTimeExpense::new("Car Down Payment", label, down_payment, 0)));
        }
        for (name, monthly) in [("Fuel", fuel), ("Parking", parking)] {
            if monthly > 0.0 {
                m.recurring_expenses
                    .push(Arc::new(FixedExpense::new(name, monthly * 12.0, DEFAULT_INFLATION)));
            }
        }

        Ok(m)
    }

    pub fn child(trigger_year: u32, p: &ChildParams) -> Result<Self> {
        let kind = MilestoneKind::Child;
        let label = kind.as_str();
        let mut m = Milestone::new(kind, label, trigger_year);

        let costs = [
            ("Child Care", check_amount(label, "childcare_cost", p.childcare_cost)?),
            ("Education Savings", check_amount(label, "education_savings", p.education_savings)?),
            ("Child Healthcare", check_amount(label, "healthcare_cost", p.healthcare_cost)?),
            ("Child Insurance", check_amount(label, "insurance_cost", p.insurance_cost)?),
        ];
        for (name, amount) in costs {
            if amount > 0.0 {
                m.recurring_expenses
                    .push(Arc::new(FixedExpense::new(name, amount, DEFAULT_INFLATION)));
            }
        }

        let benefit = check_amount(label, "tax_benefit", p.tax_benefit)?;
        if benefit > 0.0 {
            // Credit amounts are set in nominal dollars
            m.income_adjustments
                .push(Arc::new(IncomeStream::new("Child Tax Benefit", benefit, 0.0)));
        }

        Ok(m)
    }

    pub fn promotion(trigger_year: u32, p: &PromotionParams) -> Result<Self> {
        let kind = MilestoneKind::Promotion;
        let label = kind.as_str();
        let mut m = Milestone::new(kind, label, trigger_year);

        let raise = check_amount(label, "salary_increase", p.salary_increase)?;
        let growth = check_rate(label, "growth_rate", p.growth_rate)?;
        if raise > 0.0 {
            m.income_adjustments
                .push(Arc::new(IncomeStream::new("Promotion Raise", raise, growth)));
        }

        Ok(m)
    }

    pub fn custom(trigger_year: u32, p: &CustomParams) -> Result<Self> {
        let kind = MilestoneKind::Custom;
        let name = match p.name.trim() {
            "" => kind.as_str(),
            name => name,
        }
        .to_string();
        let mut m = Milestone::new(kind, name.clone(), trigger_year);

        let one_time = check_amount(&name, "one_time_cost", p.one_time_cost)?;
        let expense = check_amount(&name, "annual_expense", p.annual_expense)?;
        let income = check_amount(&name, "annual_income", p.annual_income)?;
        let asset_value = check_amount(&name, "asset_value", p.asset_value)?;
        let asset_return = check_rate(&name, "asset_return_rate", p.asset_return_rate)?;

        if one_time > 0.0 {
            m.one_time_expenses
                .push(Arc::new(OneTimeExpense::new(name.clone(), name.clone(), one_time, 0)));
        }
        if expense > 0.0 {
            m.recurring_expenses
                .push(Arc::new(FixedExpense::new(name.clone(), expense, DEFAULT_INFLATION)));
        }
        if income > 0.0 {
            m.income_adjustments
                .push(Arc::new(IncomeStream::new(name.clone(), income, DEFAULT_INCOME_GROWTH)));
        }
        if asset_value > 0.0 {
            m.assets.push(Arc::new(Investment::new(name.clone(), asset_value, asset_return)));
        }

        Ok(m)
    }
}
