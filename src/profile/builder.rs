//! Profile builder: base profile plus milestones into the entity set to project

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::reference::{LocationCosts, ReferenceTables};
use crate::entities::{
    FixedExpense, Investment, Salary, SharedAsset, SharedExpense, SharedIncome, SharedLiability, TimeGated,
    VariableExpense, DEFAULT_INCOME_GROWTH, DEFAULT_INFLATION, DEFAULT_RETURN_RATE,
};
use crate::error::{ProjectionError, Result};
use crate::milestone::{build_milestone, ExpenseEffect, Milestone, MilestoneKind, MilestoneSpec};
use crate::tax::FilingStatus;

/// Surcharge on discretionary cost-of-living categories
pub const BASELINE_VOLATILITY: f64 = 0.1;

fn default_return_rate() -> f64 {
    DEFAULT_RETURN_RATE
}

/// Who is being projected: where they live, what they do, how they invest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub location: String,
    pub occupation: String,
    #[serde(default = "default_return_rate")]
    pub investment_return_rate: f64,
    #[serde(default)]
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub starting_savings: f64,
}

impl FinancialProfile {
    pub fn new(location: impl Into<String>, occupation: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            occupation: occupation.into(),
            investment_return_rate: DEFAULT_RETURN_RATE,
            filing_status: FilingStatus::default(),
            starting_savings: 0.0,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.investment_return_rate.is_finite() || self.investment_return_rate <= -1.0 {
            return Err(ProjectionError::InvalidInput(format!(
                "investment return rate must be a rate above -1, got {}",
                self.investment_return_rate
            )));
        }
        if !self.starting_savings.is_finite() {
            return Err(ProjectionError::InvalidInput(format!(
                "starting savings must be finite, got {}",
                self.starting_savings
            )));
        }
        Ok(())
    }
}

/// Filing status over time, plus the location state tax is levied in
#[derive(Debug, Clone, PartialEq)]
pub struct TaxProfile {
    pub location: String,
    pub filing_status: FilingStatus,
    /// Status changes as (year, status), sorted by year
    pub status_changes: Vec<(u32, FilingStatus)>,
}

impl TaxProfile {
    pub fn new(location: impl Into<String>, filing_status: FilingStatus) -> Self {
        Self {
            location: location.into(),
            filing_status,
            status_changes: Vec::new(),
        }
    }

    pub fn filing_status_for(&self, year: u32) -> FilingStatus {
        self.status_changes
            .iter()
            .rev()
            .find(|(from, _)| *from <= year)
            .map(|(_, status)| *status)
            .unwrap_or(self.filing_status)
    }
}

/// Everything a projection run evaluates, on the projection timeline
#[derive(Debug, Clone)]
pub struct EntitySet {
    /// Account that receives each year's cash flow
    pub savings: Investment,
    pub assets: Vec<SharedAsset>,
    pub liabilities: Vec<SharedLiability>,
    pub income: Vec<SharedIncome>,
    pub expenses: Vec<SharedExpense>,
    pub tax_profile: TaxProfile,
}

#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    tables: ReferenceTables,
}

impl ProfileBuilder {
    pub fn new(tables: ReferenceTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Build milestone specs for this profile's location
    ///
    /// A Home Purchase without a `home_price` is priced at the location's
    /// typical home price.
    pub fn milestones(&self, profile: &FinancialProfile, specs: &[MilestoneSpec]) -> Result<Vec<Milestone>> {
        let location = self.tables.location(&profile.location)?;
        specs
            .iter()
            .map(|spec| {
                if MilestoneKind::parse(&spec.kind)? != MilestoneKind::HomePurchase {
                    return spec.build();
                }
                let mut params = match &spec.params {
                    Value::Null => Map::new(),
                    Value::Object(map) if !map.contains_key("home_price") => map.clone(),
                    _ => return spec.build(),
                };
                log::debug!("Pricing home purchase at {} typical {}", location.name, location.home_price);
                params.insert("home_price".to_string(), Value::from(location.home_price));
                build_milestone(&spec.kind, spec.trigger_year, &Value::Object(params))
            })
            .collect()
    }

    /// Entity set with no milestones applied
    pub fn baseline(&self, profile: &FinancialProfile) -> Result<EntitySet> {
        self.build(profile, &[])
    }

    /// Resolve the profile against the reference tables and fold in the
    /// milestones in trigger-year order (stable for equal years)
    pub fn build(&self, profile: &FinancialProfile, milestones: &[Milestone]) -> Result<EntitySet> {
        profile.validate()?;
        let location = self.tables.location(&profile.location)?;
        let monthly_income = self.tables.occupation_income(&profile.occupation)?;

        let mut ordered: Vec<&Milestone> = milestones.iter().collect();
        ordered.sort_by_key(|m| m.trigger_year);

        let salary = Salary::new(
            "Salary",
            monthly_income * 12.0,
            DEFAULT_INCOME_GROWTH,
            location.income_adjustment,
        );
        let mut income: Vec<SharedIncome> = vec![Arc::new(salary)];

        let mut expenses: Vec<SharedExpense> = baseline_expenses(&location.costs)
            .into_iter()
            .map(|expense| apply_adjustments(expense, &ordered))
            .collect();

        let mut assets: Vec<SharedAsset> = Vec::new();
        let mut liabilities: Vec<SharedLiability> = Vec::new();
        let mut tax_profile = TaxProfile::new(location.name.clone(), profile.filing_status);

        for milestone in &ordered {
            let start = milestone.trigger_year;
            assets.extend(
                milestone
                    .assets
                    .iter()
                    .map(|a| Arc::new(TimeGated::rebased_from(a.clone(), start)) as SharedAsset),
            );
            liabilities.extend(
                milestone
                    .liabilities
                    .iter()
                    .map(|l| Arc::new(TimeGated::rebased_from(l.clone(), start)) as SharedLiability),
            );
            income.extend(
                milestone
                    .income_adjustments
                    .iter()
                    .map(|i| Arc::new(TimeGated::rebased_from(i.clone(), start)) as SharedIncome),
            );
            expenses.extend(
                milestone
                    .one_time_expenses
                    .iter()
                    .chain(milestone.recurring_expenses.iter())
                    .map(|e| Arc::new(TimeGated::rebased_from(e.clone(), start)) as SharedExpense),
            );
            if let Some(status) = milestone.filing_status {
                tax_profile.status_changes.push((start, status));
            }
            log::debug!("Applied {} milestone '{}' from year {}", milestone.kind, milestone.name, start);
        }

        log::info!(
            "Built profile for {} in {} (monthly cost of living {:.0}): {} milestones, {} income sources, {} expenses",
            profile.occupation,
            location.name,
            location.costs.total(),
            ordered.len(),
            income.len(),
            expenses.len()
        );

        Ok(EntitySet {
            savings: Investment::savings(profile.starting_savings, profile.investment_return_rate),
            assets,
            liabilities,
            income,
            expenses,
            tax_profile,
        })
    }
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new(ReferenceTables::builtin())
    }
}

/// Cost-of-living expenses for a location, annualized
fn baseline_expenses(costs: &LocationCosts) -> Vec<SharedExpense> {
    let fixed = [
        ("Rent", costs.housing),
        ("Transportation", costs.transportation),
        ("Healthcare", costs.healthcare),
        ("Insurance", costs.insurance),
    ];
    let variable = [
        ("Food", costs.food),
        ("Apparel", costs.apparel),
        ("Services", costs.services),
        ("Entertainment", costs.entertainment),
        ("Other", costs.other),
    ];

    let mut expenses: Vec<SharedExpense> = fixed
        .into_iter()
        .map(|(name, monthly)| Arc::new(FixedExpense::new(name, monthly * 12.0, DEFAULT_INFLATION)) as SharedExpense)
        .collect();
    expenses.extend(variable.into_iter().map(|(name, monthly)| {
        Arc::new(VariableExpense::new(
            name,
            monthly * 12.0,
            DEFAULT_INFLATION,
            BASELINE_VOLATILITY,
        )) as SharedExpense
    }));
    expenses
}

/// Wrap a baseline expense in the gates the milestones' expense rules call for
///
/// Scale steps from the same milestone kind replace each other (the most
/// recent trigger wins); layers from different kinds multiply. Suppression
/// starts at the earliest suppressing trigger.
fn apply_adjustments(expense: SharedExpense, milestones: &[&Milestone]) -> SharedExpense {
    let name = expense.name().to_string();
    let mut suppress_from: Option<u32> = None;
    let mut scale_steps: BTreeMap<MilestoneKind, Vec<(u32, f64)>> = BTreeMap::new();

    for milestone in milestones {
        let year = milestone.trigger_year;
        for adjustment in milestone.expense_adjustments.iter().filter(|a| a.target.matches(&name)) {
            match adjustment.effect {
                ExpenseEffect::Suppress => {
                    suppress_from = Some(suppress_from.map_or(year, |from| from.min(year)));
                }
                ExpenseEffect::Scale(factor) => {
                    scale_steps.entry(milestone.kind).or_default().push((year, factor));
                }
            }
        }
    }

    let mut gated = expense;
    for steps in scale_steps.into_values() {
        gated = Arc::new(TimeGated::scaled_from(gated, steps));
    }
    if let Some(year) = suppress_from {
        gated = Arc::new(TimeGated::active_until(gated, year));
    }
    gated
}
