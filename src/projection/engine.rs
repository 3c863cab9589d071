//! Core projection engine for yearly household cash flow projections

use std::collections::HashMap;

use crate::entities::{Asset, Liability, ValuedOverYear};
use crate::error::{ProjectionError, Result};
use crate::profile::EntitySet;
use crate::tax::TaxCalculator;
use super::state::ProjectionState;
use super::cashflows::{ProjectionResult, SeriesRow, YearRow, TAX_CATEGORY, TAX_TYPES};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of years to project
    pub num_years: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self { num_years: 30 }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    tax: TaxCalculator,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given tax rules and config
    pub fn new(tax: TaxCalculator, config: ProjectionConfig) -> Self {
        Self { tax, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection over `0..num_years`
    ///
    /// Entities are only read; the savings contribution history lives in the
    /// run's own state, so the same entity set can be projected again. Any
    /// non-finite amount aborts the run and nothing is returned.
    pub fn project(&self, entities: &EntitySet) -> Result<ProjectionResult> {
        let num_years = self.config.num_years as usize;
        let (mut result, categories) = layout(entities, num_years);
        let mut state = ProjectionState::new(&entities.savings);

        for _year in 0..self.config.num_years {
            let row = self.project_year(entities, &categories, &mut state, &mut result)?;
            result.add_row(row);
            state.advance_year();
        }

        if let Some(last) = result.years.last() {
            log::info!(
                "Projected {} years: final net worth {}, final savings {}",
                self.config.num_years,
                last.net_worth,
                last.investment_growth
            );
        }

        Ok(result)
    }

    /// Calculate one year and append its breakdown values
    fn project_year(
        &self,
        entities: &EntitySet,
        categories: &[usize],
        state: &mut ProjectionState,
        result: &mut ProjectionResult,
    ) -> Result<YearRow> {
        let year = state.year;
        let mut row = YearRow::new(year);

        // Income
        let mut income_total = 0.0;
        for (income, series) in entities.income.iter().zip(result.income_breakdown.iter_mut()) {
            let value = checked(year, income.name(), income.value_at(year))?;
            income_total += value;
            series.values.push(whole(value));
        }
        row.income = whole(checked(year, "total income", income_total)?);

        // Tax on the rounded income
        let status = entities.tax_profile.filing_status_for(year);
        let tax = self
            .tax
            .total_tax(row.income as f64, &entities.tax_profile.location, status)?;
        row.filing_status = status;
        row.federal_tax = whole(checked(year, "federal tax", tax.federal)?);
        row.state_tax = whole(checked(year, "state tax", tax.state)?);
        row.social_security = whole(checked(year, "social security", tax.social_security)?);
        row.medicare = whole(checked(year, "medicare", tax.medicare)?);
        row.total_tax = whole(checked(year, "total tax", tax.total)?);

        let by_type = [row.federal_tax, row.state_tax, row.social_security, row.medicare];
        for (series, amount) in result.tax_breakdown.iter_mut().zip(by_type) {
            series.values.push(amount);
        }

        // Regular expenses by category, then the tax row
        let tax_row = result.expense_breakdown.len() - 1;
        let mut by_category = vec![0.0; tax_row];
        let mut regular = 0.0;
        for (expense, &category) in entities.expenses.iter().zip(categories) {
            let value = checked(year, expense.name(), expense.value_at(year))?;
            regular += value;
            by_category[category] += value;
        }
        for (series, amount) in result.expense_breakdown.iter_mut().zip(&by_category) {
            series.values.push(whole(*amount));
        }
        result.expense_breakdown[tax_row].values.push(row.total_tax);

        row.regular_expenses = whole(checked(year, "regular expenses", regular)?);
        row.total_expenses = row.regular_expenses + row.total_tax;

        // Cash flow
        row.cash_flow = row.income - row.total_expenses;

        // Reinvest into savings
        let savings = state.ledger.record(&entities.savings, row.cash_flow as f64);
        let savings = checked(year, "savings", savings)?;
        row.investment_growth = whole(savings);

        // Assets, savings first
        let mut asset_total = savings;
        result.asset_breakdown[0].values.push(row.investment_growth);
        for (asset, series) in entities.assets.iter().zip(result.asset_breakdown.iter_mut().skip(1)) {
            let value = checked(year, asset.name(), asset.value_at(year))?;
            asset_total += value;
            series.values.push(whole(value));
        }
        row.total_assets = whole(checked(year, "total assets", asset_total)?);

        // Liabilities
        let mut liability_total = 0.0;
        let mut payments = 0.0;
        for (liability, series) in entities.liabilities.iter().zip(result.liability_breakdown.iter_mut()) {
            let balance = checked(year, liability.name(), liability.value_at(year))?;
            liability_total += balance;
            payments += checked(year, liability.name(), liability.annual_payment_at(year))?;
            series.values.push(whole(balance));
        }
        row.total_liabilities = whole(checked(year, "total liabilities", liability_total)?);
        row.loan_payments = whole(payments);

        // Net worth
        row.net_worth = row.total_assets - row.total_liabilities;

        log::debug!(
            "Year {}: income={} tax={} expenses={} cash_flow={} savings={} net_worth={}",
            year,
            row.income,
            row.total_tax,
            row.total_expenses,
            row.cash_flow,
            row.investment_growth,
            row.net_worth
        );

        Ok(row)
    }
}

/// Empty breakdown rows for every entity plus the expense-to-category index
fn layout(entities: &EntitySet, num_years: usize) -> (ProjectionResult, Vec<usize>) {
    let mut result = ProjectionResult::new();

    result.income_breakdown = entities
        .income
        .iter()
        .map(|i| SeriesRow::new(i.name(), num_years))
        .collect();

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut categories = Vec::with_capacity(entities.expenses.len());
    for expense in &entities.expenses {
        let category = expense.category();
        let next = result.expense_breakdown.len();
        let slot = *index.entry(category.clone()).or_insert_with(|| {
            result.expense_breakdown.push(SeriesRow::new(category, num_years));
            next
        });
        categories.push(slot);
    }
    result.expense_breakdown.push(SeriesRow::new(TAX_CATEGORY, num_years));

    result.tax_breakdown = TAX_TYPES.iter().map(|t| SeriesRow::new(*t, num_years)).collect();

    result.asset_breakdown.push(SeriesRow::new(entities.savings.breakdown_key(), num_years));
    result
        .asset_breakdown
        .extend(entities.assets.iter().map(|a| SeriesRow::new(a.breakdown_key(), num_years)));

    result.liability_breakdown = entities
        .liabilities
        .iter()
        .map(|l| SeriesRow::new(l.breakdown_key(), num_years))
        .collect();

    (result, categories)
}

fn checked(year: u32, what: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProjectionError::Computation {
            year,
            detail: format!("{} evaluated to {}", what, value),
        })
    }
}

/// Round to whole currency units
fn whole(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::entities::IncomeStream;
    use crate::error::ErrorKind;
    use crate::milestone::{CarPurchaseParams, HomePurchaseParams, MarriageParams, Milestone};
    use crate::profile::{FinancialProfile, ProfileBuilder};
    use crate::tax::FilingStatus;

    fn engine(num_years: u32) -> ProjectionEngine {
        ProjectionEngine::new(TaxCalculator::default_2024(), ProjectionConfig { num_years })
    }

    fn profile() -> FinancialProfile {
        FinancialProfile::new("Austin, TX", "Software Developer")
    }

    fn home(year: u32) -> Milestone {
        Milestone::home_purchase(
            year,
            &HomePurchaseParams {
                home_price: 400_000.0,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_baseline_first_year() {
        let entities = ProfileBuilder::default().baseline(&profile()).unwrap();
        let result = engine(1).project(&entities).unwrap();
        let row = &result.years[0];

        // 11,000/month * 12 * 1.05 location adjustment
        assert_eq!(row.income, 138_600);
        assert_eq!(row.state_tax, 0);
        assert_eq!(row.social_security, 8_593);
        assert_eq!(row.medicare, 2_010);
        assert_eq!(row.total_tax, 36_909);
        assert_eq!(row.total_expenses, row.regular_expenses + row.total_tax);
        assert_eq!(row.cash_flow, row.income - row.total_expenses);
        assert_eq!(row.investment_growth, (row.cash_flow as f64 * 1.07).round() as i64);
        assert_eq!(result.expense_category(TAX_CATEGORY).unwrap().values, vec![36_909]);
    }

    #[test]
    fn test_net_worth_identity() {
        let builder = ProfileBuilder::default();
        let marriage = Milestone::marriage(
            4,
            &MarriageParams {
                wedding_cost: 30_000.0,
                spouse_income: 55_000.0,
                spouse_savings: 12_000.0,
                spouse_debt: 18_000.0,
                ..Default::default()
            },
        )
        .unwrap();
        let entities = builder.build(&profile(), &[home(3), marriage]).unwrap();
        let result = engine(30).project(&entities).unwrap();

        assert_eq!(result.num_years(), 30);
        for row in &result.years {
            assert_eq!(row.net_worth, row.total_assets - row.total_liabilities);
            assert_eq!(row.total_expenses, row.regular_expenses + row.total_tax);
            assert_eq!(row.cash_flow, row.income - row.total_expenses);
        }
        for series in result
            .income_breakdown
            .iter()
            .chain(&result.expense_breakdown)
            .chain(&result.tax_breakdown)
            .chain(&result.asset_breakdown)
            .chain(&result.liability_breakdown)
        {
            assert_eq!(series.values.len(), 30, "{}", series.key);
        }
    }

    #[test]
    fn test_savings_follow_contributions() {
        let entities = ProfileBuilder::default().baseline(&profile()).unwrap();
        let result = engine(10).project(&entities).unwrap();

        let contributions: Vec<f64> = result.years.iter().map(|r| r.cash_flow as f64).collect();
        for row in &result.years {
            let expected = entities.savings.value_with_contributions(row.year, &contributions);
            assert_eq!(row.investment_growth, expected.round() as i64);
        }
        assert_eq!(result.asset_breakdown[0].key, "Investment:Savings");
    }

    #[test]
    fn test_reprojection_is_identical() {
        let entities = ProfileBuilder::default().build(&profile(), &[home(3)]).unwrap();
        let engine = engine(25);
        let first = engine.project(&entities).unwrap();
        let second = engine.project(&entities).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_milestones_projects_as_baseline() {
        let builder = ProfileBuilder::default();
        let engine = engine(30);
        let built = engine.project(&builder.build(&profile(), &[]).unwrap()).unwrap();
        let baseline = engine.project(&builder.baseline(&profile()).unwrap()).unwrap();
        assert_eq!(built, baseline);
        assert_eq!(built.num_years(), 30);
    }

    #[test]
    fn test_home_purchase_projection() {
        let entities = ProfileBuilder::default().build(&profile(), &[home(3)]).unwrap();
        let result = engine(10).project(&entities).unwrap();

        let rent = result.expense_category("Rent").unwrap();
        assert!(rent.values[..3].iter().all(|v| *v > 0));
        assert!(rent.values[3..].iter().all(|v| *v == 0));

        let house = result.asset_rows("Home:Home").next().unwrap();
        assert_eq!(house.at(2), Some(0));
        assert_eq!(house.at(3), Some(400_000));
        assert_eq!(house.at(4), Some(412_000));

        let mortgage = result.liability_rows("Loan:Mortgage").next().unwrap();
        assert_eq!(mortgage.at(2), Some(0));
        assert_eq!(mortgage.at(3), Some(320_000));
        assert!(mortgage.at(4).unwrap() < 320_000);

        let one_time = result.expense_category("One-time: Home Purchase").unwrap();
        assert_eq!(one_time.at(3), Some(80_000));
        assert_eq!(one_time.at(4), Some(0));

        assert_eq!(result.years[2].loan_payments, 0);
        assert!(result.years[3].loan_payments > 0);
    }

    #[test]
    fn test_same_name_entities_keep_separate_rows() {
        let car = |year| {
            Milestone::car_purchase(
                year,
                &CarPurchaseParams {
                    car_price: 20_000.0,
                    ..Default::default()
                },
            )
            .unwrap()
        };
        let entities = ProfileBuilder::default().build(&profile(), &[car(1), car(8)]).unwrap();
        let result = engine(15).project(&entities).unwrap();

        let cars: Vec<_> = result.asset_rows("DepreciableAsset:Car").collect();
        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0].at(1), Some(20_000));
        assert_eq!(cars[1].at(7), Some(0));
        assert_eq!(cars[1].at(8), Some(20_000));

        // Five-year loans: paid off at years 6 and 13
        let loans: Vec<_> = result.liability_rows("Loan:Car Loan").collect();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].at(6), Some(0));
        assert!(loans[1].at(12).unwrap() > 0);
        assert_eq!(loans[1].at(13), Some(0));

        // Payments merge into one category
        let payments = result.expense_category("Car Payment").unwrap();
        assert_eq!(payments.at(0), Some(0));
        assert_eq!(payments.at(3), payments.at(9));
        assert_eq!(payments.at(7), Some(0));
        assert!(payments.at(12).unwrap() > 0);
        assert_eq!(payments.at(13), Some(0));
    }

    #[test]
    fn test_marriage_switches_filing_status() {
        let marriage = Milestone::marriage(
            2,
            &MarriageParams {
                spouse_income: 40_000.0,
                ..Default::default()
            },
        )
        .unwrap();
        let entities = ProfileBuilder::default().build(&profile(), &[marriage]).unwrap();
        let result = engine(4).project(&entities).unwrap();

        assert_eq!(result.years[1].filing_status, FilingStatus::Single);
        assert_eq!(result.years[2].filing_status, FilingStatus::Joint);
        assert!(result.years[2].income > result.years[1].income + 40_000);
    }

    #[test]
    fn test_non_finite_aborts_run() {
        let mut entities = ProfileBuilder::default().baseline(&profile()).unwrap();
        entities
            .income
            .push(Arc::new(IncomeStream::new("Windfall", f64::INFINITY, 0.0)));

        let err = engine(5).project(&entities).unwrap_err();
        assert!(matches!(err, ProjectionError::Computation { year: 0, .. }));
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_zero_years() {
        let entities = ProfileBuilder::default().baseline(&profile()).unwrap();
        let result = engine(0).project(&entities).unwrap();
        assert!(result.years.is_empty());
        assert!(result.income_breakdown.iter().all(|s| s.values.is_empty()));
    }
}
