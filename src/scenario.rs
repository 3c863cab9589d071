//! Scenario runner for side-by-side projections
//!
//! Pre-loads reference and tax tables once, then runs many independent
//! projections (different milestone plans, institutions, locations) without
//! re-reading CSV files. Each scenario builds its own entity set, so batches
//! run in parallel.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::milestone::{Milestone, MilestoneSpec};
use crate::profile::{FinancialProfile, ProfileBuilder, ReferenceTables};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use crate::tax::{TaxCalculator, TaxTables};

/// A named profile plus the milestone plan to project it under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub profile: FinancialProfile,
    #[serde(default)]
    pub milestones: Vec<MilestoneSpec>,
}

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// let plans = vec![stay_renting, buy_in_year_three];
/// let results = runner.run_scenarios(&plans, &ProjectionConfig::default());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    builder: ProfileBuilder,
    tax: TaxCalculator,
}

impl ScenarioRunner {
    /// Create runner with built-in reference and 2024 tax tables
    pub fn new() -> Self {
        Self {
            builder: ProfileBuilder::default(),
            tax: TaxCalculator::default_2024(),
        }
    }

    /// Create runner by loading tables from the default CSV directories
    pub fn from_csv() -> Result<Self> {
        Self::with_tables(ReferenceTables::from_csv()?, TaxTables::from_csv()?)
    }

    /// Create runner from specific reference and tax directories
    pub fn from_csv_path(reference_dir: &Path, tax_dir: &Path) -> Result<Self> {
        Self::with_tables(
            ReferenceTables::from_csv_path(reference_dir)?,
            TaxTables::from_csv_path(tax_dir)?,
        )
    }

    /// Create runner with pre-built tables
    pub fn with_tables(reference: ReferenceTables, tax: TaxTables) -> Result<Self> {
        Ok(Self {
            builder: ProfileBuilder::new(reference),
            tax: TaxCalculator::new(tax)?,
        })
    }

    /// Build the profile with the given milestones and project it
    pub fn run(
        &self,
        profile: &FinancialProfile,
        milestones: &[Milestone],
        config: &ProjectionConfig,
    ) -> Result<ProjectionResult> {
        for milestone in milestones.iter().filter(|m| m.trigger_year >= config.num_years) {
            log::warn!(
                "{} milestone '{}' triggers in year {}, beyond the {}-year horizon",
                milestone.kind,
                milestone.name,
                milestone.trigger_year,
                config.num_years
            );
        }

        let entities = self.builder.build(profile, milestones)?;
        let engine = ProjectionEngine::new(self.tax.clone(), config.clone());
        engine.project(&entities)
    }

    /// Project a single scenario, building its milestones from their specs
    pub fn run_scenario(&self, scenario: &Scenario, config: &ProjectionConfig) -> Result<ProjectionResult> {
        let milestones = self.builder.milestones(&scenario.profile, &scenario.milestones)?;
        self.run(&scenario.profile, &milestones, config)
    }

    /// Project several scenarios in parallel; results keep the input order
    pub fn run_scenarios(
        &self,
        scenarios: &[Scenario],
        config: &ProjectionConfig,
    ) -> Vec<(String, Result<ProjectionResult>)> {
        log::info!("Running {} scenarios over {} years", scenarios.len(), config.num_years);
        scenarios
            .par_iter()
            .map(|scenario| (scenario.name.clone(), self.run_scenario(scenario, config)))
            .collect()
    }

    /// Get reference to the profile builder for inspection
    pub fn builder(&self) -> &ProfileBuilder {
        &self.builder
    }

    pub fn tax_calculator(&self) -> &TaxCalculator {
        &self.tax
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectionError;
    use serde_json::json;

    fn scenario(name: &str, milestones: Vec<MilestoneSpec>) -> Scenario {
        Scenario {
            name: name.to_string(),
            profile: FinancialProfile::new("Denver, CO", "Registered Nurse"),
            milestones,
        }
    }

    #[test]
    fn test_compare_institutions() {
        let runner = ScenarioRunner::new();
        let config = ProjectionConfig { num_years: 20 };

        let school = |name: &str, cost: f64| {
            MilestoneSpec::new(
                "Education",
                1,
                json!({"institution": name, "annual_cost": cost, "program_years": 2, "salary_increase": 25000}),
            )
        };
        let scenarios = vec![
            scenario("baseline", vec![]),
            scenario("public", vec![school("Public University", 15_000.0)]),
            scenario("private", vec![school("Private College", 55_000.0)]),
        ];

        let results = runner.run_scenarios(&scenarios, &config);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "baseline");

        let summaries: Vec<_> = results
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().summary())
            .collect();

        // Same raise, cheaper tuition: more left at the end
        assert!(summaries[1].final_net_worth > summaries[2].final_net_worth);
        assert!(summaries[1].total_income > summaries[0].total_income);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let runner = ScenarioRunner::new();
        let config = ProjectionConfig { num_years: 15 };
        let scenarios = vec![
            scenario("home", vec![MilestoneSpec::new("Home", 3, json!({"home_price": 450000}))]),
            scenario("car", vec![MilestoneSpec::new("Car", 2, json!({"car_price": 28000}))]),
        ];

        let parallel = runner.run_scenarios(&scenarios, &config);
        for (scenario, (name, result)) in scenarios.iter().zip(parallel) {
            assert_eq!(&scenario.name, &name);
            let sequential = runner.run_scenario(scenario, &config).unwrap();
            assert_eq!(result.unwrap(), sequential);
        }
    }

    #[test]
    fn test_failures_stay_per_scenario() {
        let runner = ScenarioRunner::new();
        let config = ProjectionConfig::default();
        let scenarios = vec![
            scenario("ok", vec![]),
            scenario("bad", vec![MilestoneSpec::new("Lottery", 1, json!({}))]),
        ];

        let results = runner.run_scenarios(&scenarios, &config);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(ProjectionError::UnknownMilestoneType(_))));
    }

    #[test]
    fn test_runner_from_csv() {
        let runner = ScenarioRunner::from_csv().unwrap();
        let result = runner
            .run_scenario(&scenario("csv", vec![]), &ProjectionConfig { num_years: 5 })
            .unwrap();
        let builtin = ScenarioRunner::new()
            .run_scenario(&scenario("builtin", vec![]), &ProjectionConfig { num_years: 5 })
            .unwrap();
        assert_eq!(result, builtin);
    }

    #[test]
    fn test_scenario_deserialize() {
        let scenario: Scenario = serde_json::from_value(json!({
            "name": "starter home",
            "profile": {"location": "Phoenix, AZ", "occupation": "Teacher"},
            "milestones": [{"type": "Home Purchase", "trigger_year": 4, "params": {"home_price": 380000}}]
        }))
        .unwrap();
        assert_eq!(scenario.milestones.len(), 1);

        let result = ScenarioRunner::new()
            .run_scenario(&scenario, &ProjectionConfig { num_years: 6 })
            .unwrap();
        // 20% down on the purchase lands in the trigger year
        assert!(result.years[4].regular_expenses > 76_000);
        assert!(result.years[3].regular_expenses < 76_000);
    }
}
