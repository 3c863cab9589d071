//! Flight Plan - year-by-year personal financial projections
//!
//! This library provides:
//! - Federal, state and payroll tax computation
//! - Financial entities (assets, loans, income, expenses) with composable time gates
//! - Life milestones (marriage, home or car purchase, education, children, promotions)
//! - Profile building from cost-of-living and occupation reference tables
//! - The yearly projection engine and a parallel scenario runner

pub mod error;
pub mod tax;
pub mod entities;
pub mod milestone;
pub mod profile;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ErrorKind, ProjectionError, Result};
pub use tax::{FilingStatus, TaxBreakdown, TaxCalculator, TaxTables};
pub use milestone::{build_milestone, Milestone, MilestoneKind, MilestoneSpec};
pub use profile::{EntitySet, FinancialProfile, ProfileBuilder, ReferenceTables};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary, YearRow};
pub use scenario::{Scenario, ScenarioRunner};
