//! Projection engine: year-by-year income, tax, spending and balance sheet

mod state;
mod engine;
mod cashflows;

pub use state::{ContributionLedger, ProjectionState};
pub use engine::{ProjectionConfig, ProjectionEngine};
pub use cashflows::{ProjectionResult, ProjectionSummary, SeriesRow, YearRow, TAX_CATEGORY, TAX_TYPES};
