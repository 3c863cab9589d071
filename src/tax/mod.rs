//! Income and payroll tax: bracket tables, loaders and the calculator

mod tables;
mod calculator;
pub mod loader;

pub use tables::{FilingStatus, TaxBracket, TaxTables, FEDERAL_JOINT_2024, FEDERAL_SINGLE_2024};
pub use calculator::{city_to_state, TaxBreakdown, TaxCalculator};
