//! Financial profiles: reference data and the entity-set builder

mod reference;
mod builder;
pub mod loader;

pub use reference::{LocationCosts, LocationData, ReferenceTables};
pub use builder::{EntitySet, FinancialProfile, ProfileBuilder, TaxProfile, BASELINE_VOLATILITY};
