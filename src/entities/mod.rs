//! Financial entities: assets, liabilities, income streams and expenses
//!
//! Every entity exposes one per-year value through [`ValuedOverYear`]; the
//! capability traits add identity (name, kind) on top. Entities are immutable
//! once built, so they are shared as `Arc<dyn ...>` between milestones, the
//! profile builder and the projection engine.
//!
//! Time windows are added by composition with [`TimeGated`] rather than by
//! specialising each entity type.

mod asset;
mod liability;
mod income;
mod expense;
mod gated;

pub use asset::{AssetKind, DepreciableAsset, Home, Investment};
pub use liability::{LiabilityKind, Loan, MAX_TERM_YEARS};
pub use income::{IncomeStream, Salary};
pub use expense::{FixedExpense, LoanPayment, OneTimeExpense, VariableExpense};
pub use gated::{GatePolicy, TimeGated};

use std::fmt::Debug;
use std::sync::Arc;

/// Default annual growth for salaries and other income
pub const DEFAULT_INCOME_GROWTH: f64 = 0.03;
/// Default annual inflation for expenses
pub const DEFAULT_INFLATION: f64 = 0.02;
/// Default annual return on invested balances
pub const DEFAULT_RETURN_RATE: f64 = 0.07;

/// A quantity that can be evaluated for any projection year
pub trait ValuedOverYear {
    fn value_at(&self, year: u32) -> f64;
}

/// Something owned; `value_at` is its market value
pub trait Asset: ValuedOverYear + Debug + Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> AssetKind;

    /// Row label in the per-asset breakdown
    fn breakdown_key(&self) -> String {
        format!("{}:{}", self.kind(), self.name())
    }
}

/// Something owed; `value_at` is the outstanding balance
pub trait Liability: ValuedOverYear + Debug + Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> LiabilityKind;

    /// Total payments due during `year` (0 once paid off)
    fn annual_payment_at(&self, year: u32) -> f64;

    fn breakdown_key(&self) -> String {
        format!("{}:{}", self.kind(), self.name())
    }
}

/// A source of income; `value_at` is the gross amount for the year
pub trait Income: ValuedOverYear + Debug + Send + Sync {
    fn name(&self) -> &str;
}

/// A cost; `value_at` is the amount spent during the year
pub trait Expense: ValuedOverYear + Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Category label used when aggregating expenses
    fn category(&self) -> String {
        self.name().to_string()
    }
}

impl<T: ValuedOverYear + ?Sized> ValuedOverYear for Arc<T> {
    fn value_at(&self, year: u32) -> f64 {
        (**self).value_at(year)
    }
}

impl<T: Asset + ?Sized> Asset for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn kind(&self) -> AssetKind {
        (**self).kind()
    }
}

impl<T: Liability + ?Sized> Liability for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn kind(&self) -> LiabilityKind {
        (**self).kind()
    }
    fn annual_payment_at(&self, year: u32) -> f64 {
        (**self).annual_payment_at(year)
    }
}

impl<T: Income + ?Sized> Income for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Expense + ?Sized> Expense for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn category(&self) -> String {
        (**self).category()
    }
}

pub type SharedAsset = Arc<dyn Asset>;
pub type SharedLiability = Arc<dyn Liability>;
pub type SharedIncome = Arc<dyn Income>;
pub type SharedExpense = Arc<dyn Expense>;
