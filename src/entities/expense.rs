//! Expense variants

use super::{Expense, Liability, Loan, ValuedOverYear};

/// Expense inflating geometrically from its starting amount
#[derive(Debug, Clone)]
pub struct FixedExpense {
    pub name: String,
    pub annual_amount: f64,
    pub inflation_rate: f64,
}

impl FixedExpense {
    pub fn new(name: impl Into<String>, annual_amount: f64, inflation_rate: f64) -> Self {
        Self {
            name: name.into(),
            annual_amount,
            inflation_rate,
        }
    }
}

impl ValuedOverYear for FixedExpense {
    fn value_at(&self, year: u32) -> f64 {
        self.annual_amount * (1.0 + self.inflation_rate).powi(year as i32)
    }
}

impl Expense for FixedExpense {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Inflating expense carrying a volatility surcharge on top
#[derive(Debug, Clone)]
pub struct VariableExpense {
    pub base: FixedExpense,
    /// Surcharge fraction, e.g. 0.1 adds 10%
    pub volatility: f64,
}

impl VariableExpense {
    pub fn new(name: impl Into<String>, annual_amount: f64, inflation_rate: f64, volatility: f64) -> Self {
        Self {
            base: FixedExpense::new(name, annual_amount, inflation_rate),
            volatility,
        }
    }
}

impl ValuedOverYear for VariableExpense {
    fn value_at(&self, year: u32) -> f64 {
        self.base.value_at(year) * (1.0 + self.volatility)
    }
}

impl Expense for VariableExpense {
    fn name(&self) -> &str {
        &self.base.name
    }
}

/// Lump sum paid in exactly one year
#[derive(Debug, Clone)]
pub struct OneTimeExpense {
    pub name: String,
    /// Milestone the payment belongs to, used for the category label
    pub milestone: String,
    pub amount: f64,
    pub year: u32,
}

impl OneTimeExpense {
    pub fn new(name: impl Into<String>, milestone: impl Into<String>, amount: f64, year: u32) -> Self {
        Self {
            name: name.into(),
            milestone: milestone.into(),
            amount,
            year,
        }
    }
}

impl ValuedOverYear for OneTimeExpense {
    fn value_at(&self, year: u32) -> f64 {
        if year == self.year {
            self.amount
        } else {
            0.0
        }
    }
}

impl Expense for OneTimeExpense {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> String {
        format!("One-time: {}", self.milestone)
    }
}

/// Scheduled payments on a loan, as a cash expense
#[derive(Debug, Clone)]
pub struct LoanPayment {
    pub name: String,
    pub loan: Loan,
}

impl LoanPayment {
    pub fn new(name: impl Into<String>, loan: Loan) -> Self {
        Self {
            name: name.into(),
            loan,
        }
    }
}

impl ValuedOverYear for LoanPayment {
    fn value_at(&self, year: u32) -> f64 {
        self.loan.annual_payment_at(year)
    }
}

impl Expense for LoanPayment {
    fn name(&self) -> &str {
        &self.name
    }
}
