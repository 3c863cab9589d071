//! Amortizing loans

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Liability, ValuedOverYear};
use crate::error::{ProjectionError, Result};

/// Default mortgage term in years
pub const MORTGAGE_TERM_YEARS: u32 = 30;
/// Longest loan term accepted
pub const MAX_TERM_YEARS: u32 = 100;
/// Monthly rates below this amortize linearly; `(1 + r)^n` is 1 in f64
const LINEAR_RATE_THRESHOLD: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiabilityKind {
    Loan,
}

impl fmt::Display for LiabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiabilityKind::Loan => f.write_str("Loan"),
        }
    }
}

/// Fixed-rate loan with level monthly payments
///
/// Annual inputs are converted to monthly compounding: `r = rate / 12`,
/// `n = term_years * 12`.
#[derive(Debug, Clone)]
pub struct Loan {
    pub name: String,
    pub principal: f64,
    pub interest_rate: f64,
    pub term_years: u32,
}

impl Loan {
    pub fn new(name: impl Into<String>, principal: f64, interest_rate: f64, term_years: u32) -> Result<Self> {
        let name = name.into();
        if !principal.is_finite() || principal < 0.0 {
            return Err(ProjectionError::InvalidInput(format!(
                "{}: principal must be a non-negative amount, got {}",
                name, principal
            )));
        }
        if !interest_rate.is_finite() || interest_rate < 0.0 {
            return Err(ProjectionError::InvalidInput(format!(
                "{}: interest rate must be non-negative, got {}",
                name, interest_rate
            )));
        }
        if term_years == 0 || term_years > MAX_TERM_YEARS {
            return Err(ProjectionError::InvalidInput(format!(
                "{}: term must be between 1 and {} years, got {}",
                name, MAX_TERM_YEARS, term_years
            )));
        }

        Ok(Self {
            name,
            principal,
            interest_rate,
            term_years,
        })
    }

    /// A loan named "Mortgage" with the standard 30-year term
    pub fn mortgage(principal: f64, interest_rate: f64) -> Result<Self> {
        Self::new("Mortgage", principal, interest_rate, MORTGAGE_TERM_YEARS)
    }

    fn monthly_rate(&self) -> f64 {
        self.interest_rate / 12.0
    }

    fn num_payments(&self) -> f64 {
        f64::from(self.term_years) * 12.0
    }

    fn is_linear(&self) -> bool {
        self.monthly_rate() < LINEAR_RATE_THRESHOLD
    }

    /// Level monthly payment; linear amortization when the rate is zero
    pub fn monthly_payment(&self) -> f64 {
        let n = self.num_payments();
        let r = self.monthly_rate();
        if self.is_linear() {
            return self.principal / n;
        }
        let growth = (1.0 + r).powf(n);
        self.principal * r * growth / (growth - 1.0)
    }

    /// Outstanding balance at the start of `year`: the present value of the
    /// remaining payments, exactly 0 once the term has elapsed
    pub fn balance_at(&self, year: u32) -> f64 {
        if year >= self.term_years {
            return 0.0;
        }

        let payment = self.monthly_payment();
        let r = self.monthly_rate();
        if self.is_linear() {
            return self.principal - f64::from(year) * 12.0 * payment;
        }

        let remaining = f64::from(self.term_years - year) * 12.0;
        payment * (1.0 - (1.0 + r).powf(-remaining)) / r
    }
}

impl ValuedOverYear for Loan {
    fn value_at(&self, year: u32) -> f64 {
        self.balance_at(year)
    }
}

impl Liability for Loan {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> LiabilityKind {
        LiabilityKind::Loan
    }

    fn annual_payment_at(&self, year: u32) -> f64 {
        if year >= self.term_years {
            0.0
        } else {
            self.monthly_payment() * 12.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_standard_mortgage_payment() {
        let loan = Loan::mortgage(240_000.0, 0.05).unwrap();
        assert_abs_diff_eq!(loan.monthly_payment(), 1_288.37, epsilon = 0.01);
        assert_abs_diff_eq!(loan.annual_payment_at(0), 15_460.45, epsilon = 0.1);
    }

    #[test]
    fn test_mortgage_balance_midway() {
        let loan = Loan::mortgage(240_000.0, 0.05).unwrap();

        // Closed-form remaining balance after 180 of 360 payments
        let r: f64 = 0.05 / 12.0;
        let expected = 240_000.0 * ((1.0 + r).powi(360) - (1.0 + r).powi(180)) / ((1.0 + r).powi(360) - 1.0);
        let balance = loan.balance_at(15);

        assert_relative_eq!(balance, expected, max_relative = 1e-9);
        let fraction = balance / 240_000.0;
        assert!(fraction > 0.65 && fraction < 0.70, "fraction = {}", fraction);
    }

    #[test]
    fn test_balance_starts_at_principal_and_decreases() {
        let loan = Loan::new("Car Loan", 25_000.0, 0.07, 5).unwrap();
        assert_relative_eq!(loan.balance_at(0), 25_000.0, max_relative = 1e-9);

        for year in 0..loan.term_years - 1 {
            assert!(loan.balance_at(year) > loan.balance_at(year + 1));
        }
        assert_eq!(loan.balance_at(5), 0.0);
        assert_eq!(loan.balance_at(40), 0.0);
    }

    #[test]
    fn test_zero_rate_linear_amortization() {
        let loan = Loan::new("Family Loan", 12_000.0, 0.0, 4).unwrap();
        let monthly = 12_000.0 / 48.0;

        assert_eq!(loan.monthly_payment(), monthly);
        for year in 0..4 {
            let expected = 12_000.0 - (year * 12) as f64 * monthly;
            assert_abs_diff_eq!(loan.balance_at(year), expected, epsilon = 1e-9);
        }
        assert_eq!(loan.balance_at(4), 0.0);
    }

    #[test]
    fn test_tiny_rate_amortizes_linearly() {
        let loan = Loan::new("Tiny", 100_000.0, 1e-17, 30).unwrap();
        let monthly = 100_000.0 / 360.0;

        assert_abs_diff_eq!(loan.monthly_payment(), monthly, epsilon = 1e-9);
        assert_abs_diff_eq!(loan.balance_at(0), 100_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(loan.balance_at(15), 50_000.0, epsilon = 1e-6);
        for year in 0..31 {
            assert!(loan.balance_at(year).is_finite());
            assert!(loan.annual_payment_at(year).is_finite());
        }
    }

    #[test]
    fn test_longest_term_is_finite() {
        let loan = Loan::new("Century", 500_000.0, 0.04, MAX_TERM_YEARS).unwrap();
        assert!(loan.monthly_payment().is_finite());
        assert!(loan.balance_at(0).is_finite());
        assert_eq!(loan.balance_at(MAX_TERM_YEARS), 0.0);
    }

    #[test]
    fn test_payments_stop_after_term() {
        let loan = Loan::new("Student Loan", 40_000.0, 0.055, 10).unwrap();
        assert!(loan.annual_payment_at(9) > 0.0);
        assert_eq!(loan.annual_payment_at(10), 0.0);
    }

    #[test]
    fn test_invalid_loans_rejected() {
        assert!(Loan::new("Bad", -1.0, 0.05, 10).is_err());
        assert!(Loan::new("Bad", 1_000.0, -0.01, 10).is_err());
        assert!(Loan::new("Bad", 1_000.0, 0.05, 0).is_err());
        assert!(Loan::new("Bad", 1_000.0, 0.05, MAX_TERM_YEARS + 1).is_err());
        assert!(Loan::new("Bad", 1_000.0, 0.05, 400_000_000).is_err());
        assert!(Loan::new("Bad", f64::NAN, 0.05, 10).is_err());
    }
}
