//! Per-run projection state carried from one year to the next

use crate::entities::Investment;

/// Cash flow reinvested into the savings account, year by year
///
/// The balance is rolled forward once per recorded year, so each year costs
/// O(1) no matter how long the history is. Years must be recorded in order.
#[derive(Debug, Clone)]
pub struct ContributionLedger {
    contributions: Vec<f64>,
    balance: f64,
}

impl ContributionLedger {
    pub fn new(account: &Investment) -> Self {
        Self {
            contributions: Vec::new(),
            balance: account.initial_value,
        }
    }

    /// Record the next year's contribution and return the end-of-year balance
    pub fn record(&mut self, account: &Investment, contribution: f64) -> f64 {
        self.contributions.push(contribution);
        self.balance = account.roll_forward(self.balance, contribution);
        self.balance
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn contributions(&self) -> &[f64] {
        &self.contributions
    }

    pub fn years_recorded(&self) -> u32 {
        self.contributions.len() as u32
    }
}

/// State of a projection between years
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Year about to be projected (0-indexed)
    pub year: u32,

    /// Savings contributions recorded so far
    pub ledger: ContributionLedger,
}

impl ProjectionState {
    /// Initialize state at projection start
    pub fn new(savings: &Investment) -> Self {
        Self {
            year: 0,
            ledger: ContributionLedger::new(savings),
        }
    }

    /// Advance to next year
    pub fn advance_year(&mut self) {
        self.year += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ledger_matches_full_recompute() {
        let savings = Investment::savings(1_000.0, 0.07);
        let mut ledger = ContributionLedger::new(&savings);

        for (year, contribution) in [5_000.0, -2_000.0, 12_500.0, 0.0, 7_300.0].into_iter().enumerate() {
            let balance = ledger.record(&savings, contribution);
            assert_relative_eq!(
                balance,
                savings.value_with_contributions(year as u32, ledger.contributions()),
                max_relative = 1e-12
            );
        }
        assert_eq!(ledger.years_recorded(), 5);
    }

    #[test]
    fn test_ledger_allows_negative_balance() {
        let savings = Investment::savings(0.0, 0.05);
        let mut ledger = ContributionLedger::new(&savings);
        let balance = ledger.record(&savings, -10_000.0);
        assert_relative_eq!(balance, -10_500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_state_advance() {
        let mut state = ProjectionState::new(&Investment::savings(250.0, 0.07));
        assert_eq!(state.year, 0);
        assert_eq!(state.ledger.balance(), 250.0);
        state.advance_year();
        assert_eq!(state.year, 1);
    }
}
