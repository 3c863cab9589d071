//! Time-window decorator for any entity
//!
//! `TimeGated<T>` wraps an entity and changes *when* its value applies,
//! delegating everything else (name, kind, category) to the inner entity.
//! Wrappers nest: tuition paid only during a program is
//! `TimeGated::rebased_from(TimeGated::active_until(tuition, years), start)`.

use super::{Asset, AssetKind, Expense, Income, Liability, LiabilityKind, ValuedOverYear};

#[derive(Debug, Clone, PartialEq)]
pub enum GatePolicy {
    /// Zero before the year, then the inner value unchanged
    ActiveFrom(u32),
    /// Zero before the year, then the inner value measured from that year
    /// (inflation, appreciation and amortization restart at the trigger)
    RebasedFrom(u32),
    /// Inner value before the year, zero from it onward
    ActiveUntil(u32),
    /// Inner value scaled by the factor of the most recent step at or before
    /// the year; unscaled before the first step. Sorted by year.
    ScaledFrom(Vec<(u32, f64)>),
}

impl GatePolicy {
    pub fn scaled_from(mut steps: Vec<(u32, f64)>) -> Self {
        steps.sort_by_key(|(year, _)| *year);
        GatePolicy::ScaledFrom(steps)
    }

    /// Evaluate `inner` for `year` under this policy
    pub fn apply(&self, year: u32, inner: impl Fn(u32) -> f64) -> f64 {
        match self {
            GatePolicy::ActiveFrom(start) => {
                if year < *start {
                    0.0
                } else {
                    inner(year)
                }
            }
            GatePolicy::RebasedFrom(start) => {
                if year < *start {
                    0.0
                } else {
                    inner(year - start)
                }
            }
            GatePolicy::ActiveUntil(end) => {
                if year >= *end {
                    0.0
                } else {
                    inner(year)
                }
            }
            GatePolicy::ScaledFrom(steps) => {
                match steps.iter().rev().find(|(step_year, _)| *step_year <= year) {
                    Some((_, factor)) => inner(year) * factor,
                    None => inner(year),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeGated<T> {
    inner: T,
    policy: GatePolicy,
}

impl<T> TimeGated<T> {
    pub fn new(inner: T, policy: GatePolicy) -> Self {
        Self { inner, policy }
    }

    pub fn active_from(inner: T, year: u32) -> Self {
        Self::new(inner, GatePolicy::ActiveFrom(year))
    }

    pub fn rebased_from(inner: T, year: u32) -> Self {
        Self::new(inner, GatePolicy::RebasedFrom(year))
    }

    pub fn active_until(inner: T, year: u32) -> Self {
        Self::new(inner, GatePolicy::ActiveUntil(year))
    }

    pub fn scaled_from(inner: T, steps: Vec<(u32, f64)>) -> Self {
        Self::new(inner, GatePolicy::scaled_from(steps))
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }
}

impl<T: ValuedOverYear> ValuedOverYear for TimeGated<T> {
    fn value_at(&self, year: u32) -> f64 {
        self.policy.apply(year, |y| self.inner.value_at(y))
    }
}

impl<T: Asset> Asset for TimeGated<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }
    fn kind(&self) -> AssetKind {
        self.inner.kind()
    }
}

impl<T: Liability> Liability for TimeGated<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }
    fn kind(&self) -> LiabilityKind {
        self.inner.kind()
    }
    fn annual_payment_at(&self, year: u32) -> f64 {
        self.policy.apply(year, |y| self.inner.annual_payment_at(y))
    }
}

impl<T: Income> Income for TimeGated<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<T: Expense> Expense for TimeGated<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }
    fn category(&self) -> String {
        self.inner.category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{FixedExpense, Home, Loan, OneTimeExpense};
    use approx::assert_relative_eq;

    #[test]
    fn test_active_from_passthrough() {
        let expense = TimeGated::active_from(FixedExpense::new("Gym", 1_000.0, 0.10), 3);
        assert_eq!(expense.value_at(2), 0.0);
        // Inflation counted from year 0, not from the trigger
        assert_relative_eq!(expense.value_at(3), 1_331.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rebased_from_inflates_from_trigger() {
        let expense = TimeGated::rebased_from(FixedExpense::new("Property Tax", 6_000.0, 0.02), 7);
        for year in 0..7 {
            assert_eq!(expense.value_at(year), 0.0);
        }
        assert_eq!(expense.value_at(7), 6_000.0);
        assert_relative_eq!(expense.value_at(8), 6_120.0, epsilon = 1e-9);
        assert_eq!(expense.category(), "Property Tax");
    }

    #[test]
    fn test_active_until_suppresses() {
        let rent = TimeGated::active_until(FixedExpense::new("Rent", 18_000.0, 0.02), 3);
        assert!(rent.value_at(2) > 0.0);
        assert_eq!(rent.value_at(3), 0.0);
        assert_eq!(rent.value_at(20), 0.0);
    }

    #[test]
    fn test_scaled_from_most_recent_step() {
        let transport = TimeGated::scaled_from(
            FixedExpense::new("Transportation", 10_000.0, 0.0),
            vec![(7, 0.2), (2, 0.2)],
        );
        assert_eq!(transport.value_at(1), 10_000.0);
        assert_relative_eq!(transport.value_at(2), 2_000.0, epsilon = 1e-9);
        assert_relative_eq!(transport.value_at(6), 2_000.0, epsilon = 1e-9);
        assert_relative_eq!(transport.value_at(7), 2_000.0, epsilon = 1e-9);
        assert_relative_eq!(transport.value_at(30), 2_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rebased_asset_and_liability() {
        let home = TimeGated::rebased_from(Home::new("Home", 400_000.0, 0.03), 3);
        assert_eq!(home.value_at(2), 0.0);
        assert_eq!(home.value_at(3), 400_000.0);
        assert_relative_eq!(home.value_at(4), 412_000.0, epsilon = 1e-6);
        assert_eq!(home.breakdown_key(), "Home:Home");

        let loan = Loan::new("Car Loan", 20_000.0, 0.06, 5).unwrap();
        let gated = TimeGated::rebased_from(loan.clone(), 4);
        assert_eq!(gated.value_at(3), 0.0);
        assert_eq!(gated.annual_payment_at(3), 0.0);
        assert_relative_eq!(gated.value_at(4), 20_000.0, max_relative = 1e-9);
        assert_relative_eq!(gated.value_at(6), loan.balance_at(2), max_relative = 1e-12);
        assert_eq!(gated.value_at(9), 0.0);
        assert_eq!(gated.annual_payment_at(9), 0.0);
    }

    #[test]
    fn test_nested_window() {
        let tuition = TimeGated::rebased_from(
            TimeGated::active_until(FixedExpense::new("Tuition", 20_000.0, 0.0), 2),
            5,
        );
        let values: Vec<f64> = (0..10).map(|y| tuition.value_at(y)).collect();
        assert_eq!(values, vec![0.0, 0.0, 0.0, 0.0, 0.0, 20_000.0, 20_000.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_one_time_rebased_lands_on_trigger() {
        let down = TimeGated::rebased_from(OneTimeExpense::new("Down Payment", "Home Purchase", 80_000.0, 0), 3);
        assert_eq!(down.value_at(2), 0.0);
        assert_eq!(down.value_at(3), 80_000.0);
        assert_eq!(down.value_at(4), 0.0);
        assert_eq!(down.category(), "One-time: Home Purchase");
    }
}
