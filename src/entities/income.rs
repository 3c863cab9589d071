//! Income streams

use super::{Income, ValuedOverYear};

/// Income growing geometrically from its starting amount
#[derive(Debug, Clone)]
pub struct IncomeStream {
    pub name: String,
    pub annual_amount: f64,
    pub growth_rate: f64,
}

impl IncomeStream {
    pub fn new(name: impl Into<String>, annual_amount: f64, growth_rate: f64) -> Self {
        Self {
            name: name.into(),
            annual_amount,
            growth_rate,
        }
    }
}

impl ValuedOverYear for IncomeStream {
    fn value_at(&self, year: u32) -> f64 {
        self.annual_amount * (1.0 + self.growth_rate).powi(year as i32)
    }
}

impl Income for IncomeStream {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Wage income scaled by a cost-of-living location factor
#[derive(Debug, Clone)]
pub struct Salary {
    pub base: IncomeStream,
    pub location_adjustment: f64,
}

impl Salary {
    pub fn new(name: impl Into<String>, annual_amount: f64, growth_rate: f64, location_adjustment: f64) -> Self {
        Self {
            base: IncomeStream::new(name, annual_amount, growth_rate),
            location_adjustment,
        }
    }
}

impl ValuedOverYear for Salary {
    fn value_at(&self, year: u32) -> f64 {
        self.base.value_at(year) * self.location_adjustment
    }
}

impl Income for Salary {
    fn name(&self) -> &str {
        &self.base.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_income_growth() {
        let income = IncomeStream::new("Royalties", 10_000.0, 0.03);
        assert_eq!(income.value_at(0), 10_000.0);
        assert_relative_eq!(income.value_at(2), 10_609.0, epsilon = 1e-9);
    }

    #[test]
    fn test_salary_location_adjustment() {
        let salary = Salary::new("Salary", 80_000.0, 0.03, 1.25);
        assert_relative_eq!(salary.value_at(0), 100_000.0, epsilon = 1e-9);
        assert_relative_eq!(salary.value_at(1), 103_000.0, epsilon = 1e-9);
        assert_eq!(salary.name(), "Salary");
    }
}
