//! Life-event milestones and the financial effects they introduce
//!
//! A milestone is built once from its kind-specific parameters and never
//! changes afterwards. Its entities are expressed relative to the trigger:
//! year 0 of every entity is the trigger year. The profile builder shifts
//! them onto the projection timeline.

mod params;
mod factory;

pub use params::{
    CarPurchaseParams, ChildParams, CustomParams, EducationParams, HomePurchaseParams, MarriageParams,
    PromotionParams,
};
pub use factory::{build_milestone, MilestoneSpec};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{SharedAsset, SharedExpense, SharedIncome, SharedLiability};
use crate::error::ProjectionError;
use crate::tax::FilingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MilestoneKind {
    Marriage,
    HomePurchase,
    Education,
    CarPurchase,
    Child,
    Promotion,
    Custom,
}

impl MilestoneKind {
    pub const ALL: [MilestoneKind; 7] = [
        MilestoneKind::Marriage,
        MilestoneKind::HomePurchase,
        MilestoneKind::Education,
        MilestoneKind::CarPurchase,
        MilestoneKind::Child,
        MilestoneKind::Promotion,
        MilestoneKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneKind::Marriage => "Marriage",
            MilestoneKind::HomePurchase => "Home Purchase",
            MilestoneKind::Education => "Education",
            MilestoneKind::CarPurchase => "Car Purchase",
            MilestoneKind::Child => "Child",
            MilestoneKind::Promotion => "Promotion",
            MilestoneKind::Custom => "Custom",
        }
    }

    /// Parse a milestone type name; short aliases are accepted
    pub fn parse(raw: &str) -> crate::error::Result<Self> {
        match raw.trim() {
            "Marriage" => Ok(MilestoneKind::Marriage),
            "Home Purchase" | "Home" => Ok(MilestoneKind::HomePurchase),
            "Education" | "Graduate School" => Ok(MilestoneKind::Education),
            "Car Purchase" | "Car" => Ok(MilestoneKind::CarPurchase),
            "Child" => Ok(MilestoneKind::Child),
            "Promotion" => Ok(MilestoneKind::Promotion),
            "Custom" => Ok(MilestoneKind::Custom),
            other => Err(ProjectionError::UnknownMilestoneType(other.to_string())),
        }
    }

    /// Fixed interaction rules this kind imposes on baseline expenses
    pub fn expense_rules(&self) -> &'static [ExpenseAdjustment] {
        EXPENSE_RULES
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, rules)| *rules)
            .unwrap_or(&[])
    }
}

impl fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilestoneKind {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Which baseline expense a rule applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpenseTarget {
    /// The baseline expense with this name
    Named(&'static str),
    /// Every baseline cost-of-living expense
    Baseline,
}

impl ExpenseTarget {
    pub fn matches(&self, expense_name: &str) -> bool {
        match self {
            ExpenseTarget::Named(name) => *name == expense_name,
            ExpenseTarget::Baseline => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpenseEffect {
    /// Zero from the trigger year onward
    Suppress,
    /// Multiplied by the factor from the trigger year onward
    Scale(f64),
}

/// Effect a milestone has on a baseline expense from its trigger year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseAdjustment {
    pub target: ExpenseTarget,
    pub effect: ExpenseEffect,
}

impl ExpenseAdjustment {
    pub const fn new(target: ExpenseTarget, effect: ExpenseEffect) -> Self {
        Self { target, effect }
    }
}

/// Share of baseline transportation still spent once a car is owned
pub const CAR_TRANSPORTATION_FACTOR: f64 = 0.2;

const EXPENSE_RULES: &[(MilestoneKind, &[ExpenseAdjustment])] = &[
    (
        MilestoneKind::HomePurchase,
        &[ExpenseAdjustment::new(ExpenseTarget::Named("Rent"), ExpenseEffect::Suppress)],
    ),
    (
        MilestoneKind::CarPurchase,
        &[ExpenseAdjustment::new(
            ExpenseTarget::Named("Transportation"),
            ExpenseEffect::Scale(CAR_TRANSPORTATION_FACTOR),
        )],
    ),
];

/// A life event and the entities it adds, in trigger-relative time
#[derive(Debug, Clone)]
pub struct Milestone {
    pub name: String,
    pub kind: MilestoneKind,
    pub trigger_year: u32,
    pub assets: Vec<SharedAsset>,
    pub liabilities: Vec<SharedLiability>,
    pub recurring_expenses: Vec<SharedExpense>,
    pub one_time_expenses: Vec<SharedExpense>,
    pub income_adjustments: Vec<SharedIncome>,
    pub expense_adjustments: Vec<ExpenseAdjustment>,
    /// Filing status that applies from the trigger year, if the event changes it
    pub filing_status: Option<FilingStatus>,
}

impl Milestone {
    /// Empty milestone carrying the fixed expense rules of its kind
    pub fn new(kind: MilestoneKind, name: impl Into<String>, trigger_year: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            trigger_year,
            assets: Vec::new(),
            liabilities: Vec::new(),
            recurring_expenses: Vec::new(),
            one_time_expenses: Vec::new(),
            income_adjustments: Vec::new(),
            expense_adjustments: kind.expense_rules().to_vec(),
            filing_status: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
            && self.liabilities.is_empty()
            && self.recurring_expenses.is_empty()
            && self.one_time_expenses.is_empty()
            && self.income_adjustments.is_empty()
            && self.expense_adjustments.is_empty()
            && self.filing_status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds_and_aliases() {
        for kind in MilestoneKind::ALL {
            assert_eq!(MilestoneKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(MilestoneKind::parse("Home").unwrap(), MilestoneKind::HomePurchase);
        assert_eq!(MilestoneKind::parse("Graduate School").unwrap(), MilestoneKind::Education);
        assert_eq!("Car".parse::<MilestoneKind>().unwrap(), MilestoneKind::CarPurchase);
    }

    #[test]
    fn test_unknown_kind() {
        let err = MilestoneKind::parse("Lottery Win").unwrap_err();
        assert!(matches!(err, ProjectionError::UnknownMilestoneType(ref t) if t == "Lottery Win"));
    }

    #[test]
    fn test_rule_table() {
        let rules = MilestoneKind::HomePurchase.expense_rules();
        assert_eq!(rules.len(), 1);
        assert!(rules[0].target.matches("Rent"));
        assert_eq!(rules[0].effect, ExpenseEffect::Suppress);

        let rules = MilestoneKind::CarPurchase.expense_rules();
        assert!(rules[0].target.matches("Transportation"));
        assert!(!rules[0].target.matches("Rent"));

        assert!(MilestoneKind::Child.expense_rules().is_empty());
        assert!(Milestone::new(MilestoneKind::Promotion, "Promotion", 2).is_empty());
    }
}
