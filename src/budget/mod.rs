//! Per-category limits, the trip budget, and forecasting over the ledger.

mod forecast;

pub use forecast::{Forecast, TrendEstimate};

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Category, ExpenseLedger};

/// Trip days assumed until the user sets their own.
pub const DEFAULT_TRIP_DAYS: u32 = 6;

/// Longest trip accepted, ten years.
pub const MAX_TRIP_DAYS: u32 = 3650;

/// Whole-trip budget used for the remaining-budget and forecast figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripBudget {
    pub total_budget: Decimal,
    pub total_days: u32,
}

impl TripBudget {
    /// Builds a budget, clamping the total to zero and the days to `1..=MAX_TRIP_DAYS`.
    pub fn new(total_budget: Decimal, total_days: u32) -> Self {
        Self {
            total_budget: total_budget.max(Decimal::ZERO),
            total_days: total_days.clamp(1, MAX_TRIP_DAYS),
        }
    }

    /// A zero total means the user has not set a budget yet.
    pub fn is_set(&self) -> bool {
        self.total_budget > Decimal::ZERO
    }
}

impl Default for TripBudget {
    fn default() -> Self {
        Self::new(Decimal::ZERO, DEFAULT_TRIP_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStanding {
    Within,
    Exceeded,
}

impl BudgetStanding {
    pub fn from_remaining(remaining: Decimal) -> Self {
        if remaining < Decimal::ZERO {
            BudgetStanding::Exceeded
        } else {
            BudgetStanding::Within
        }
    }
}

/// A category whose spend went past its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverBudget {
    pub category: Category,
    pub spent: Decimal,
    pub limit: Decimal,
}

/// Holds per-category ceilings and evaluates the ledger against them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetEvaluator {
    limits: BTreeMap<Category, Decimal>,
}

impl BudgetEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the ceiling for `category`. Zero (or less) clears it.
    pub fn set_limit(&mut self, category: Category, limit: Decimal) {
        self.limits.insert(category, limit.max(Decimal::ZERO));
    }

    pub fn limit(&self, category: Category) -> Decimal {
        self.limits.get(&category).copied().unwrap_or_default()
    }

    /// Every category with its ceiling, in display order.
    pub fn limits(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        Category::ALL
            .iter()
            .map(move |category| (*category, self.limit(*category)))
    }

    pub fn check_over_budget(&self, ledger: &ExpenseLedger) -> Vec<OverBudget> {
        self.limits()
            .filter(|(_, limit)| *limit > Decimal::ZERO)
            .filter_map(|(category, limit)| {
                let spent = ledger.spent_by_category(category);
                (spent > limit).then_some(OverBudget {
                    category,
                    spent,
                    limit,
                })
            })
            .collect()
    }

    /// Budget left for the trip; negative once overspent.
    pub fn remaining_budget(trip: &TripBudget, total_spent: Decimal) -> Decimal {
        trip.total_budget.saturating_sub(total_spent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn later_limits_replace_earlier_ones() {
        let mut evaluator = BudgetEvaluator::new();
        evaluator.set_limit(Category::Food, dec!(700));
        evaluator.set_limit(Category::Food, dec!(250));
        assert_eq!(evaluator.limit(Category::Food), dec!(250));
        assert_eq!(evaluator.limit(Category::Hotel), Decimal::ZERO);
        assert_eq!(evaluator.limits().count(), Category::ALL.len());
    }

    #[test]
    fn spend_equal_to_limit_is_not_flagged() {
        let mut ledger = ExpenseLedger::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        ledger
            .add_entry(date, Category::Transport, dec!(90), "Grab", dec!(300))
            .expect("add");
        let mut evaluator = BudgetEvaluator::new();
        evaluator.set_limit(Category::Transport, dec!(90));
        assert!(evaluator.check_over_budget(&ledger).is_empty());
    }

    #[test]
    fn negative_limits_are_cleared() {
        let mut evaluator = BudgetEvaluator::new();
        evaluator.set_limit(Category::Hotel, dec!(-5));
        assert_eq!(evaluator.limit(Category::Hotel), Decimal::ZERO);
    }

    #[test]
    fn trip_budget_clamps_inputs() {
        let trip = TripBudget::new(dec!(-100), 0);
        assert_eq!(trip.total_budget, Decimal::ZERO);
        assert_eq!(trip.total_days, 1);
        assert!(!trip.is_set());
        assert_eq!(TripBudget::default().total_days, DEFAULT_TRIP_DAYS);
        assert_eq!(TripBudget::new(dec!(100), u32::MAX).total_days, MAX_TRIP_DAYS);
    }
}
