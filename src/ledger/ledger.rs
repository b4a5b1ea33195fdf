use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::LedgerError;

use super::{category::Category, entry::ExpenseEntry};

/// Append-only collection of the session's expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseLedger {
    entries: Vec<ExpenseEntry>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an expense and returns its 1-based position.
    pub fn add_entry(
        &mut self,
        date: NaiveDate,
        category: Category,
        amount_primary: Decimal,
        description: impl Into<String>,
        rate: Decimal,
    ) -> Result<usize, LedgerError> {
        let entry = ExpenseEntry::new(date, category, amount_primary, description, rate)?;
        self.extend([entry])?;
        debug!(%date, %category, amount = %amount_primary, "Recorded expense");
        Ok(self.entries.len())
    }

    /// Appends entries recorded elsewhere, keeping their converted amounts.
    ///
    /// All or nothing: entries are admitted only while both totals stay representable.
    pub fn extend(
        &mut self,
        entries: impl IntoIterator<Item = ExpenseEntry>,
    ) -> Result<(), LedgerError> {
        let incoming: Vec<ExpenseEntry> = entries.into_iter().collect();
        let mut primary = self.total_spent();
        let mut secondary = self.total_secondary();
        for entry in &incoming {
            entry.validate()?;
            primary = primary
                .checked_add(entry.amount_primary())
                .ok_or(LedgerError::AmountOutOfRange(entry.amount_primary()))?;
            secondary = secondary
                .checked_add(entry.amount_secondary())
                .ok_or(LedgerError::AmountOutOfRange(entry.amount_secondary()))?;
        }
        self.entries.extend(incoming);
        Ok(())
    }

    pub fn entries(&self) -> &[ExpenseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_spent(&self) -> Decimal {
        sum(self.entries.iter().map(ExpenseEntry::amount_primary))
    }

    pub fn total_secondary(&self) -> Decimal {
        sum(self.entries.iter().map(ExpenseEntry::amount_secondary))
    }

    pub fn spent_by_category(&self, category: Category) -> Decimal {
        sum(self
            .entries
            .iter()
            .filter(|entry| entry.category() == category)
            .map(ExpenseEntry::amount_primary))
    }

    /// Spend per category for all categories, in display order.
    pub fn category_breakdown(&self) -> Vec<(Category, Decimal)> {
        Category::ALL
            .iter()
            .map(|category| (*category, self.spent_by_category(*category)))
            .collect()
    }

    /// Daily totals, oldest date first.
    pub fn spent_by_date(&self) -> Vec<(NaiveDate, Decimal)> {
        let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for entry in &self.entries {
            let total = totals.entry(entry.date()).or_default();
            *total = total.saturating_add(entry.amount_primary());
        }
        totals.into_iter().collect()
    }

    pub fn distinct_date_count(&self) -> usize {
        self.entries
            .iter()
            .map(ExpenseEntry::date)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Non-negative amounts whose total is known to fit; saturates instead of panicking.
fn sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Percentage of `total` taken by `part`, or `None` when nothing was spent.
pub fn share_of_total(part: Decimal, total: Decimal) -> Option<Decimal> {
    if total.is_zero() {
        return None;
    }
    let share = part.checked_div(total)?.checked_mul(Decimal::ONE_HUNDRED)?;
    Some(share.round_dp(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    #[test]
    fn groups_daily_totals_in_date_order() {
        let mut ledger = ExpenseLedger::new();
        ledger
            .add_entry(day(3), Category::Food, dec!(40), "", dec!(300))
            .expect("add");
        ledger
            .add_entry(day(1), Category::Hotel, dec!(100), "", dec!(300))
            .expect("add");
        ledger
            .add_entry(day(3), Category::Transport, dec!(10), "", dec!(300))
            .expect("add");

        assert_eq!(
            ledger.spent_by_date(),
            vec![(day(1), dec!(100)), (day(3), dec!(50))]
        );
        assert_eq!(ledger.distinct_date_count(), 2);
    }

    #[test]
    fn breakdown_covers_every_category() {
        let mut ledger = ExpenseLedger::new();
        let position = ledger
            .add_entry(day(1), Category::Shopping, dec!(25), "Hat", dec!(300))
            .expect("add");
        assert_eq!(position, 1);

        let breakdown = ledger.category_breakdown();
        assert_eq!(breakdown.len(), Category::ALL.len());
        assert!(breakdown.contains(&(Category::Shopping, dec!(25))));
        assert_eq!(share_of_total(dec!(25), ledger.total_spent()), Some(dec!(100)));
        assert_eq!(share_of_total(dec!(1), Decimal::ZERO), None);
    }

    #[test]
    fn totals_that_would_overflow_are_refused() {
        let half = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let mut ledger = ExpenseLedger::new();
        ledger
            .add_entry(day(1), Category::Hotel, half, "", Decimal::ONE)
            .expect("first half fits");
        let err = ledger
            .add_entry(day(2), Category::Hotel, half, "", Decimal::ONE)
            .expect_err("sum overflows");
        assert!(matches!(err, LedgerError::AmountOutOfRange(_)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_spent(), half);
    }

    #[test]
    fn oversized_conversion_leaves_the_ledger_untouched() {
        let mut ledger = ExpenseLedger::new();
        let huge = Decimal::from_str_exact("1000000000000000000000000000").unwrap();
        assert!(ledger
            .add_entry(day(1), Category::Food, huge, "", dec!(300))
            .is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn rejected_import_appends_nothing() {
        let mut ledger = ExpenseLedger::new();
        let half = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let entries = vec![
            ExpenseEntry::new(day(1), Category::Food, dec!(10), "", dec!(300)).expect("entry"),
            ExpenseEntry::new(day(1), Category::Food, half, "", Decimal::ONE).expect("entry"),
            ExpenseEntry::new(day(2), Category::Food, half, "", Decimal::ONE).expect("entry"),
        ];
        assert!(ledger.extend(entries).is_err());
        assert!(ledger.is_empty());
    }
}
