use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

use super::category::Category;

/// One recorded expense. Fields are fixed at creation.
///
/// Field order matches the exported column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseEntry {
    date: NaiveDate,
    category: Category,
    #[serde(with = "rust_decimal::serde::str")]
    amount_primary: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    amount_secondary: Decimal,
    description: String,
}

impl ExpenseEntry {
    /// Records an expense, converting the primary amount at `rate`.
    ///
    /// Fails when either amount would be negative or the conversion overflows.
    pub fn new(
        date: NaiveDate,
        category: Category,
        amount_primary: Decimal,
        description: impl Into<String>,
        rate: Decimal,
    ) -> Result<Self, LedgerError> {
        let amount_secondary = amount_primary
            .checked_mul(rate)
            .ok_or(LedgerError::AmountOutOfRange(amount_primary))?;
        let entry = Self {
            date,
            category,
            amount_primary,
            amount_secondary,
            description: description.into(),
        };
        entry.validate()?;
        Ok(entry)
    }

    pub(crate) fn validate(&self) -> Result<(), LedgerError> {
        if self.amount_primary < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(self.amount_primary));
        }
        if self.amount_secondary < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(self.amount_secondary));
        }
        Ok(())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount_primary(&self) -> Decimal {
        self.amount_primary
    }

    pub fn amount_secondary(&self) -> Decimal {
        self.amount_secondary
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_at_the_supplied_rate() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let entry = ExpenseEntry::new(date, Category::Food, dec!(12.50), "Pho", dec!(300))
            .expect("valid entry");
        assert_eq!(entry.amount_secondary(), dec!(3750));
        assert_eq!(entry.description(), "Pho");
    }

    #[test]
    fn conversion_overflow_is_an_error() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let huge = Decimal::from_str_exact("1000000000000000000000000000").unwrap();
        let err = ExpenseEntry::new(date, Category::Food, huge, "", dec!(300))
            .expect_err("overflows");
        assert!(matches!(err, LedgerError::AmountOutOfRange(_)));
    }

    #[test]
    fn negative_amounts_and_rates_are_rejected() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(matches!(
            ExpenseEntry::new(date, Category::Food, dec!(-1), "", dec!(300)),
            Err(LedgerError::NegativeAmount(_))
        ));
        assert!(matches!(
            ExpenseEntry::new(date, Category::Food, dec!(1), "", dec!(-300)),
            Err(LedgerError::NegativeAmount(_))
        ));
    }
}
