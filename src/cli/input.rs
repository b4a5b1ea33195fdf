//! Argument parsing at the shell boundary.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::budget::MAX_TRIP_DAYS;
use crate::cli::core::CommandError;
use crate::ledger::Category;

/// A parsed amount and whether it had to be raised to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    pub value: Decimal,
    pub clamped: bool,
}

/// Parses a decimal amount, clamping negatives to zero.
pub fn parse_amount(raw: &str) -> Result<Amount, CommandError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '₹' | '_'))
        .collect();
    let value = Decimal::from_str(&cleaned)
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount.")))?;
    if value < Decimal::ZERO {
        Ok(Amount {
            value: Decimal::ZERO,
            clamped: true,
        })
    } else {
        Ok(Amount {
            value,
            clamped: false,
        })
    }
}

pub fn parse_category(raw: &str) -> Result<Category, CommandError> {
    raw.parse::<Category>().map_err(|err| {
        let mut message = format!("{err}.");
        if let Some(suggestion) = err.suggestion {
            message.push_str(&format!(" Did you mean `{suggestion}`?"));
        } else {
            let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
            message.push_str(&format!(" Choose one of: {}.", labels.join(", ")));
        }
        CommandError::InvalidArguments(message)
    })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a date (expected YYYY-MM-DD)."))
    })
}

pub fn parse_days(raw: &str) -> Result<u32, CommandError> {
    match raw.trim().parse::<u32>() {
        Ok(days) if (1..=MAX_TRIP_DAYS).contains(&days) => Ok(days),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a valid number of days (1 to {MAX_TRIP_DAYS})."
        ))),
    }
}

/// Splits `--date` and `--note` out of the words following an expense's category.
pub fn split_expense_args(rest: &[&str]) -> Result<(Option<NaiveDate>, String), CommandError> {
    let mut date = None;
    let mut words = Vec::new();
    let mut iter = rest.iter();
    while let Some(word) = iter.next() {
        match *word {
            "--date" => date = Some(parse_date(flag_value(&mut iter, "--date")?)?),
            "--note" => words.push(flag_value(&mut iter, "--note")?),
            other => words.push(other),
        }
    }
    Ok((date, words.join(" ")))
}

fn flag_value<'a>(
    iter: &mut std::slice::Iter<'_, &'a str>,
    flag: &str,
) -> Result<&'a str, CommandError> {
    iter.next()
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{flag}` needs a value.")))
}
