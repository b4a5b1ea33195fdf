//! CSV dump and reload of the ledger's entries.

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::Path,
};

use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use tracing::info;

use crate::{currency::CurrencyCode, errors::LedgerError, utils::tmp_path};

use super::{entry::ExpenseEntry, ledger::ExpenseLedger};

/// File name offered when no export path is given.
pub const DEFAULT_EXPORT_FILE: &str = "vietnam_expenses.csv";

/// Column headers for an export in the given currencies.
pub fn header_row(primary: &CurrencyCode, secondary: &CurrencyCode) -> [String; 5] {
    [
        "Date".to_string(),
        "Category".to_string(),
        format!("Amount ({primary})"),
        format!("Amount ({secondary})"),
        "Description".to_string(),
    ]
}

/// Writes a header row followed by every entry in insertion order.
pub fn export_csv<W: Write>(
    ledger: &ExpenseLedger,
    primary: &CurrencyCode,
    secondary: &CurrencyCode,
    writer: W,
) -> Result<(), LedgerError> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(header_row(primary, secondary))?;
    for entry in ledger.entries() {
        csv.serialize(entry)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_to_path(
    ledger: &ExpenseLedger,
    primary: &CurrencyCode,
    secondary: &CurrencyCode,
    path: &Path,
) -> Result<(), LedgerError> {
    let tmp = tmp_path(path);
    export_csv(ledger, primary, secondary, File::create(&tmp)?)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), entries = ledger.len(), "Exported expenses");
    Ok(())
}

/// Reads entries back from an export. Columns are matched by position.
pub fn import_csv<R: Read>(reader: R) -> Result<Vec<ExpenseEntry>, LedgerError> {
    let mut csv = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut entries = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record?;
        let row = index + 2;
        let entry: ExpenseEntry = record.deserialize(None)?;
        if entry.amount_primary() < Decimal::ZERO || entry.amount_secondary() < Decimal::ZERO {
            return Err(LedgerError::InvalidRecord {
                row,
                reason: "amounts must not be negative".into(),
            });
        }
        entries.push(entry);
    }
    Ok(entries)
}

pub fn import_from_path(path: &Path) -> Result<Vec<ExpenseEntry>, LedgerError> {
    let entries = import_csv(File::open(path)?)?;
    info!(path = %path.display(), entries = entries.len(), "Imported expenses");
    Ok(entries)
}
