//! Expense records, the session ledger, and its CSV form.

pub mod category;
pub mod entry;
pub mod export;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use category::{Category, UnknownCategory};
pub use entry::ExpenseEntry;
pub use ledger::{share_of_total, ExpenseLedger};
