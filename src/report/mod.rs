//! Expense summary text and its delivery.

mod smtp;

pub use smtp::{SmtpCredentials, SmtpNotifier};

use std::fmt::Write as _;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    budget::{BudgetEvaluator, TripBudget},
    currency::{format_amount, CurrencyCode},
    ledger::ExpenseLedger,
};

pub const REPORT_SUBJECT: &str = "Your Daily Expense Report";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("missing credential `{0}`")]
    MissingCredential(&'static str),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("failed to send message: {0}")]
    Send(String),
}

/// Delivers a finished report somewhere outside the process.
pub trait Notifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

/// One `date: category - amount` line per entry, then the remaining budget.
pub fn build_summary(ledger: &ExpenseLedger, trip: &TripBudget, currency: &CurrencyCode) -> String {
    let mut body = String::new();
    for entry in ledger.entries() {
        let _ = writeln!(
            body,
            "{}: {} - {}",
            entry.date(),
            entry.category(),
            format_amount(entry.amount_primary(), currency)
        );
    }
    let remaining = BudgetEvaluator::remaining_budget(trip, ledger.total_spent());
    let _ = write!(
        body,
        "\nRemaining Budget: {}",
        format_amount(remaining, currency)
    );
    body
}

/// Sends the summary; a failed send is logged and reported, never raised.
pub fn dispatch_report(notifier: &dyn Notifier, summary: &str) -> DeliveryOutcome {
    match notifier.send(REPORT_SUBJECT, summary) {
        Ok(()) => {
            info!("Expense report sent");
            DeliveryOutcome::Delivered
        }
        Err(err) => {
            warn!(error = %err, "Expense report could not be sent");
            DeliveryOutcome::Failed(err.to_string())
        }
    }
}
