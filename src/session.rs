//! Session-scoped state shared by the dashboard and the core model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    budget::{BudgetEvaluator, Forecast, OverBudget, TrendEstimate, TripBudget},
    config::Config,
    currency::{CurrencyCode, RateProvider, RateQuote},
    errors::LedgerError,
    ledger::{Category, ExpenseEntry, ExpenseLedger},
    report::{self, DeliveryOutcome, Notifier},
};

/// Everything one interactive session knows. Dropped when the session ends.
#[derive(Debug, Clone)]
pub struct Session {
    ledger: ExpenseLedger,
    evaluator: BudgetEvaluator,
    quote: RateQuote,
    trip: TripBudget,
    primary: CurrencyCode,
    secondary: CurrencyCode,
}

impl Session {
    /// Starts a session, fetching the conversion rate exactly once.
    pub fn start(config: &Config, provider: &dyn RateProvider) -> Self {
        let quote = provider.get_rate();
        info!(rate = %quote.rate, fallback = quote.is_fallback(), "Session started");
        Self {
            ledger: ExpenseLedger::new(),
            evaluator: BudgetEvaluator::new(),
            quote,
            trip: TripBudget::new(Decimal::ZERO, config.trip_days),
            primary: config.primary_currency.clone(),
            secondary: config.secondary_currency.clone(),
        }
    }

    pub fn ledger(&self) -> &ExpenseLedger {
        &self.ledger
    }

    pub fn evaluator(&self) -> &BudgetEvaluator {
        &self.evaluator
    }

    pub fn quote(&self) -> &RateQuote {
        &self.quote
    }

    pub fn trip(&self) -> &TripBudget {
        &self.trip
    }

    pub fn primary_currency(&self) -> &CurrencyCode {
        &self.primary
    }

    pub fn secondary_currency(&self) -> &CurrencyCode {
        &self.secondary
    }

    /// Records an expense at the session rate. Returns its 1-based position.
    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        category: Category,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<usize, LedgerError> {
        self.ledger
            .add_entry(date, category, amount, description, self.quote.rate)
    }

    pub fn import_entries(&mut self, entries: Vec<ExpenseEntry>) -> Result<usize, LedgerError> {
        let count = entries.len();
        self.ledger.extend(entries)?;
        Ok(count)
    }

    pub fn set_limit(&mut self, category: Category, limit: Decimal) {
        self.evaluator.set_limit(category, limit);
    }

    pub fn set_trip_budget(&mut self, trip: TripBudget) {
        self.trip = trip;
    }

    pub fn over_budget(&self) -> Vec<OverBudget> {
        self.evaluator.check_over_budget(&self.ledger)
    }

    pub fn remaining_budget(&self) -> Decimal {
        BudgetEvaluator::remaining_budget(&self.trip, self.ledger.total_spent())
    }

    pub fn forecast(&self) -> Option<Forecast> {
        BudgetEvaluator::forecast(&self.ledger, &self.trip)
    }

    pub fn trend(&self) -> Option<TrendEstimate> {
        BudgetEvaluator::trend_projection(&self.ledger, self.trip.total_days)
    }

    pub fn summary_text(&self) -> String {
        report::build_summary(&self.ledger, &self.trip, &self.primary)
    }

    pub fn send_report(&self, notifier: &dyn Notifier) -> DeliveryOutcome {
        report::dispatch_report(notifier, &self.summary_text())
    }
}
