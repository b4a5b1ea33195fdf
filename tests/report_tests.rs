mod common;

use std::cell::RefCell;

use common::sample_ledger;
use insta::assert_snapshot;
use rust_decimal_macros::dec;
use trip_ledger::{
    budget::TripBudget,
    currency::CurrencyCode,
    report::{self, DeliveryOutcome, Notifier, NotifyError, REPORT_SUBJECT},
};

#[derive(Default)]
struct Outbox {
    sent: RefCell<Vec<(String, String)>>,
}

impl Notifier for Outbox {
    fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .borrow_mut()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

struct MissingLogin;

impl Notifier for MissingLogin {
    fn send(&self, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::MissingCredential("TRIP_LEDGER_SMTP_PASSWORD"))
    }
}

#[test]
fn summary_lists_entries_then_remaining_budget() {
    let summary = report::build_summary(
        &sample_ledger(),
        &TripBudget::new(dec!(2000), 6),
        &CurrencyCode::new("INR"),
    );
    assert_snapshot!(summary, @r"
    2025-01-01: Food - ₹500.00
    2025-01-02: Food - ₹300.00
    2025-01-02: Hotel - ₹1,000.00

    Remaining Budget: ₹200.00
    ");
}

#[test]
fn report_is_handed_to_the_notifier() {
    let outbox = Outbox::default();
    let outcome = report::dispatch_report(&outbox, "body");
    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert_eq!(
        outbox.sent.borrow().as_slice(),
        &[(REPORT_SUBJECT.to_string(), "body".to_string())]
    );
}

#[test]
fn notifier_failure_is_returned_as_an_outcome() {
    let outcome = report::dispatch_report(&MissingLogin, "body");
    match outcome {
        DeliveryOutcome::Failed(reason) => assert!(reason.contains("TRIP_LEDGER_SMTP_PASSWORD")),
        DeliveryOutcome::Delivered => panic!("delivery should fail"),
    }
}
