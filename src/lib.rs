#![doc(test(attr(deny(warnings))))]

//! Trip Ledger records travel expenses in two currencies, checks them against
//! per-category limits and a trip budget, and forecasts where spending is heading.

pub mod budget;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod session;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Trip Ledger tracing initialized.");
    });
}
