#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use trip_ledger::{
    config::{Config, ConfigManager},
    ledger::{Category, ExpenseLedger},
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated home directory with a config that never touches the network.
pub fn offline_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let mut config = Config::default();
    config.features.live_rate = false;
    ConfigManager::with_base_dir(base.clone())
        .save(&config)
        .expect("write offline config");
    base
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).expect("valid January date")
}

/// Pho, banh mi and a hotel night at ₹1 = 300 VND.
pub fn sample_ledger() -> ExpenseLedger {
    let mut ledger = ExpenseLedger::new();
    let expenses = [
        (date(1), Category::Food, dec!(500), "Pho"),
        (date(2), Category::Food, dec!(300), "Banh mi"),
        (date(2), Category::Hotel, dec!(1000), "Old Quarter"),
    ];
    for (day, category, amount, note) in expenses {
        ledger
            .add_entry(day, category, amount, note, dec!(300))
            .expect("sample expense");
    }
    ledger
}
