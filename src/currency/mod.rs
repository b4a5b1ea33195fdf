//! Conversion rate lookup and currency display helpers.

use std::{fmt, str::FromStr, time::Duration};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Rate used whenever the live lookup fails (₹1 = 300 ₫).
pub const DEFAULT_RATE: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Endpoint queried when no override is configured.
pub const DEFAULT_RATE_ENDPOINT: &str = "https://api.exchangerate-api.com/v4/latest/INR";

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> String {
        symbol_for(self.as_str())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the session's conversion rate came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSource {
    Live,
    Fallback { reason: String },
}

/// The session's conversion rate. Always holds a usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuote {
    pub rate: Decimal,
    pub source: RateSource,
}

impl RateQuote {
    pub fn live(rate: Decimal) -> Self {
        Self {
            rate,
            source: RateSource::Live,
        }
    }

    pub fn fallback(rate: Decimal, reason: impl Into<String>) -> Self {
        Self {
            rate,
            source: RateSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, RateSource::Fallback { .. })
    }

    /// User-facing warning shown when the default rate is in effect.
    pub fn warning(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<String> {
        if !self.is_fallback() {
            return None;
        }
        Some(format!(
            "Failed to fetch the latest currency conversion rate. Using a default rate of {}1 = {} {}",
            from.symbol(),
            self.rate.normalize(),
            to
        ))
    }

    pub fn describe(&self, from: &CurrencyCode, to: &CurrencyCode) -> String {
        format!(
            "Current {} to {} Rate: {}1 = {:.2} {}",
            from,
            to,
            from.symbol(),
            self.rate,
            to
        )
    }
}

/// Supplies the conversion rate for a session.
///
/// Implementations never fail: any lookup problem degrades to a fallback quote.
pub trait RateProvider {
    fn get_rate(&self) -> RateQuote;
}

/// Returns a fixed rate, used when live lookups are disabled.
#[derive(Debug, Clone)]
pub struct FixedRateProvider {
    rate: Decimal,
}

impl FixedRateProvider {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl RateProvider for FixedRateProvider {
    fn get_rate(&self) -> RateQuote {
        RateQuote::live(self.rate)
    }
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("rate for `{0}` missing from payload")]
    MissingRate(String),
    #[error("rate `{0}` is not a positive number")]
    InvalidRate(String),
}

/// Performs one blocking GET against an exchange-rate endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    endpoint: String,
    target: CurrencyCode,
    fallback: Decimal,
    timeout: Duration,
}

impl HttpRateProvider {
    pub fn new(endpoint: impl Into<String>, target: CurrencyCode) -> Self {
        Self {
            endpoint: endpoint.into(),
            target,
            fallback: DEFAULT_RATE,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_fallback(mut self, fallback: Decimal) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn fetch(&self) -> Result<Decimal, RateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&self.endpoint).send()?;
        if !response.status().is_success() {
            return Err(RateError::Status(response.status()));
        }
        let payload: serde_json::Value = response.json()?;
        rate_from_payload(&payload, &self.target)
    }
}

impl RateProvider for HttpRateProvider {
    fn get_rate(&self) -> RateQuote {
        match self.fetch() {
            Ok(rate) => {
                info!(endpoint = %self.endpoint, %rate, "Fetched live conversion rate");
                RateQuote::live(rate)
            }
            Err(err) => {
                warn!(endpoint = %self.endpoint, error = %err, "Falling back to default conversion rate");
                RateQuote::fallback(self.fallback, err.to_string())
            }
        }
    }
}

/// Reads `rates.<target>` out of an exchange-rate payload.
pub fn rate_from_payload(
    payload: &serde_json::Value,
    target: &CurrencyCode,
) -> Result<Decimal, RateError> {
    let raw = payload
        .get("rates")
        .and_then(|rates| rates.get(target.as_str()))
        .ok_or_else(|| RateError::MissingRate(target.to_string()))?;
    let serde_json::Value::Number(number) = raw else {
        return Err(RateError::InvalidRate(raw.to_string()));
    };
    let text = number.to_string();
    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| RateError::InvalidRate(text.clone()))?;
    if rate <= Decimal::ZERO {
        return Err(RateError::InvalidRate(text));
    }
    Ok(rate)
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "VND" => "₫".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => format!("{code} "),
    }
}

/// Renders an amount with the currency symbol, grouping and two decimals.
pub fn format_amount(amount: Decimal, code: &CurrencyCode) -> String {
    format!("{}{}", code.symbol(), format_number(amount))
}

pub fn format_number(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let body = format!("{:.2}", rounded);
    let (sign, unsigned) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    format!("{sign}{}.{frac_part}", group_digits(int_part, ','))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    /// Answers a single request with `status` and `body`, returning the endpoint URL.
    fn serve_once(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let addr = listener.local_addr().expect("local addr");
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 2048];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/v4/latest/INR")
    }

    fn quote_from(status: &str, body: &str) -> RateQuote {
        HttpRateProvider::new(serve_once(status, body), CurrencyCode::new("VND"))
            .with_fallback(dec!(300))
            .with_timeout(Duration::from_secs(5))
            .get_rate()
    }

    #[test]
    fn reads_target_rate_from_nested_table() {
        let payload = json!({ "base": "INR", "rates": { "USD": 0.012, "VND": 301.52 } });
        let rate = rate_from_payload(&payload, &CurrencyCode::new("vnd")).expect("rate present");
        assert_eq!(rate, dec!(301.52));
    }

    #[test]
    fn missing_or_invalid_rates_are_errors() {
        let missing = json!({ "rates": { "USD": 0.012 } });
        assert!(matches!(
            rate_from_payload(&missing, &CurrencyCode::new("VND")),
            Err(RateError::MissingRate(_))
        ));
        let text = json!({ "rates": { "VND": "300" } });
        assert!(rate_from_payload(&text, &CurrencyCode::new("VND")).is_err());
        let negative = json!({ "rates": { "VND": -1 } });
        assert!(rate_from_payload(&negative, &CurrencyCode::new("VND")).is_err());
    }

    #[test]
    fn unreachable_endpoint_falls_back_to_default() {
        let provider = HttpRateProvider::new("http://127.0.0.1:9/latest/INR", CurrencyCode::new("VND"))
            .with_timeout(Duration::from_millis(500));
        let quote = provider.get_rate();
        assert!(quote.is_fallback());
        assert_eq!(quote.rate, DEFAULT_RATE);
        let warning = quote
            .warning(&CurrencyCode::new("INR"), &CurrencyCode::new("VND"))
            .expect("fallback warns");
        assert!(warning.ends_with("₹1 = 300 VND"), "unexpected warning: {warning}");
    }

    #[test]
    fn live_quotes_do_not_warn() {
        let quote = FixedRateProvider::new(dec!(295.5)).get_rate();
        assert!(quote.warning(&CurrencyCode::new("INR"), &CurrencyCode::new("VND")).is_none());
        assert_eq!(
            quote.describe(&CurrencyCode::new("INR"), &CurrencyCode::new("VND")),
            "Current INR to VND Rate: ₹1 = 295.50 VND"
        );
    }

    #[test]
    fn formats_amounts_with_grouping() {
        let inr = CurrencyCode::new("INR");
        assert_eq!(format_amount(dec!(1800), &inr), "₹1,800.00");
        assert_eq!(format_amount(dec!(-800), &inr), "₹-800.00");
        assert_eq!(format_amount(dec!(150000), &CurrencyCode::new("VND")), "₫150,000.00");
        assert_eq!(format_amount(dec!(0.005), &inr), "₹0.01");
        assert_eq!(format_number(dec!(999.999)), "1,000.00");
    }

    #[test]
    fn live_endpoint_rate_is_used() {
        let quote = quote_from("200 OK", r#"{"base":"INR","rates":{"VND":295.5}}"#);
        assert_eq!(quote, RateQuote::live(dec!(295.5)));
    }

    #[test]
    fn error_status_falls_back() {
        let quote = quote_from("503 Service Unavailable", "{}");
        assert!(quote.is_fallback());
        assert_eq!(quote.rate, dec!(300));
    }

    #[test]
    fn malformed_bodies_fall_back() {
        for body in [
            "not json",
            r#"{"rates":{"USD":0.012}}"#,
            r#"{"rates":{"VND":"abc"}}"#,
            r#"{"rates":{"VND":0}}"#,
        ] {
            let quote = quote_from("200 OK", body);
            assert!(quote.is_fallback(), "expected fallback for {body}");
            assert_eq!(quote.rate, dec!(300));
        }
    }
}
