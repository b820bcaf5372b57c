//! Static currency rate table
//!
//! Rates are expressed against a common base (USD = 1.0). Converting between
//! two currencies uses the ratio of their rates:
//! `converted = amount * rate[to] / rate[from]`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Built-in rates used when no rate file is configured
const DEFAULT_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("INR", 83.0),
    ("JPY", 150.0),
    ("CAD", 1.36),
    ("AUD", 1.52),
    ("CHF", 0.88),
    ("CNY", 7.2),
    ("NZD", 1.64),
    ("SGD", 1.34),
];

/// Currency code to rate mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyTable {
    rates: BTreeMap<String, f64>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
        }
    }
}

impl CurrencyTable {
    /// Build a table from explicit rates
    ///
    /// Rejects empty tables, rates that are not positive finite numbers and
    /// codes that collide once upper-cased.
    pub fn new(rates: BTreeMap<String, f64>) -> Result<Self> {
        if rates.is_empty() {
            return Err(Error::InvalidData("Currency table is empty".to_string()));
        }
        if let Some((code, rate)) = rates
            .iter()
            .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
        {
            return Err(Error::InvalidData(format!(
                "Invalid rate {} for currency {}",
                rate, code
            )));
        }

        let mut normalized = BTreeMap::new();
        for (code, rate) in rates {
            let key = normalize_code(&code);
            if normalized.insert(key.clone(), rate).is_some() {
                return Err(Error::InvalidData(format!(
                    "Currency {} is listed more than once",
                    key
                )));
            }
        }

        Ok(Self { rates: normalized })
    }

    /// Parse a JSON object such as `{"USD": 1.0, "EUR": 0.92}`
    pub fn from_json(json: &str) -> Result<Self> {
        let rates: BTreeMap<String, f64> = serde_json::from_str(json)?;
        Self::new(rates)
    }

    /// Load a JSON rate file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        debug!(path = %path.display(), currencies = table.rates.len(), "Loaded currency table");
        Ok(table)
    }

    /// Rate of `code` against the base currency
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&normalize_code(code)).copied()
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.rate(code).is_some()
    }

    /// All supported currency codes, sorted
    pub fn codes(&self) -> Vec<&str> {
        self.rates.keys().map(String::as_str).collect()
    }

    pub fn rates(&self) -> &BTreeMap<String, f64> {
        &self.rates
    }

    /// Convert `amount` from one currency into another
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        let from_rate = self
            .rate(from)
            .ok_or_else(|| Error::UnsupportedCurrency(from.to_string()))?;
        let to_rate = self
            .rate(to)
            .ok_or_else(|| Error::UnsupportedCurrency(to.to_string()))?;

        Ok(amount * (to_rate / from_rate))
    }
}

/// Canonical form of a currency code (trimmed, upper case)
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
