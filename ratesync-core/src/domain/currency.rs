//! Currency entities: parsed feed records and registry payloads

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One parsed feed entry for a single currency on a single date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRecord {
    /// Three-letter code, e.g. "USD"
    pub code: String,
    /// Unit count the rate applies to
    pub nominal: u32,
    /// Rate per `nominal` units, in the base currency
    pub rate: Decimal,
    /// Human readable name in the feed's language
    pub display_name: String,
}

impl CurrencyRecord {
    pub fn new(code: impl Into<String>, nominal: u32, rate: Decimal, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            nominal,
            rate,
            display_name: display_name.into(),
        }
    }
}

/// Filtered content of one feed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRates {
    /// Date the bank says these rates are for (may differ from the requested one)
    pub date: Option<NaiveDate>,
    pub records: Vec<CurrencyRecord>,
}

/// Per-locale number formatting used when creating a currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleFormat {
    #[serde(default = "default_decimal_point")]
    pub decimal_point: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default = "default_hide_zero")]
    pub hide_zero: bool,
}

fn default_decimal_point() -> String {
    ".".to_string()
}

fn default_decimals() -> u8 {
    2
}

fn default_hide_zero() -> bool {
    true
}

impl Default for LocaleFormat {
    fn default() -> Self {
        Self {
            decimal_point: default_decimal_point(),
            decimals: default_decimals(),
            hide_zero: default_hide_zero(),
        }
    }
}

/// Fields sent to the registry when updating an existing currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RateUpdate {
    #[serde(rename = "AMOUNT_CNT")]
    pub nominal: u32,
    #[serde(rename = "AMOUNT")]
    pub rate: Decimal,
}

impl From<&CurrencyRecord> for RateUpdate {
    fn from(record: &CurrencyRecord) -> Self {
        Self {
            nominal: record.nominal,
            rate: record.rate,
        }
    }
}

/// Localized display block of a creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CurrencyLang {
    pub dec_point: String,
    pub decimals: u8,
    /// "Y" or "N"
    pub hide_zero: String,
    pub format_string: String,
    pub full_name: String,
    pub thousands_variant: String,
    pub thousands_sep: String,
}

/// Full payload for creating a currency in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCurrency {
    #[serde(rename = "CURRENCY")]
    pub code: String,
    #[serde(rename = "AMOUNT_CNT")]
    pub nominal: u32,
    #[serde(rename = "AMOUNT")]
    pub rate: Decimal,
    #[serde(rename = "SORT")]
    pub sort: u32,
    #[serde(rename = "LANG")]
    pub lang: BTreeMap<String, CurrencyLang>,
}
