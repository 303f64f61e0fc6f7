//! Configuration management
//!
//! Settings live in `settings.json`:
//! ```json
//! {
//!   "endpoint": "https://example.bitrix24.ru/rest/1/s3cr3t/",
//!   "currencyCodes": ["USD", "EUR"],
//!   "allowCreate": true,
//!   "locales": { "ru": { "decimalPoint": ".", "decimals": 2, "hideZero": true } }
//! }
//! ```
//!
//! Environment variables override the file and are read once, here.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::cbr::CBR_DAILY_URL;
use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::LocaleFormat;
use crate::services::{ReconcilePolicy, DEFAULT_BASE_CURRENCY, DEFAULT_SORT_ORDER};

/// Registry webhook URL, including its secret
pub const ENDPOINT_ENV: &str = "URL_TO_BITRIX24";
/// Comma-separated allow-list, e.g. `USD, EUR`
pub const CURRENCIES_ENV: &str = "CURRENCY_TO_UPDATE";
/// Whether missing currencies are created
pub const ALLOW_CREATE_ENV: &str = "ADD_NEW_CURRENCY";
/// Alternative feed URL
pub const FEED_URL_ENV: &str = "RATESYNC_FEED_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    currency_codes: Option<Vec<String>>,
    #[serde(default)]
    allow_create: Option<bool>,
    #[serde(default)]
    locales: Option<BTreeMap<String, LocaleFormat>>,
    #[serde(default)]
    base_currency: Option<String>,
    #[serde(default)]
    feed_url: Option<String>,
    #[serde(default)]
    sort_order: Option<u32>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    symbols: HashMap<String, String>,
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Option<String>,
    pub currency_codes: Vec<String>,
    pub allow_create: bool,
    pub locales: BTreeMap<String, LocaleFormat>,
    pub base_currency: String,
    pub feed_url: String,
    pub sort_order: u32,
    pub timeout_secs: u64,
    /// Fixed format-string symbols keyed by currency code
    pub symbols: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(SettingsFile::default(), |_| None)
    }
}

impl Config {
    /// Load config from a config directory (`<dir>/settings.json`)
    pub fn load(config_dir: &Path) -> Result<Self> {
        Self::load_file(&config_dir.join("settings.json"))
    }

    /// Load config from a settings file; a missing file means defaults
    pub fn load_file(settings_path: &Path) -> Result<Self> {
        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {}", settings_path.display()))?
        } else {
            log::debug!("No settings file at {}, using defaults", settings_path.display());
            SettingsFile::default()
        };

        Ok(Self::resolve(raw, |key| std::env::var(key).ok()))
    }

    /// Merge file settings with environment overrides
    fn resolve(raw: SettingsFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = env(ENDPOINT_ENV)
            .or(raw.endpoint)
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let currency_codes = match env(CURRENCIES_ENV) {
            Some(list) => parse_currency_list(&list),
            None => parse_currency_list(&raw.currency_codes.unwrap_or_default().join(",")),
        };

        let allow_create = env(ALLOW_CREATE_ENV)
            .as_deref()
            .and_then(parse_bool)
            .or(raw.allow_create)
            .unwrap_or(true);

        let locales = raw
            .locales
            .unwrap_or_else(|| ReconcilePolicy::default().locales);

        Self {
            endpoint,
            currency_codes,
            allow_create,
            locales,
            base_currency: raw
                .base_currency
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string()),
            feed_url: env(FEED_URL_ENV)
                .or(raw.feed_url)
                .unwrap_or_else(|| CBR_DAILY_URL.to_string()),
            sort_order: raw.sort_order.unwrap_or(DEFAULT_SORT_ORDER),
            timeout_secs: raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            symbols: raw.symbols,
        }
    }

    /// Check that everything a sync run needs is present
    pub fn validate(&self) -> DomainResult<()> {
        self.endpoint()?;
        if self.currency_codes.is_empty() {
            return Err(DomainError::config_missing(format!(
                "no currencies to update; set \"currencyCodes\" in settings.json or {} (e.g. {}=USD, EUR)",
                CURRENCIES_ENV, CURRENCIES_ENV
            )));
        }
        Ok(())
    }

    /// Registry endpoint, or a `ConfigurationMissing` error naming where to set it
    pub fn endpoint(&self) -> DomainResult<&str> {
        self.endpoint.as_deref().ok_or_else(|| {
            DomainError::config_missing(format!(
                "registry endpoint; set \"endpoint\" in settings.json or {}",
                ENDPOINT_ENV
            ))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reconciliation policy derived from this config
    pub fn policy(&self) -> ReconcilePolicy {
        ReconcilePolicy {
            allow_create: self.allow_create,
            locales: self.locales.clone(),
            base_currency: self.base_currency.clone(),
            sort_order: self.sort_order,
        }
    }
}

/// Parse a comma-separated currency list: trimmed, upper-cased, de-duplicated
pub fn parse_currency_list(raw: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for code in raw.split(',').map(|c| c.trim().to_uppercase()) {
        if !code.is_empty() && !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "1" | "yes" | "TRUE" | "YES" | "True" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" | "False" => Some(false),
        _ => None,
    }
}
