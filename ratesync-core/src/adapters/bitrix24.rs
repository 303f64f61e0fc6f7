//! Bitrix24 REST webhook client for the CRM currency registry
//!
//! Methods are called as `POST <webhook>/<method>.json` with a PHP-style
//! form body (`fields[LANG][ru][DECIMALS]=2`). Values are written as-is
//! except for the characters [`encode_reserved`] escapes.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use url::Url;

use crate::domain::format::encode_reserved;
use crate::domain::result::{
    Error as DomainError, Result as DomainResult, INVALID_CREDENTIALS_REASON, NOT_FOUND_REASON,
};
use crate::domain::{NewCurrency, RateUpdate};
use crate::ports::CurrencyRegistry;

const METHOD_BASE_GET: &str = "crm.currency.base.get";
const METHOD_UPDATE: &str = "crm.currency.update";
const METHOD_ADD: &str = "crm.currency.add";

/// Envelope of every webhook response
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<JsonValue>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Registry client bound to one inbound webhook URL
#[derive(Debug)]
pub struct Bitrix24Client {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl Bitrix24Client {
    /// Create a client from a webhook URL such as
    /// `https://example.bitrix24.ru/rest/1/s3cr3t/`
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(endpoint).context("Invalid registry endpoint URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Registry endpoint must use http or https");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/", endpoint.trim_end_matches('/')),
            timeout,
        })
    }

    /// Call a webhook method and return its `result`
    pub fn call(&self, method: &str, params: &JsonValue) -> DomainResult<JsonValue> {
        let url = format!("{}{}.json", self.endpoint, method);
        log::debug!("POST {}", method);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(build_query(params))
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| DomainError::transport(format!("Failed to read registry response: {}", e)))?;

        let envelope: RpcResponse = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if status.as_u16() == 401 => {
                return Err(DomainError::registry("INVALID_CREDENTIALS", INVALID_CREDENTIALS_REASON))
            }
            Err(_) if !status.is_success() => {
                return Err(DomainError::transport(format!(
                    "Registry error: HTTP {}",
                    status.as_u16()
                )))
            }
            Err(e) => {
                return Err(DomainError::registry(
                    "INVALID_RESPONSE",
                    format!("Unexpected registry response: {}", e),
                ))
            }
        };

        if let Some(code) = envelope.error {
            return Err(classify_error(status.as_u16(), code, envelope.error_description));
        }
        if !status.is_success() {
            return Err(DomainError::transport(format!(
                "Registry error: HTTP {}",
                status.as_u16()
            )));
        }

        Ok(envelope.result.unwrap_or(JsonValue::Null))
    }

    fn map_request_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::transport(format!(
                "Registry timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            DomainError::transport("Unable to connect to the registry")
        } else {
            DomainError::transport(format!("Registry request failed: {}", error))
        }
    }
}

/// Turn an RPC error code/description pair into a typed error
fn classify_error(status: u16, code: String, description: Option<String>) -> DomainError {
    let reason = description.filter(|d| !d.is_empty()).unwrap_or_else(|| code.clone());

    if status == 401 || code == "INVALID_CREDENTIALS" || reason == INVALID_CREDENTIALS_REASON {
        DomainError::registry(code, INVALID_CREDENTIALS_REASON)
    } else {
        DomainError::registry(code, reason)
    }
}

fn is_not_found(error: &DomainError) -> bool {
    matches!(error, DomainError::Registry { code, reason } if code == "NOT_FOUND" || reason == NOT_FOUND_REASON)
}

impl CurrencyRegistry for Bitrix24Client {
    fn base_currency(&self) -> DomainResult<String> {
        match self.call(METHOD_BASE_GET, &json!({}))? {
            JsonValue::String(code) => Ok(code),
            other => Err(DomainError::registry(
                "INVALID_RESPONSE",
                format!("Expected a currency code, got {}", other),
            )),
        }
    }

    fn update_currency(&self, code: &str, update: &RateUpdate) -> DomainResult<()> {
        let params = json!({
            "id": code,
            "fields": update,
        });

        self.call(METHOD_UPDATE, &params).map_err(|e| {
            if is_not_found(&e) {
                DomainError::RecordNotFound(code.to_string())
            } else {
                e
            }
        })?;
        Ok(())
    }

    fn create_currency(&self, currency: &NewCurrency) -> DomainResult<()> {
        self.call(METHOD_ADD, &json!({ "fields": currency }))?;
        Ok(())
    }
}

/// Flatten parameters into a PHP-style query string
///
/// Nested objects become bracketed keys, booleans become `Y`/`N`. Values
/// are not percent-encoded beyond [`encode_reserved`].
pub fn build_query(params: &JsonValue) -> String {
    let mut pairs = Vec::new();
    flatten(None, params, &mut pairs);
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, encode_reserved(&value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn flatten(prefix: Option<&str>, value: &JsonValue, out: &mut Vec<(String, String)>) {
    let key_for = |name: &str| match prefix {
        Some(p) => format!("{}[{}]", p, name),
        None => name.to_string(),
    };

    match value {
        JsonValue::Object(map) => {
            for (name, child) in map {
                flatten(Some(&key_for(name)), child, out);
            }
        }
        JsonValue::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten(Some(&key_for(&i.to_string())), child, out);
            }
        }
        leaf => {
            if let Some(key) = prefix {
                let text = match leaf {
                    JsonValue::String(s) => s.clone(),
                    JsonValue::Bool(true) => "Y".to_string(),
                    JsonValue::Bool(false) => "N".to_string(),
                    JsonValue::Null => String::new(),
                    other => other.to_string(),
                };
                out.push((key.to_string(), text));
            }
        }
    }
}
