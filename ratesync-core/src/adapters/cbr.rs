//! Central bank daily rates client
//!
//! One GET per run: `<base>?date_req=DD/MM/YYYY`. The bank answers with an
//! XML document in windows-1251. The body is decoded by the encoding named
//! in its XML declaration, then by the Content-Type charset, then as UTF-8.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::ports::RateSource;

/// Default production feed URL
pub const CBR_DAILY_URL: &str = "http://www.cbr.ru/scripts/XML_daily.asp";

/// Date format of the `date_req` query parameter
const DATE_REQ_FORMAT: &str = "%d/%m/%Y";

/// Daily rates feed client
#[derive(Debug)]
pub struct CbrClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl CbrClient {
    /// Create a client for the production feed
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::new_with_base_url(CBR_DAILY_URL, timeout)
    }

    /// Create a client for a custom feed URL (mirrors, test servers)
    pub fn new_with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).context("Invalid feed URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Feed URL must use http or https");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('?').to_string(),
            timeout,
        })
    }

    /// Request URL for a given date
    pub fn daily_url(&self, as_of: NaiveDate) -> String {
        format!("{}?date_req={}", self.base_url, as_of.format(DATE_REQ_FORMAT))
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::transport(format!(
                "Rates feed timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            DomainError::transport("Unable to connect to the rates feed")
        } else {
            DomainError::transport(format!("Rates feed request failed: {}", error))
        }
    }
}

impl RateSource for CbrClient {
    fn name(&self) -> &str {
        "cbr"
    }

    fn fetch_document(&self, as_of: NaiveDate) -> DomainResult<String> {
        let url = self.daily_url(as_of);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::transport(format!(
                "Rates feed error: HTTP {}",
                status.as_u16()
            )));
        }

        let charset = header_charset(&response);
        let body = response
            .bytes()
            .map_err(|e| DomainError::transport(format!("Failed to read rates feed: {}", e)))?;

        decode_body(&body, charset.as_deref())
    }
}

/// Charset parameter of the Content-Type header, if any
fn header_charset(response: &Response) -> Option<String> {
    let content_type = response.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Encoding named by the `<?xml ... encoding="..."?>` declaration
fn declared_encoding(body: &[u8]) -> Option<&'static Encoding> {
    // The declaration is ASCII in every encoding the feed can use
    let head = String::from_utf8_lossy(&body[..body.len().min(256)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    let decl = head.strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];

    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = rest[1..].split(quote).next()?;

    Encoding::for_label(label.trim().as_bytes())
}

fn decode_body(body: &[u8], header_charset: Option<&str>) -> DomainResult<String> {
    let encoding = declared_encoding(body)
        .or_else(|| header_charset.and_then(|label| Encoding::for_label(label.as_bytes())))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        return Err(DomainError::malformed(format!(
            "rates feed body is not valid {}",
            used.name()
        )));
    }
    log::debug!("Decoded rates feed as {}", used.name());
    Ok(text.into_owned())
}
