//! Daily rates feed document
//!
//! The feed is a `ValCurs` root with one `Valute` element per currency:
//!
//! ```xml
//! <ValCurs Date="16.10.2026" name="Foreign Currency Market">
//!   <Valute ID="R01235">
//!     <NumCode>840</NumCode>
//!     <CharCode>USD</CharCode>
//!     <Nominal>1</Nominal>
//!     <Name>Доллар США</Name>
//!     <Value>92,5058</Value>
//!     <VunitRate>92,5058</VunitRate>
//!   </Valute>
//! </ValCurs>
//! ```
//!
//! Values use `,` as the decimal separator.

use std::collections::HashSet;

use chrono::NaiveDate;
use quick_xml::de::from_str;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::currency::{CurrencyRecord, DailyRates};
use super::result::{Error, Result};

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "@Date", default)]
    date: Option<String>,
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Valute {
    char_code: String,
    nominal: String,
    name: String,
    value: String,
}

/// Replace the feed's `,` decimal separator with `.`
pub fn normalize_decimal(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Parse a feed document, keeping only currencies in `allowed`
///
/// Feed order is preserved. A code listed twice in the feed is kept once
/// (first occurrence). Entries outside the allow-list are never validated.
/// A document without any `Valute` is how the bank answers a request it
/// rejects (`<ValCurs>Error in parameters</ValCurs>`), so it is malformed
/// rather than empty.
pub fn parse_daily_rates(xml: &str, allowed: &HashSet<String>) -> Result<DailyRates> {
    let doc: ValCurs = from_str(xml).map_err(|e| Error::malformed(e.to_string()))?;

    if doc.valutes.is_empty() {
        return Err(Error::malformed("feed document lists no currencies"));
    }

    let date = doc.date.as_deref().and_then(parse_feed_date);

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for valute in doc.valutes {
        let code = valute.char_code.trim();
        if !allowed.contains(code) {
            continue;
        }
        if !seen.insert(code.to_string()) {
            log::warn!("Feed lists {} more than once, keeping the first entry", code);
            continue;
        }

        let nominal = valute
            .nominal
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::malformed(format!("{}: invalid nominal '{}'", code, valute.nominal)))?;

        let rate = normalize_decimal(&valute.value)
            .parse::<Decimal>()
            .map_err(|_| Error::malformed(format!("{}: invalid value '{}'", code, valute.value)))?;

        records.push(CurrencyRecord::new(code, nominal, rate, valute.name.trim()));
    }

    Ok(DailyRates { date, records })
}

fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y").ok()
}

#[cfg(test)]
pub(crate) const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="windows-1251"?>
<ValCurs Date="16.10.2026" name="Foreign Currency Market">
<Valute ID="R01239"><NumCode>978</NumCode><CharCode>EUR</CharCode><Nominal>1</Nominal><Name>Евро</Name><Value>100,1234</Value><VunitRate>100,1234</VunitRate></Valute>
<Valute ID="R01335"><NumCode>398</NumCode><CharCode>KZT</CharCode><Nominal>100</Nominal><Name>Казахстанских тенге</Name><Value>18,7021</Value><VunitRate>0,187021</VunitRate></Valute>
<Valute ID="R01700J"><NumCode>949</NumCode><CharCode>TRY</CharCode><Nominal>10</Nominal><Name>10 Лир</Name><Value>26,5432</Value><VunitRate>2,65432</VunitRate></Valute>
<Valute ID="R01235"><NumCode>840</NumCode><CharCode>USD</CharCode><Nominal>1</Nominal><Name>Доллар США</Name><Value>92,5058</Value><VunitRate>92,5058</VunitRate></Valute>
</ValCurs>"#;
