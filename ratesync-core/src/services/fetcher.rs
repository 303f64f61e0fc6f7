//! Rate fetcher - fetch the daily feed and extract the requested currencies

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::feed::parse_daily_rates;
use crate::domain::result::Result;
use crate::domain::DailyRates;
use crate::ports::RateSource;

/// Fetches one feed document per call and filters it to an allow-list
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
}

impl RateFetcher {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    /// Fetch rates for `requested` codes as of `as_of`
    ///
    /// An empty allow-list returns an empty result without any network
    /// call. Transport and parse failures are returned as
    /// `Error::Transport` / `Error::FeedMalformed`, never as "no data".
    pub fn fetch(&self, requested: &[String], as_of: NaiveDate) -> Result<DailyRates> {
        let allowed: HashSet<String> = requested
            .iter()
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect();

        if allowed.is_empty() {
            log::warn!("No currencies requested, skipping feed request");
            return Ok(DailyRates::default());
        }

        let document = self.source.fetch_document(as_of).map_err(|e| {
            log::error!("Fetching rates from {} failed: {}", self.source.name(), e);
            e
        })?;

        let rates = parse_daily_rates(&document, &allowed).map_err(|e| {
            log::error!("Rates feed from {} could not be parsed: {}", self.source.name(), e);
            e
        })?;

        let found: HashSet<&str> = rates.records.iter().map(|r| r.code.as_str()).collect();
        let mut missing: Vec<&str> = allowed
            .iter()
            .map(String::as_str)
            .filter(|code| !found.contains(code))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            log::warn!("Feed has no rate for: {}", missing.join(", "));
        }

        if let Some(date) = rates.date {
            if date != as_of {
                log::info!("Requested rates for {}, feed answered for {}", as_of, date);
            }
        }

        log::info!(
            "Fetched {} of {} requested currencies",
            rates.records.len(),
            allowed.len()
        );
        Ok(rates)
    }
}
