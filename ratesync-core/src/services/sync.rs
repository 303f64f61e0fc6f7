//! Sync service - one run of fetch then reconcile

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::result::Error as DomainError;
use crate::domain::{CurrencyRecord, DailyRates, ReconcileReport};
use crate::ports::CurrencyRegistry;
use crate::services::{RateFetcher, ReconcilePolicy, Reconciler};

/// Sync service bound to one registry and one allow-list
pub struct SyncService {
    fetcher: RateFetcher,
    reconciler: Reconciler,
    registry: Box<dyn CurrencyRegistry>,
    currency_codes: Vec<String>,
    policy: ReconcilePolicy,
}

impl SyncService {
    pub fn new(
        fetcher: RateFetcher,
        reconciler: Reconciler,
        registry: Box<dyn CurrencyRegistry>,
        currency_codes: Vec<String>,
        policy: ReconcilePolicy,
    ) -> Self {
        Self {
            fetcher,
            reconciler,
            registry,
            currency_codes,
            policy,
        }
    }

    pub fn policy(&self) -> &ReconcilePolicy {
        &self.policy
    }

    /// Full run: fetch, then reconcile
    ///
    /// When the feed has none of the configured currencies the registry is
    /// not contacted and the report is empty.
    pub fn sync(&self, as_of: NaiveDate) -> Result<SyncReport, SyncError> {
        let rates = self
            .fetcher
            .fetch(&self.currency_codes, as_of)
            .map_err(SyncError::Fetch)?;

        if rates.records.is_empty() {
            log::warn!("The feed has none of the configured currencies, nothing to sync");
            return Ok(SyncReport::new(as_of, rates, ReconcileReport::default()));
        }

        let report = self
            .reconciler
            .reconcile(&rates.records, self.registry.as_ref(), &self.policy)
            .map_err(SyncError::Precondition)?;

        Ok(SyncReport::new(as_of, rates, report))
    }
}

/// A sync run that stopped before writing any record
#[derive(Error, Debug)]
pub enum SyncError {
    /// The feed could not be fetched or parsed
    #[error("Exchange rate fetch failed: {0}")]
    Fetch(#[source] DomainError),

    /// The registry was unusable or has the wrong base currency
    #[error("Sync aborted: {0}")]
    Precondition(#[source] DomainError),
}

impl SyncError {
    pub fn cause(&self) -> &DomainError {
        match self {
            Self::Fetch(e) | Self::Precondition(e) => e,
        }
    }
}

/// Summary of one sync run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub requested_date: NaiveDate,
    pub feed_date: Option<NaiveDate>,
    pub rates: Vec<CurrencyRecord>,
    #[serde(flatten)]
    pub reconcile: ReconcileReport,
}

impl SyncReport {
    pub fn new(requested_date: NaiveDate, rates: DailyRates, reconcile: ReconcileReport) -> Self {
        Self {
            requested_date,
            feed_date: rates.date,
            rates: rates.records,
            reconcile,
        }
    }
}
