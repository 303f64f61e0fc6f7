//! Ratesync Core - daily exchange rates into a CRM currency registry
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (CurrencyRecord, outcomes, feed parsing)
//! - **ports**: Trait definitions for external dependencies (RateSource, CurrencyRegistry)
//! - **services**: RateFetcher, Reconciler and the SyncService composing them
//! - **adapters**: Concrete implementations (central bank feed, Bitrix24 webhook)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::sync::Arc;

use anyhow::Result;

use adapters::bitrix24::Bitrix24Client;
use adapters::cbr::CbrClient;
use adapters::symbols::SymbolTable;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{CurrencyRecord, DailyRates, ReconcileReport, ReconciliationOutcome};
pub use services::{SyncError, SyncReport};

/// Main context for ratesync operations
///
/// Holds the resolved configuration and builds the services from it. No
/// state outlives a run.
pub struct RatesyncContext {
    pub config: Config,
}

impl RatesyncContext {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetcher for the configured feed; needs no registry settings
    pub fn rate_fetcher(&self) -> Result<RateFetcher> {
        let source = CbrClient::new_with_base_url(&self.config.feed_url, self.config.timeout())?;
        Ok(RateFetcher::new(Arc::new(source)))
    }

    /// Sync service for the configured registry
    ///
    /// Fails with `Error::ConfigurationMissing` when the endpoint or the
    /// currency list is absent.
    pub fn sync_service(&self) -> Result<SyncService> {
        self.config.validate()?;

        let registry = Bitrix24Client::new(self.config.endpoint()?, self.config.timeout())?;
        let symbols = SymbolTable::new(self.config.symbols.clone());

        Ok(SyncService::new(
            self.rate_fetcher()?,
            Reconciler::new(Arc::new(symbols)),
            Box::new(registry),
            self.config.currency_codes.clone(),
            self.config.policy(),
        ))
    }
}
