//! Reconciler - apply fetched rates to the remote currency registry

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::format::format_string;
use crate::domain::result::{Error, Result};
use crate::domain::{
    CurrencyLang, CurrencyRecord, LocaleFormat, NewCurrency, RateUpdate, ReconcileReport,
    ReconciliationOutcome, NOT_ADDED_BY_POLICY,
};
use crate::ports::{CurrencyRegistry, SymbolSource};

/// Base currency the feed quotes against
pub const DEFAULT_BASE_CURRENCY: &str = "RUB";

/// Sort position given to currencies created by a sync
pub const DEFAULT_SORT_ORDER: u32 = 1000;

const THOUSANDS_VARIANT: &str = "C";
const THOUSANDS_SEP: &str = "'";

/// What the reconciler may do with records the registry does not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePolicy {
    pub allow_create: bool,
    pub locales: BTreeMap<String, LocaleFormat>,
    pub base_currency: String,
    pub sort_order: u32,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        let mut locales = BTreeMap::new();
        locales.insert("ru".to_string(), LocaleFormat::default());

        Self {
            allow_create: true,
            locales,
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            sort_order: DEFAULT_SORT_ORDER,
        }
    }
}

/// Writes records to a registry: update, else create or skip
pub struct Reconciler {
    symbols: Arc<dyn SymbolSource>,
}

impl Reconciler {
    pub fn new(symbols: Arc<dyn SymbolSource>) -> Self {
        Self { symbols }
    }

    /// Reconcile `records` against `registry`, in order
    ///
    /// Fails before touching any record when the registry's base currency
    /// cannot be read or differs from `policy.base_currency`. After that,
    /// a failing record is logged and reported but never stops the batch.
    pub fn reconcile(
        &self,
        records: &[CurrencyRecord],
        registry: &dyn CurrencyRegistry,
        policy: &ReconcilePolicy,
    ) -> Result<ReconcileReport> {
        let actual = registry.base_currency().map_err(|e| {
            log::error!("Could not read the registry base currency: {}", e);
            e
        })?;

        if actual != policy.base_currency {
            log::error!(
                "Registry base currency is {}, rates can only be synced against {}",
                actual,
                policy.base_currency
            );
            return Err(Error::BaseCurrencyMismatch {
                expected: policy.base_currency.clone(),
                actual,
            });
        }

        let mut report = ReconcileReport::default();

        for record in records {
            let outcome = match registry.update_currency(&record.code, &RateUpdate::from(record)) {
                Ok(()) => {
                    log::info!("{} updated: {} per {}", record.code, record.rate, record.nominal);
                    ReconciliationOutcome::Updated
                }
                Err(e) if e.is_not_found() => {
                    if policy.allow_create {
                        self.create(record, registry, policy)
                    } else {
                        report.skipped.push(record.code.clone());
                        ReconciliationOutcome::Skipped(NOT_ADDED_BY_POLICY.to_string())
                    }
                }
                Err(e) => {
                    log::error!("{} update failed: {}", record.code, e);
                    ReconciliationOutcome::Failed(e.to_string())
                }
            };
            report.push(record.code.clone(), outcome);
        }

        if !policy.allow_create && !report.skipped.is_empty() {
            log::warn!(
                "Currency creation is disabled, so these currencies missing from the registry were not added: {}",
                report.skipped.join(", ")
            );
        }

        Ok(report)
    }

    fn create(
        &self,
        record: &CurrencyRecord,
        registry: &dyn CurrencyRegistry,
        policy: &ReconcilePolicy,
    ) -> ReconciliationOutcome {
        log::info!("{} is missing from the registry, creating it", record.code);

        match registry.create_currency(&self.creation_payload(record, policy)) {
            Ok(()) => {
                log::info!("{} created", record.code);
                ReconciliationOutcome::Created
            }
            Err(e) => {
                log::error!("{} create failed: {}", record.code, e);
                ReconciliationOutcome::Failed(e.to_string())
            }
        }
    }

    /// Full creation payload, one display block per configured locale
    pub fn creation_payload(&self, record: &CurrencyRecord, policy: &ReconcilePolicy) -> NewCurrency {
        let format = format_string(&self.symbols.symbol(record));

        let lang = policy
            .locales
            .iter()
            .map(|(locale, fmt)| {
                let block = CurrencyLang {
                    dec_point: fmt.decimal_point.clone(),
                    decimals: fmt.decimals,
                    hide_zero: if fmt.hide_zero { "Y" } else { "N" }.to_string(),
                    format_string: format.clone(),
                    full_name: record.display_name.clone(),
                    thousands_variant: THOUSANDS_VARIANT.to_string(),
                    thousands_sep: THOUSANDS_SEP.to_string(),
                };
                (locale.clone(), block)
            })
            .collect();

        NewCurrency {
            code: record.code.clone(),
            nominal: record.nominal,
            rate: record.rate,
            sort: policy.sort_order,
            lang,
        }
    }
}
