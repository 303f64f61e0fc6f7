//! Behavioural tests for fetch and reconcile
//!
//! The feed and the registry are replaced by in-memory doubles of the
//! public ports; parsing and reconciliation run for real.
//!
//! Run with: cargo test --test sync_properties_test

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ratesync_core::adapters::symbols::NameTokenSymbols;
use ratesync_core::domain::result::Result;
use ratesync_core::domain::{NewCurrency, RateUpdate, NOT_ADDED_BY_POLICY};
use ratesync_core::ports::{CurrencyRegistry, RateSource};
use ratesync_core::services::{RateFetcher, ReconcilePolicy, Reconciler};
use ratesync_core::{CurrencyRecord, Error, ReconciliationOutcome};

// ============================================================================
// Test Helpers
// ============================================================================

const FEED: &str = r#"<?xml version="1.0" encoding="windows-1251"?>
<ValCurs Date="02.03.2026" name="Foreign Currency Market">
    <Valute ID="R01010">
        <NumCode>036</NumCode>
        <CharCode>AUD</CharCode>
        <Nominal>1</Nominal>
        <Name>Австралийский доллар</Name>
        <Value>58,1234</Value>
    </Valute>
    <Valute ID="R01239">
        <NumCode>978</NumCode>
        <CharCode>EUR</CharCode>
        <Nominal>1</Nominal>
        <Name>Евро</Name>
        <Value>99,8765</Value>
    </Valute>
    <Valute ID="R01235">
        <NumCode>840</NumCode>
        <CharCode>USD</CharCode>
        <Nominal>1</Nominal>
        <Name>Доллар США</Name>
        <Value>91,4502</Value>
    </Valute>
</ValCurs>"#;

struct FixedFeed {
    calls: AtomicUsize,
}

impl FixedFeed {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

impl RateSource for FixedFeed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch_document(&self, _as_of: NaiveDate) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(FEED.to_string())
    }
}

/// In-memory registry; `always_succeed` makes every update succeed
struct MemoryRegistry {
    base: String,
    known: RefCell<HashSet<String>>,
    always_succeed: bool,
    created: RefCell<Vec<String>>,
}

impl MemoryRegistry {
    fn with_known(known: &[&str]) -> Self {
        Self {
            base: "RUB".to_string(),
            known: RefCell::new(known.iter().map(|c| c.to_string()).collect()),
            always_succeed: false,
            created: RefCell::new(Vec::new()),
        }
    }

    fn always_succeeding() -> Self {
        Self {
            always_succeed: true,
            ..Self::with_known(&[])
        }
    }
}

impl CurrencyRegistry for MemoryRegistry {
    fn base_currency(&self) -> Result<String> {
        Ok(self.base.clone())
    }

    fn update_currency(&self, code: &str, _update: &RateUpdate) -> Result<()> {
        if self.always_succeed || self.known.borrow().contains(code) {
            Ok(())
        } else {
            Err(Error::RecordNotFound(code.to_string()))
        }
    }

    fn create_currency(&self, currency: &NewCurrency) -> Result<()> {
        self.created.borrow_mut().push(currency.code.clone());
        self.known.borrow_mut().insert(currency.code.clone());
        Ok(())
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

fn fetch(list: &[&str]) -> Vec<CurrencyRecord> {
    RateFetcher::new(FixedFeed::new())
        .fetch(&codes(list), date())
        .unwrap()
        .records
}

fn reconciler() -> Reconciler {
    Reconciler::new(Arc::new(NameTokenSymbols))
}

// ============================================================================
// Fetch
// ============================================================================

#[test]
fn test_empty_allow_list_never_contacts_feed() {
    let feed = FixedFeed::new();
    let rates = RateFetcher::new(feed.clone()).fetch(&[], date()).unwrap();

    assert!(rates.records.is_empty());
    assert_eq!(feed.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_absent_codes_yield_empty_result() {
    assert!(fetch(&["XXX"]).is_empty());
    assert!(fetch(&["USD1"]).is_empty());
}

#[test]
fn test_usd_rate_uses_dot_separator() {
    let records = fetch(&["USD"]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].code, "USD");
    assert_eq!(records[0].rate.to_string(), "91.4502");
}

#[test]
fn test_two_codes_in_feed_order_exactly_once() {
    let records = fetch(&["USD", "EUR"]);
    let found: Vec<_> = records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(found, vec!["EUR", "USD"]);
}

#[test]
fn test_records_only_from_allow_list() {
    let records = fetch(&["EUR", "GBP"]);
    assert!(records.iter().all(|r| r.code == "EUR"));
}

// ============================================================================
// Reconcile
// ============================================================================

#[test]
fn test_update_path_is_idempotent() {
    let registry = MemoryRegistry::always_succeeding();
    let records = fetch(&["USD", "EUR"]);
    let policy = ReconcilePolicy::default();

    for _ in 0..2 {
        let report = reconciler().reconcile(&records, &registry, &policy).unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert!(report
            .outcomes
            .iter()
            .all(|o| o.outcome == ReconciliationOutcome::Updated));
    }
    assert!(registry.created.borrow().is_empty());
}

#[test]
fn test_created_currency_is_updated_next_run() {
    let registry = MemoryRegistry::with_known(&["USD"]);
    let records = fetch(&["USD", "EUR"]);
    let policy = ReconcilePolicy::default();

    let first = reconciler().reconcile(&records, &registry, &policy).unwrap();
    assert_eq!(first.outcomes[0].outcome, ReconciliationOutcome::Created);

    let second = reconciler().reconcile(&records, &registry, &policy).unwrap();
    assert_eq!(second.outcomes[0].outcome, ReconciliationOutcome::Updated);
    assert_eq!(*registry.created.borrow(), vec!["EUR"]);
}

#[test]
fn test_base_mismatch_yields_no_outcomes() {
    let mut registry = MemoryRegistry::always_succeeding();
    registry.base = "EUR".to_string();

    let result = reconciler().reconcile(&fetch(&["USD"]), &registry, &ReconcilePolicy::default());

    match result {
        Err(Error::BaseCurrencyMismatch { expected, actual }) => {
            assert_eq!(expected, "RUB");
            assert_eq!(actual, "EUR");
        }
        other => panic!("expected base currency mismatch, got {:?}", other),
    }

    let empty = reconciler().reconcile(&[], &registry, &ReconcilePolicy::default());
    assert!(matches!(empty, Err(Error::BaseCurrencyMismatch { .. })));
}

#[test]
fn test_skipped_codes_equal_not_found_codes() {
    let registry = MemoryRegistry::with_known(&["EUR"]);
    let policy = ReconcilePolicy {
        allow_create: false,
        ..Default::default()
    };

    let report = reconciler()
        .reconcile(&fetch(&["AUD", "EUR", "USD"]), &registry, &policy)
        .unwrap();

    assert_eq!(report.skipped, vec!["AUD", "USD"]);
    for outcome in &report.outcomes {
        if outcome.code == "EUR" {
            assert_eq!(outcome.outcome, ReconciliationOutcome::Updated);
        } else {
            assert_eq!(
                outcome.outcome,
                ReconciliationOutcome::Skipped(NOT_ADDED_BY_POLICY.to_string())
            );
        }
    }
    assert!(registry.created.borrow().is_empty());
}

#[test]
fn test_custom_base_currency() {
    let mut registry = MemoryRegistry::always_succeeding();
    registry.base = "KZT".to_string();
    let policy = ReconcilePolicy {
        base_currency: "KZT".to_string(),
        ..Default::default()
    };

    let records = vec![CurrencyRecord::new("USD", 1, Decimal::new(4801, 1), "Доллар США")];
    let report = reconciler().reconcile(&records, &registry, &policy).unwrap();
    assert_eq!(report.outcomes[0].outcome, ReconciliationOutcome::Updated);
}
