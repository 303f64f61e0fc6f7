//! Core domain entities
//!
//! Pure data structures and parsing - no I/O.

mod currency;
pub mod feed;
pub mod format;
mod outcome;
pub mod result;

pub use currency::{CurrencyLang, CurrencyRecord, DailyRates, LocaleFormat, NewCurrency, RateUpdate};
pub use outcome::{ReconcileReport, ReconciliationOutcome, RecordOutcome, NOT_ADDED_BY_POLICY};
