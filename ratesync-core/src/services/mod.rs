//! Service layer - business logic orchestration
//!
//! `RateFetcher` and `Reconciler` are the two halves of a run;
//! `SyncService` composes them for a configured registry.

mod fetcher;
mod reconciler;
mod sync;

pub use fetcher::RateFetcher;
pub use reconciler::{ReconcilePolicy, Reconciler, DEFAULT_BASE_CURRENCY, DEFAULT_SORT_ORDER};
pub use sync::{SyncError, SyncReport, SyncService};
