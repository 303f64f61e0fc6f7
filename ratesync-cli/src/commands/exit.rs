//! Process exit codes

use std::process::ExitCode;

use ratesync_core::{Error, SyncError, SyncReport};

/// Run completed and every record was written
pub const SUCCESS: u8 = 0;
/// Unexpected failure
pub const FAILURE: u8 = 1;
/// A required input (endpoint, currency list) is missing
pub const CONFIG_MISSING: u8 = 2;
/// Aborted before any record: base currency mismatch or registry unusable
pub const PRECONDITION: u8 = 3;
/// Run completed but at least one record failed
pub const RECORD_FAILURES: u8 = 4;
/// Feed unreachable or unparseable
pub const FEED_UNAVAILABLE: u8 = 5;

/// Exit code for an error that escaped a command
pub fn for_error(error: &anyhow::Error) -> ExitCode {
    ExitCode::from(code_for(error))
}

/// Exit code for the outcome of a sync run
pub fn for_sync(outcome: &Result<SyncReport, SyncError>) -> u8 {
    match outcome {
        Err(SyncError::Fetch(_)) => FEED_UNAVAILABLE,
        Err(SyncError::Precondition(_)) => PRECONDITION,
        Ok(report) if report.reconcile.failed() > 0 => RECORD_FAILURES,
        Ok(_) => SUCCESS,
    }
}

fn code_for(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(|e| match e {
            Error::ConfigurationMissing(_) => CONFIG_MISSING,
            Error::BaseCurrencyMismatch { .. } => PRECONDITION,
            Error::FeedMalformed(_) => FEED_UNAVAILABLE,
            _ => FAILURE,
        })
        .unwrap_or(FAILURE)
}
