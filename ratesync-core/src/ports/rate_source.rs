//! Rates feed port

use chrono::NaiveDate;

use crate::domain::result::Result;

/// Source of the raw daily rates document
///
/// Implementations perform exactly one request per call and report
/// transport problems as `Error::Transport`. Parsing is left to the caller.
pub trait RateSource: Send + Sync {
    /// Source name for diagnostics (e.g. "cbr")
    fn name(&self) -> &str;

    /// Fetch the feed document for `as_of`
    fn fetch_document(&self, as_of: NaiveDate) -> Result<String>;
}
