//! Currency symbol port

use crate::domain::CurrencyRecord;

/// Derives the unit symbol shown after the amount in a format string
pub trait SymbolSource: Send + Sync {
    fn symbol(&self, record: &CurrencyRecord) -> String;
}
