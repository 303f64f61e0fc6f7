//! Currency registry port - the CRM's currency store

use crate::domain::result::Result;
use crate::domain::{NewCurrency, RateUpdate};

/// Remote currency registry
///
/// `update_currency` must report a missing currency as
/// `Error::RecordNotFound` so callers can branch on it; every other
/// rejection is `Error::Registry` or `Error::Transport`.
pub trait CurrencyRegistry {
    /// Code of the registry's reference currency
    fn base_currency(&self) -> Result<String>;

    /// Update amount and nominal of an existing currency
    fn update_currency(&self, code: &str, update: &RateUpdate) -> Result<()>;

    /// Create a currency that does not exist yet
    fn create_currency(&self, currency: &NewCurrency) -> Result<()>;
}
