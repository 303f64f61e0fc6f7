//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod rate_source;
mod registry;
mod symbol;

pub use rate_source::RateSource;
pub use registry::CurrencyRegistry;
pub use symbol::SymbolSource;
