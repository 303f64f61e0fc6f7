//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Central bank XML feed over HTTP for RateSource
//! - Bitrix24 REST webhook for CurrencyRegistry
//! - Name-token and table lookups for SymbolSource

pub mod bitrix24;
pub mod cbr;
pub mod symbols;

#[cfg(test)]
pub mod mock_server;
