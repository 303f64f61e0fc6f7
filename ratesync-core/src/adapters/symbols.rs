//! Symbol sources for currency format strings

use std::collections::HashMap;

use crate::domain::CurrencyRecord;
use crate::ports::SymbolSource;

/// Second whitespace-separated token of the display name
///
/// Feed names for multi-unit quotes read "<count> <unit>" (e.g. "10 Лир"),
/// so the second token is the unit. Names with a single token fall back to
/// the currency code. Positional and fragile; prefer [`SymbolTable`] for
/// codes whose names do not follow the pattern.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameTokenSymbols;

impl SymbolSource for NameTokenSymbols {
    fn symbol(&self, record: &CurrencyRecord) -> String {
        record
            .display_name
            .split_whitespace()
            .nth(1)
            .map(str::to_string)
            .unwrap_or_else(|| record.code.clone())
    }
}

/// Fixed symbols keyed by currency code, with a fallback source
pub struct SymbolTable {
    symbols: HashMap<String, String>,
    fallback: Box<dyn SymbolSource>,
}

impl SymbolTable {
    pub fn new(symbols: HashMap<String, String>) -> Self {
        Self::with_fallback(symbols, Box::new(NameTokenSymbols))
    }

    pub fn with_fallback(symbols: HashMap<String, String>, fallback: Box<dyn SymbolSource>) -> Self {
        Self { symbols, fallback }
    }
}

impl SymbolSource for SymbolTable {
    fn symbol(&self, record: &CurrencyRecord) -> String {
        match self.symbols.get(&record.code) {
            Some(symbol) => symbol.clone(),
            None => self.fallback.symbol(record),
        }
    }
}
