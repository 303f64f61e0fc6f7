//! Display format strings and raw form values for the registry
//!
//! The registry formats amounts with a template such as `# Lir`, where `#`
//! is replaced by the number. Its field parser treats an unescaped `#` as
//! the start of a comment and silently drops the rest of the value, so the
//! template has to carry `%23` instead.
//!
//! Form values are sent unencoded, so `&`, `=` and `+` in a name or symbol
//! would split the body or turn into a space. They are escaped the same
//! way. `%` passes through untouched: a value that already contains a
//! percent escape keeps it.

/// Placeholder for the amount in a registry format string
pub const AMOUNT_PLACEHOLDER: char = '#';

/// Characters a raw form value cannot carry, with their escapes
const RESERVED: [(char, &str); 4] = [('#', "%23"), ('&', "%26"), ('+', "%2B"), ('=', "%3D")];

/// Percent-encode the reserved characters of a registry field value
///
/// Idempotent, since `%` itself is never encoded.
pub fn encode_reserved(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for c in value.chars() {
        match RESERVED.iter().find(|(reserved, _)| *reserved == c) {
            Some((_, escape)) => encoded.push_str(escape),
            None => encoded.push(c),
        }
    }
    encoded
}

/// Build the encoded format string for a currency symbol: `%23 <symbol>`
pub fn format_string(symbol: &str) -> String {
    encode_reserved(&format!("{} {}", AMOUNT_PLACEHOLDER, symbol.trim()))
}
