//! Display-text normalization for card fields
//!
//! Prices and sold counts arrive as localized display strings
//! (`"Rp1.234.567"`, `"1,2rb terjual/bulan"`). These parsers are total:
//! anything unparsable yields 0, never an error.

/// Marker word that identifies a sold-count text
const SOLD_MARKER: &str = "terjual";

/// Localized "thousand" abbreviation in sold counts
const THOUSAND_ABBREV: &str = "rb";

/// Parses a displayed price into a plain integer
///
/// Strips every non-digit character (currency prefix, thousands
/// separators), then parses what remains. Unparsable or empty input
/// yields 0.
pub fn parse_price(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Parses a displayed monthly-sold count
///
/// Only text containing the sold marker word is considered a sold count;
/// anything else (e.g. a "new item" badge occupying the same slot) yields
/// 0. The leading numeric token is parsed with the decimal comma
/// normalized to a point; the thousands abbreviation multiplies by 1000
/// with truncation.
pub fn parse_monthly_sold(text: &str) -> u64 {
    let lowered = text.trim().to_lowercase();
    if !lowered.contains(SOLD_MARKER) {
        return 0;
    }

    let token: String = lowered
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if token.is_empty() {
        return 0;
    }

    let normalized = token.replace(',', ".");
    let value: f64 = match normalized.parse() {
        Ok(v) => v,
        Err(_) => return 0,
    };

    if lowered.contains(THOUSAND_ABBREV) {
        (value * 1000.0) as u64
    } else {
        value as u64
    }
}
