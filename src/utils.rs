use lazy_static::lazy_static;
use regex::Regex;

// Normalize a ticker the way it is stored: trimmed and uppercase
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

// Validate a normalized ticker symbol
pub fn validate_symbol(symbol: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^[A-Z0-9](?:[A-Z0-9._-]{0,18}[A-Z0-9])?$").unwrap();
    }

    RE.is_match(symbol)
}

// Parse a user supplied symbol, returning the normalized form if it is valid
pub fn parse_symbol(input: &str) -> Option<String> {
    let symbol = normalize_symbol(input);
    if validate_symbol(&symbol) {
        Some(symbol)
    } else {
        None
    }
}
