//! Normalization of operator input
//!
//! Plates are keyed verbatim into the ledger, so every plate is normalized
//! before lookup or storage:
//! - Leading/trailing whitespace is dropped
//! - Internal whitespace runs collapse to a single space
//! - Letters are uppercased
//!
//! Tokens are copied by hand from paper chits, so the verification keypad
//! accepts either the full token (`MM-4219`) or just its digits (`4219`).

use crate::error::{Error, Result};
use crate::types::{Plate, Token};

/// Number of digits in a token body
pub const TOKEN_DIGITS: usize = 4;

/// Normalize a plate for storage and lookup.
pub fn normalize_plate(raw: &str) -> Result<Plate> {
    let plate = raw
        .split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ");
    if plate.is_empty() {
        return Err(Error::InvalidPlate(raw.to_string()));
    }
    Ok(Plate(plate))
}

/// Format a token from its prefix and numeric body.
pub fn format_token(prefix: &str, body: u16) -> Token {
    Token(format!("{prefix}-{body:0width$}", width = TOKEN_DIGITS))
}

/// Normalize keypad or typed input into a full token.
///
/// The prefix match is case-insensitive; the body must be exactly
/// [`TOKEN_DIGITS`] ASCII digits.
pub fn normalize_token_input(prefix: &str, raw: &str) -> Result<Token> {
    let input = raw.trim().to_uppercase();
    let marker = format!("{}-", prefix.to_uppercase());
    let body = input.strip_prefix(&marker).unwrap_or(&input);

    if body.len() != TOKEN_DIGITS || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidTokenInput(raw.to_string()));
    }

    Ok(Token(format!("{}-{}", prefix.to_uppercase(), body)))
}
