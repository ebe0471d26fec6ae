//! Token and record-id issuance
//!
//! Tokens are drawn uniformly from `[TOKEN_MIN, TOKEN_MAX]` and retried on
//! collision with an active token. Once random draws stop finding a free
//! value, the space is scanned from a random offset so a free token is found
//! whenever one exists.

use crate::error::{Error, Result};
use crate::normalize::format_token;
use crate::types::{RecordId, Token};
use rand::Rng;
use tracing::debug;

/// Smallest token body
pub const TOKEN_MIN: u16 = 1000;
/// Largest token body
pub const TOKEN_MAX: u16 = 9999;
/// Random draws before falling back to a scan
pub const MAX_DRAW_ATTEMPTS: u32 = 64;

/// Prefix for record ids
pub const RECORD_ID_PREFIX: &str = "GT";
/// Number of base-36 characters in a record id body
pub const RECORD_ID_CHARS: usize = 4;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Total number of distinct token bodies
pub fn token_space() -> u32 {
    u32::from(TOKEN_MAX - TOKEN_MIN) + 1
}

/// Draw a token not rejected by `is_taken`.
pub fn draw_token<R, F>(rng: &mut R, prefix: &str, is_taken: F) -> Result<Token>
where
    R: Rng + ?Sized,
    F: Fn(&Token) -> bool,
{
    for attempt in 0..MAX_DRAW_ATTEMPTS {
        let token = format_token(prefix, rng.gen_range(TOKEN_MIN..=TOKEN_MAX));
        if !is_taken(&token) {
            return Ok(token);
        }
        debug!(%token, attempt, "token collision, redrawing");
    }

    let space = token_space();
    let start = rng.gen_range(0..space);
    for offset in 0..space {
        let body = TOKEN_MIN + ((start + offset) % space) as u16;
        let token = format_token(prefix, body);
        if !is_taken(&token) {
            return Ok(token);
        }
    }

    Err(Error::TokenSpaceExhausted {
        attempts: MAX_DRAW_ATTEMPTS + space,
    })
}

/// Draw a `GT-XXXX` record id not rejected by `is_taken`.
pub fn draw_record_id<R, F>(rng: &mut R, is_taken: F) -> Result<RecordId>
where
    R: Rng + ?Sized,
    F: Fn(&RecordId) -> bool,
{
    for _ in 0..MAX_DRAW_ATTEMPTS {
        let body: String = (0..RECORD_ID_CHARS)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        let id = RecordId(format!("{RECORD_ID_PREFIX}-{body}"));
        if !is_taken(&id) {
            return Ok(id);
        }
        debug!(%id, "record id collision, redrawing");
    }
    Err(Error::TokenSpaceExhausted {
        attempts: MAX_DRAW_ATTEMPTS,
    })
}
