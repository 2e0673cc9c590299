//! Best-effort JWT helpers.
//!
//! Tokens are decoded without verifying the signature. The expiry check only
//! decides when to refresh a token; the server remains the authority.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Minutes before the actual expiry at which a token is refreshed.
pub const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

pub fn refresh_buffer() -> Duration {
    Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES)
}

/// Decodes the payload (second segment) of a JWT.
///
/// Returns `None` when the token does not have exactly three segments or the
/// payload is not base64url encoded JSON. Padding is optional.
pub fn decode_payload(token: &str) -> Option<Value> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Reads the `exp` claim (seconds since the epoch).
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = decode_payload(token)?;
    let exp = payload.get("exp")?;

    let seconds = exp
        .as_i64()
        .or_else(|| exp.as_f64().map(|f| f.trunc() as i64))?;
    DateTime::from_timestamp(seconds, 0)
}

/// Whether the token is expired or will expire within `buffer`.
///
/// A token whose expiry cannot be read is treated as valid. An expiry so
/// early that subtracting `buffer` leaves chrono's range counts as expired.
pub fn is_token_expired(token: &str, buffer: Duration, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Some(expiry) => expiry.checked_sub_signed(buffer).is_none_or(|t| now >= t),
        None => false,
    }
}

/// Plain-text refresh responses carry the bare JWT.
pub fn looks_like_jwt(text: &str) -> bool {
    text.matches('.').count() == 2 && text.starts_with("eyJ")
}

/// Splits a remaining duration into whole hours and minutes.
pub fn remaining_hours_minutes(remaining: Duration) -> (i64, i64) {
    let total = remaining.num_seconds().max(0);
    (total / 3600, (total % 3600) / 60)
}
