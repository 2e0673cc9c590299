use base64::{
    Engine,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, Duration, Utc};
use troverai::jwt::*;

const EXP: i64 = 1_768_680_000;

// Helper function to build an unsigned token around a payload
fn create_test_token(payload: &str) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}

fn expiry() -> DateTime<Utc> {
    DateTime::from_timestamp(EXP, 0).unwrap()
}

#[test]
fn test_decode_payload() {
    let token = create_test_token(r#"{"sub":"user-1","exp":1768680000}"#);
    let payload = decode_payload(&token).unwrap();

    assert_eq!(payload["sub"], "user-1");
    assert_eq!(payload["exp"], EXP);
}

#[test]
fn test_decode_payload_with_padding() {
    let payload = r#"{"exp":12}"#;
    let padded = URL_SAFE.encode(payload);
    assert!(padded.ends_with('='));

    let token = format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", padded);
    assert_eq!(decode_payload(&token).unwrap()["exp"], 12);
}

#[test]
fn test_decode_payload_malformed() {
    assert!(decode_payload("").is_none());
    assert!(decode_payload("only.two").is_none());
    assert!(decode_payload("a.b.c.d").is_none());
    assert!(decode_payload("header.!!!not-base64!!!.sig").is_none());

    // Valid base64, but not JSON
    let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain text"));
    assert!(decode_payload(&token).is_none());
}

#[test]
fn test_token_expiry() {
    let token = create_test_token(r#"{"exp":1768680000}"#);
    assert_eq!(token_expiry(&token), Some(expiry()));

    let fractional = create_test_token(r#"{"exp":1768680000.75}"#);
    assert_eq!(token_expiry(&fractional), Some(expiry()));

    let missing = create_test_token(r#"{"sub":"user-1"}"#);
    assert_eq!(token_expiry(&missing), None);

    let textual = create_test_token(r#"{"exp":"tomorrow"}"#);
    assert_eq!(token_expiry(&textual), None);
}

#[test]
fn test_is_token_expired_with_buffer() {
    let token = create_test_token(r#"{"exp":1768680000}"#);
    let buffer = refresh_buffer();

    assert!(!is_token_expired(&token, buffer, expiry() - Duration::minutes(10)));
    assert!(is_token_expired(&token, buffer, expiry() - Duration::minutes(4)));
    assert!(is_token_expired(&token, buffer, expiry() - Duration::minutes(5)));
    assert!(is_token_expired(&token, buffer, expiry() + Duration::seconds(1)));

    // Without buffer the exact expiry still counts as expired
    assert!(is_token_expired(&token, Duration::zero(), expiry()));
    assert!(!is_token_expired(
        &token,
        Duration::zero(),
        expiry() - Duration::seconds(1)
    ));
}

#[test]
fn test_is_token_expired_unknown_expiry() {
    let now = expiry();
    let no_exp = create_test_token(r#"{"sub":"user-1"}"#);

    assert!(!is_token_expired(&no_exp, refresh_buffer(), now));
    assert!(!is_token_expired("not-a-token", refresh_buffer(), now));
}

#[test]
fn test_is_token_expired_at_earliest_timestamp() {
    // chrono's lower bound: the buffer cannot be subtracted from it
    let token = create_test_token(r#"{"exp":-8334601228800}"#);
    assert_eq!(
        token_expiry(&token),
        DateTime::from_timestamp(-8_334_601_228_800, 0)
    );
    assert!(token_expiry(&token).is_some());

    assert!(is_token_expired(&token, refresh_buffer(), expiry()));
    assert!(is_token_expired(&token, Duration::zero(), expiry()));
}

#[test]
fn test_refresh_buffer() {
    assert_eq!(refresh_buffer(), Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES));
    assert_eq!(TOKEN_REFRESH_BUFFER_MINUTES, 5);
}

#[test]
fn test_looks_like_jwt() {
    let token = create_test_token(r#"{"exp":1}"#);
    assert!(looks_like_jwt(&token));

    assert!(!looks_like_jwt("eyJonly.two"));
    assert!(!looks_like_jwt("abc.def.ghi"));
    assert!(!looks_like_jwt(r#"{"response":"KO"}"#));
}

#[test]
fn test_remaining_hours_minutes() {
    assert_eq!(remaining_hours_minutes(Duration::minutes(125)), (2, 5));
    assert_eq!(remaining_hours_minutes(Duration::seconds(59)), (0, 0));
    assert_eq!(remaining_hours_minutes(Duration::hours(-1)), (0, 0));
}
