// SPDX-License-Identifier: MIT

//! JWT authentication tests.
//!
//! These tests verify that session tokens created by the auth routes can be
//! decoded by the auth middleware, catching compatibility issues early.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use quitpuff::middleware::auth::{create_jwt, Claims, SESSION_TTL_SECS};

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

#[test]
fn test_jwt_roundtrip() {
    // A token created by the auth flow must decode with the middleware's
    // Claims struct and algorithm. If either side changes, this fails.
    let user_id = "a6f1b0de-9c41-4f5e-8d2a-1c3b5e7f9a0b";

    let token = create_jwt(user_id, SIGNING_KEY).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, user_id);
    assert!(token_data.claims.exp > 0);
    assert!(token_data.claims.iat > 0);
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_jwt_rejected_with_wrong_key() {
    let token = create_jwt("user-123", SIGNING_KEY).expect("Failed to create JWT");

    let wrong_key = DecodingKey::from_secret(b"a_completely_different_key_here!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &wrong_key, &validation).is_err());
}

#[test]
fn test_jwt_expiration_is_future() {
    use std::time::{SystemTime, UNIX_EPOCH};

    let token = create_jwt("user-123", SIGNING_KEY).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually

    let token_data = decode::<Claims>(&token, &key, &validation).unwrap();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // Should expire roughly SESSION_TTL_SECS from now, not before
    assert!(
        token_data.claims.exp > now + SESSION_TTL_SECS - 60,
        "Token expiration should be ~30 days in the future"
    );
}
