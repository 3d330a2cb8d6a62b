// SPDX-License-Identifier: MIT

//! Password hashing (PBKDF2-HMAC-SHA256).
//!
//! Each password gets a fresh random salt; the derived key and salt are
//! hex-encoded for storage. Verification re-derives and compares in
//! constant time.

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;
use subtle::ConstantTimeEq;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = ring::digest::SHA256_OUTPUT_LEN;

/// Salt and derived key, hex-encoded for Firestore storage.
#[derive(Debug, Clone)]
pub struct HashedPassword {
    pub salt: String,
    pub hash: String,
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<HashedPassword> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| anyhow::anyhow!("Failed to generate password salt"))?;

    let mut derived = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        ALGORITHM,
        NonZeroU32::new(ITERATIONS).expect("iteration count is non-zero"),
        &salt,
        password.as_bytes(),
        &mut derived,
    );

    Ok(HashedPassword {
        salt: hex::encode(salt),
        hash: hex::encode(derived),
    })
}

/// Verify a password against a stored salt and hash.
///
/// Malformed stored values verify as false rather than erroring, so a
/// corrupted credential document behaves like a wrong password.
pub fn verify_password(password: &str, salt_hex: &str, hash_hex: &str) -> bool {
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };
    if expected.len() != CREDENTIAL_LEN {
        return false;
    }

    let mut derived = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        ALGORITHM,
        NonZeroU32::new(ITERATIONS).expect("iteration count is non-zero"),
        &salt,
        password.as_bytes(),
        &mut derived,
    );

    derived.ct_eq(expected.as_slice()).into()
}
