//! Argon2id password hashing for stored user credentials.
//!
//! Hashes are stored in PHC string form so the parameters and salt travel with them.

use std::sync::OnceLock;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

pub const MIN_PASSWORD_LENGTH: usize = 5;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only for an unparseable stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Run a full verify against a throwaway hash and report no match.
///
/// Login calls this for unknown usernames so both failure paths pay for one Argon2 verify.
pub fn verify_password_for_unknown_user(password: &str) -> bool {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let Some(hash) = DUMMY_HASH
        .get_or_init(|| hash_password("unknown-user-placeholder").ok())
        .as_deref()
    else {
        return false;
    };

    // Result ignored: the caller is rejected either way.
    let _ = verify_password(password, hash);
    false
}
