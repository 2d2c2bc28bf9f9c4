use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    /// Stand-in hash verified when a login names no stored account, so both
    /// failure paths pay for one Argon2 run.
    static ref ABSENT_ACCOUNT_HASH: Option<String> = hash_password("absent-account").ok();
}

fn argon_failure(op: &'static str, e: password_hash::Error) -> anyhow::Error {
    error!(error = %e, op, "argon2 failure");
    anyhow::anyhow!("argon2 {op}: {e}")
}

/// Hashes a plaintext secret into an Argon2 PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| argon_failure("hash", e))
}

/// Returns `Ok(false)` on mismatch; errors only when the stored hash is unreadable.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| argon_failure("parse", e))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(argon_failure("verify", e)),
    }
}

/// Verifies `plain` against the stored hash of a looked-up account.
///
/// With no account, the stand-in hash is verified instead and the result is
/// always `false`, so the cost matches a wrong password.
pub fn verify_stored(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    match stored {
        Some(hash) => verify_password(plain, hash),
        None => {
            let absent = ABSENT_ACCOUNT_HASH
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("argon2 stand-in hash unavailable"))?;
            verify_password(plain, absent)?;
            Ok(false)
        }
    }
}
