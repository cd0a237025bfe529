use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use log::warn;

const BCRYPT_PREFIX: &str = "$2";

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with(BCRYPT_PREFIX)
}

/// Checks `password` against a stored entry, which is either a bcrypt hash
/// or a plaintext password.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_hashed(stored) {
        verify(password, stored).unwrap_or_else(|e| {
            warn!("Stored password hash could not be verified: {}", e);
            false
        })
    } else {
        password == stored
    }
}
