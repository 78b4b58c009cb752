//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// A malformed stored hash counts as a mismatch
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("rahasia-123").unwrap();
        assert!(verify_password("rahasia-123", &hashed));
        assert!(!verify_password("rahasia-124", &hashed));
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
