// Password hashing for user accounts (bcrypt)

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a plaintext password
pub fn hash_password(password: &str) -> Result<String, String> {
    hash(password, DEFAULT_COST).map_err(|e| e.to_string())
}

/// Checks a plaintext password against a stored hash
///
/// # Returns
/// * `Ok(bool)` - Whether the password matches
/// * `Err(String)` - If the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_password_verifies() {
        let hash = hash_password("correct horse battery").expect("valid hash");
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong horse battery", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same password").expect("valid hash");
        let second = hash_password("same password").expect("valid hash");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
