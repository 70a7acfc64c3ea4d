use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hashes a password with Argon2id and a fresh random salt.
///
/// The salt and parameters are embedded in the returned PHC string.
pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

/// Checks a candidate password against a stored hash.
///
/// `Ok(false)` is a clean mismatch; `Err` means the stored hash itself
/// could not be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, anyhow::Error> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_produces_phc_strings() {
        let hash = hash_password("correct horse battery staple").expect("hashing failed");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn matching_password_verifies() {
        let hash = hash_password("caja-registradora-99").expect("hashing failed");
        assert!(verify_password("caja-registradora-99", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_a_clean_mismatch() {
        let hash = hash_password("caja-registradora-99").expect("hashing failed");
        assert!(!verify_password("caja-registradora-00", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn salting_makes_hashes_unique() {
        let first = hash_password("repeat-after-me").expect("hashing failed");
        let second = hash_password("repeat-after-me").expect("hashing failed");
        assert_ne!(first, second);
        assert!(verify_password("repeat-after-me", &first).unwrap());
        assert!(verify_password("repeat-after-me", &second).unwrap());
    }
}
