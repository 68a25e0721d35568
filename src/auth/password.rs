use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use subtle::ConstantTimeEq;

use crate::config::AdminConfig;

/// Argon2id with 19MB memory, 2 iterations, parallelism 1.
fn hasher() -> Result<Argon2<'static>, String> {
    let params = Params::new(19 * 1024, 2, 1, None).map_err(|e| format!("Invalid params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Produce the PHC string expected in `INTAKE_ADMIN_PASSWORD_HASH`.
pub fn hash(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| format!("Hashing failed: {e}"))
}

pub fn verify(password: &str, hash: &str) -> Result<bool, String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("Invalid hash: {e}"))?;
    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check a login attempt against the configured admin account.
///
/// The password is verified even when the username is wrong so both
/// failure paths take the same time.
pub fn check_admin(admin: &AdminConfig, username: &str, password: &str) -> Result<bool, String> {
    let username_ok: bool = username
        .as_bytes()
        .ct_eq(admin.username.as_bytes())
        .into();
    let password_ok = verify(password, &admin.password_hash)?;
    Ok(username_ok && password_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let h = hash("hunter22").unwrap();
        assert!(h.starts_with("$argon2id$"));
        assert!(verify("hunter22", &h).unwrap());
        assert!(!verify("hunter23", &h).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify("hunter22", "not-a-phc-string").is_err());
    }

    #[test]
    fn admin_needs_both_username_and_password() {
        let admin = AdminConfig {
            username: "admin".to_string(),
            password_hash: hash("hunter22").unwrap(),
        };
        assert!(check_admin(&admin, "admin", "hunter22").unwrap());
        assert!(!check_admin(&admin, "admin", "wrong-pass").unwrap());
        assert!(!check_admin(&admin, "root", "hunter22").unwrap());
    }
}
