use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed")]
    PasswordHash,

    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Hash a plaintext password into a salted PHC string.
///
/// The plaintext is never stored; only this hash reaches the database.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a plaintext password against a stored hash.
///
/// Fails with `InvalidCredentials` on mismatch or a malformed stored hash,
/// so callers cannot distinguish the two cases.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Mint a fresh opaque session token.
///
/// Tokens are plain lookup values stored on the user row; minting a new one
/// invalidates whatever token was stored before.
pub fn mint_token() -> String {
    Uuid::new_v4().to_string()
}
