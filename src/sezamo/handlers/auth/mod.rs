//! Auth flows and supporting modules.
//!
//! Three flows complete with a session token:
//!
//! - **Signup**: `send-otp` issues a SIGNUP challenge and mails the code,
//!   `verify-otp` marks it verified, `register` consumes it and creates the
//!   user.
//! - **Password login**: `login` checks the password and issues a LOGIN
//!   challenge (step indicator, no token); `verify-login-otp` redeems the
//!   single-use code and issues the token.
//! - **Google OAuth**: redirect/callback pair; never touches the OTP ledger.
//!
//! The ledger, token issuer, and mail sender live in `AuthState` and are
//! injected through an `Extension` layer.

pub mod google;
pub mod login;
pub mod otp;
pub mod signup;
pub mod state;
pub(crate) mod storage;
pub mod token;
pub mod types;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::sezamo::error::AuthError;

/// Hash a password with Argon2id, producing a PHC-formatted string.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Upstream(anyhow::anyhow!("failed to hash password: {err}")))
}

/// Verify a password against a stored PHC hash. The sentinel value stored for
/// OAuth-only accounts is not a valid hash, so it never matches any password.
pub(crate) fn password_matches(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
