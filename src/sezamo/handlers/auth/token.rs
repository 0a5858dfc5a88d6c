//! Session token issuance and verification.
//!
//! Tokens are stateless HS256 credentials carrying exactly two identity
//! claims, `id` and `email`. Role is deliberately excluded on every issuance
//! path, so authorization decisions must re-fetch the role from storage
//! rather than trusting the token. Revocation is not supported.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Bad signature, expiry, and malformed input all collapse into this single
/// outcome; callers cannot distinguish tampering from a stale token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid or expired token")]
pub struct InvalidToken;

#[derive(Debug)]
pub struct TokenIssuer {
    secret: SecretString,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            ttl: Duration::days(DEFAULT_TOKEN_TTL_DAYS),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign a credential for a completed auth flow.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .context("failed to sign session token")
    }

    /// Signature and expiry check.
    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| InvalidToken)
    }
}
