//! Auth state and configuration.
//!
//! `AuthState` owns the OTP ledger, token issuer, and mail sender, and is
//! injected into the handlers as one `Extension`. Tests build independent
//! instances for isolation instead of sharing process-global state.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::sezamo::email::EmailSender;

use super::otp::OtpLedger;
use super::token::TokenIssuer;

const DEFAULT_OTP_TTL_SECONDS: u64 = 5 * 60;

/// Google OAuth client credentials. Absent when the deployment does not
/// enable the OAuth login flow.
#[derive(Clone, Debug)]
pub struct GoogleConfig {
    client_id: String,
    client_secret: SecretString,
    redirect_url: String,
}

impl GoogleConfig {
    #[must_use]
    pub fn new(client_id: String, client_secret: SecretString, redirect_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_url,
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    #[must_use]
    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    otp_ttl_seconds: u64,
    google: Option<GoogleConfig>,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            otp_ttl_seconds: DEFAULT_OTP_TTL_SECONDS,
            google: None,
        }
    }

    #[must_use]
    pub fn with_otp_ttl_seconds(mut self, seconds: u64) -> Self {
        self.otp_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_google(mut self, google: GoogleConfig) -> Self {
        self.google = Some(google);
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn otp_ttl_seconds(&self) -> u64 {
        self.otp_ttl_seconds
    }

    #[must_use]
    pub fn google(&self) -> Option<&GoogleConfig> {
        self.google.as_ref()
    }
}

pub struct AuthState {
    config: AuthConfig,
    ledger: OtpLedger,
    tokens: TokenIssuer,
    sender: Arc<dyn EmailSender>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, tokens: TokenIssuer, sender: Arc<dyn EmailSender>) -> Self {
        let ledger = OtpLedger::new().with_ttl(Duration::from_secs(config.otp_ttl_seconds()));
        Self {
            config,
            ledger,
            tokens,
            sender,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &OtpLedger {
        &self.ledger
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn sender(&self) -> &dyn EmailSender {
        self.sender.as_ref()
    }
}
