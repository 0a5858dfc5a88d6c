//! In-memory OTP challenge ledger.
//!
//! The ledger keeps at most one live challenge per email. Issuing a new code
//! silently replaces any previous challenge for that address, and expiry is
//! enforced lazily when a code is checked rather than by a background sweeper.
//! Expired leftovers from abandoned flows are reclaimed on the next `issue`
//! while the table lock is already held.
//!
//! A process restart drops all pending challenges; callers simply re-request.

use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const DEFAULT_OTP_TTL: Duration = Duration::from_secs(5 * 60);

/// Tags a challenge as belonging to signup verification or login step-up.
/// A code issued for one flow can never be redeemed in the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpPurpose {
    Signup,
    Login,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChallengeState {
    Sent,
    Verified,
}

#[derive(Debug)]
struct Challenge {
    code: String,
    purpose: OtpPurpose,
    state: ChallengeState,
    issued_at: Instant,
}

impl Challenge {
    fn expired(&self, ttl: Duration) -> bool {
        self.issued_at.elapsed() >= ttl
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    /// No challenge exists for the email, or its purpose does not match.
    #[error("no pending challenge")]
    NotRequested,
    /// The challenge outlived its validity window and has been deleted.
    #[error("challenge expired")]
    Expired,
    /// The submitted code differs from the stored one.
    #[error("code mismatch")]
    Mismatch,
    /// Consumption was attempted before the signup code was verified.
    #[error("challenge not verified")]
    NotVerified,
}

/// Concurrency-safe table of pending challenges, keyed by email.
///
/// Owned by `AuthState` and injected into the handlers; tests build their own
/// isolated instances.
#[derive(Debug)]
pub struct OtpLedger {
    ttl: Duration,
    challenges: Mutex<HashMap<String, Challenge>>,
}

impl OtpLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_OTP_TTL,
            challenges: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Generate a fresh six-digit code for the email, replacing any prior
    /// challenge (last write wins). Returns the code for mail delivery, which
    /// must happen after this call so the table lock is never held across I/O.
    pub async fn issue(&self, email: &str, purpose: OtpPurpose) -> String {
        let code = generate_code();
        let ttl = self.ttl;
        let mut challenges = self.challenges.lock().await;
        challenges.retain(|_, challenge| !challenge.expired(ttl));
        challenges.insert(
            email.to_string(),
            Challenge {
                code: code.clone(),
                purpose,
                state: ChallengeState::Sent,
                issued_at: Instant::now(),
            },
        );
        code
    }

    /// Check a signup code. Success marks the challenge `Verified` but leaves
    /// it in the table: registration consumes it later.
    pub async fn verify_signup(&self, email: &str, code: &str) -> Result<(), OtpError> {
        let mut challenges = self.challenges.lock().await;
        Self::check(&mut challenges, email, code, OtpPurpose::Signup, self.ttl)?;
        if let Some(challenge) = challenges.get_mut(email) {
            challenge.state = ChallengeState::Verified;
        }
        Ok(())
    }

    /// The sole gate for account creation: requires a verified signup
    /// challenge and deletes it on success.
    pub async fn consume_for_registration(&self, email: &str) -> Result<(), OtpError> {
        let mut challenges = self.challenges.lock().await;
        let (purpose, expired, state) = match challenges.get(email) {
            Some(challenge) => (
                challenge.purpose,
                challenge.expired(self.ttl),
                challenge.state,
            ),
            None => return Err(OtpError::NotRequested),
        };
        if purpose != OtpPurpose::Signup {
            return Err(OtpError::NotRequested);
        }
        if expired {
            challenges.remove(email);
            return Err(OtpError::Expired);
        }
        if state != ChallengeState::Verified {
            return Err(OtpError::NotVerified);
        }
        challenges.remove(email);
        Ok(())
    }

    /// Check a login code. Login has no intervening form step, so a match
    /// deletes the challenge immediately (single use).
    pub async fn verify_login(&self, email: &str, code: &str) -> Result<(), OtpError> {
        let mut challenges = self.challenges.lock().await;
        Self::check(&mut challenges, email, code, OtpPurpose::Login, self.ttl)?;
        challenges.remove(email);
        Ok(())
    }

    fn check(
        challenges: &mut HashMap<String, Challenge>,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        ttl: Duration,
    ) -> Result<(), OtpError> {
        let (stored_purpose, expired, matches) = match challenges.get(email) {
            Some(challenge) => (
                challenge.purpose,
                challenge.expired(ttl),
                challenge.code == code,
            ),
            None => return Err(OtpError::NotRequested),
        };
        if stored_purpose != purpose {
            return Err(OtpError::NotRequested);
        }
        if expired {
            challenges.remove(email);
            return Err(OtpError::Expired);
        }
        if matches {
            Ok(())
        } else {
            Err(OtpError::Mismatch)
        }
    }
}

impl Default for OtpLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform random draw from the fixed-width six-digit space.
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const EMAIL: &str = "a@x.com";

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.parse::<u32>().is_ok());
        }
    }

    #[tokio::test]
    async fn signup_round_trip() {
        let ledger = OtpLedger::new();
        let code = ledger.issue(EMAIL, OtpPurpose::Signup).await;
        assert_eq!(ledger.verify_signup(EMAIL, &code).await, Ok(()));
        assert_eq!(ledger.consume_for_registration(EMAIL).await, Ok(()));
        // Consumption removed the challenge.
        assert_eq!(
            ledger.consume_for_registration(EMAIL).await,
            Err(OtpError::NotRequested)
        );
    }

    #[tokio::test]
    async fn verify_does_not_consume() {
        let ledger = OtpLedger::new();
        let code = ledger.issue(EMAIL, OtpPurpose::Signup).await;
        assert_eq!(ledger.verify_signup(EMAIL, &code).await, Ok(()));
        // The challenge survives verification until registration consumes it.
        assert_eq!(ledger.verify_signup(EMAIL, &code).await, Ok(()));
        assert_eq!(ledger.consume_for_registration(EMAIL).await, Ok(()));
    }

    #[tokio::test]
    async fn consume_requires_prior_verification() {
        let ledger = OtpLedger::new();
        let _code = ledger.issue(EMAIL, OtpPurpose::Signup).await;
        assert_eq!(
            ledger.consume_for_registration(EMAIL).await,
            Err(OtpError::NotVerified)
        );
    }

    #[tokio::test]
    async fn consume_without_challenge_fails() {
        let ledger = OtpLedger::new();
        assert_eq!(
            ledger.consume_for_registration(EMAIL).await,
            Err(OtpError::NotRequested)
        );
    }

    #[tokio::test]
    async fn reissue_invalidates_previous_code() {
        let ledger = OtpLedger::new();
        let first = ledger.issue(EMAIL, OtpPurpose::Signup).await;
        let second = loop {
            let code = ledger.issue(EMAIL, OtpPurpose::Signup).await;
            if code != first {
                break code;
            }
        };
        assert_eq!(
            ledger.verify_signup(EMAIL, &first).await,
            Err(OtpError::Mismatch)
        );
        assert_eq!(ledger.verify_signup(EMAIL, &second).await, Ok(()));
    }

    #[tokio::test]
    async fn expired_challenge_is_deleted_on_check() {
        let ledger = OtpLedger::new().with_ttl(Duration::ZERO);
        let code = ledger.issue(EMAIL, OtpPurpose::Signup).await;
        assert_eq!(
            ledger.verify_signup(EMAIL, &code).await,
            Err(OtpError::Expired)
        );
        // No residual challenge remains after the expiry check.
        assert_eq!(
            ledger.consume_for_registration(EMAIL).await,
            Err(OtpError::NotRequested)
        );
    }

    #[tokio::test]
    async fn login_code_is_single_use() {
        let ledger = OtpLedger::new();
        let code = ledger.issue(EMAIL, OtpPurpose::Login).await;
        assert_eq!(ledger.verify_login(EMAIL, &code).await, Ok(()));
        assert_eq!(
            ledger.verify_login(EMAIL, &code).await,
            Err(OtpError::NotRequested)
        );
    }

    #[tokio::test]
    async fn wrong_login_code_keeps_challenge() {
        let ledger = OtpLedger::new();
        let code = ledger.issue(EMAIL, OtpPurpose::Login).await;
        assert_eq!(
            ledger.verify_login(EMAIL, "000000").await,
            Err(OtpError::Mismatch)
        );
        assert_eq!(ledger.verify_login(EMAIL, &code).await, Ok(()));
    }

    #[tokio::test]
    async fn purposes_do_not_cross() {
        let ledger = OtpLedger::new();
        let code = ledger.issue(EMAIL, OtpPurpose::Login).await;
        assert_eq!(
            ledger.verify_signup(EMAIL, &code).await,
            Err(OtpError::NotRequested)
        );

        let code = ledger.issue(EMAIL, OtpPurpose::Signup).await;
        assert_eq!(
            ledger.verify_login(EMAIL, &code).await,
            Err(OtpError::NotRequested)
        );
    }

    #[tokio::test]
    async fn concurrent_issues_leave_one_challenge() {
        let ledger = Arc::new(OtpLedger::new());
        let first = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            async move { ledger.issue(EMAIL, OtpPurpose::Signup).await }
        });
        let second = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            async move { ledger.issue(EMAIL, OtpPurpose::Signup).await }
        });
        let first = first.await.expect("task panicked");
        let second = second.await.expect("task panicked");

        let challenges = ledger.challenges.lock().await;
        assert_eq!(challenges.len(), 1);
        let stored = &challenges[EMAIL].code;
        assert!(stored == &first || stored == &second);
    }

    #[tokio::test]
    async fn issue_sweeps_expired_entries() {
        let ledger = OtpLedger::new().with_ttl(Duration::ZERO);
        ledger.issue("stale@x.com", OtpPurpose::Signup).await;
        ledger.issue(EMAIL, OtpPurpose::Signup).await;

        let challenges = ledger.challenges.lock().await;
        assert!(!challenges.contains_key("stale@x.com"));
    }
}
