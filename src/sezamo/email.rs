//! OTP email delivery abstraction.
//!
//! Handlers build an `OtpEmail` after the ledger has stored the challenge and
//! released its lock, then hand it to an `EmailSender`. The sender decides how
//! to deliver (SMTP, API, etc.) and returns `Ok`/`Err`; a delivery error is
//! surfaced to the caller as a generic upstream failure.
//!
//! The default sender for local dev is `LogEmailSender`, which logs and
//! returns `Ok(())`.

use anyhow::Result;
use tracing::info;

use super::handlers::auth::otp::OtpPurpose;

#[derive(Clone, Debug)]
pub struct OtpEmail {
    pub to_email: String,
    pub subject: String,
    pub body: String,
}

impl OtpEmail {
    #[must_use]
    pub fn for_challenge(to_email: &str, purpose: OtpPurpose, code: &str) -> Self {
        let (subject, body) = match purpose {
            OtpPurpose::Signup => (
                "Signup OTP Verification",
                format!("Your OTP Code is: {code}. It will expire in 5 minutes."),
            ),
            OtpPurpose::Login => (
                "Login OTP Verification",
                format!("Your Login OTP is: {code}. It will expire in 5 minutes."),
            ),
        };
        Self {
            to_email: to_email.to_string(),
            subject: subject.to_string(),
            body,
        }
    }
}

/// Email delivery abstraction used by the auth handlers.
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error to surface a send failure.
    fn send(&self, message: &OtpEmail) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &OtpEmail) -> Result<()> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            body = %message.body,
            "email send stub"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_mail_carries_the_code() {
        let mail = OtpEmail::for_challenge("a@x.com", OtpPurpose::Signup, "123456");
        assert_eq!(mail.to_email, "a@x.com");
        assert_eq!(mail.subject, "Signup OTP Verification");
        assert!(mail.body.contains("123456"));
    }

    #[test]
    fn login_mail_uses_login_wording() {
        let mail = OtpEmail::for_challenge("a@x.com", OtpPurpose::Login, "654321");
        assert_eq!(mail.subject, "Login OTP Verification");
        assert!(mail.body.starts_with("Your Login OTP is: 654321"));
    }

    #[test]
    fn log_sender_always_succeeds() {
        let mail = OtpEmail::for_challenge("a@x.com", OtpPurpose::Signup, "123456");
        assert!(LogEmailSender.send(&mail).is_ok());
    }
}
