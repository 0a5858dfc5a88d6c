//! HTTP handlers and shared validation helpers.

pub mod auth;
pub mod health;
pub mod user;

use regex::Regex;

/// Lightweight email sanity check used by auth handlers before touching state.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Passwords must carry at least eight characters.
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= 8
}

// axum handler for the root banner
pub async fn root() -> &'static str {
    "API working..."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn valid_password_checks_length() {
        assert!(valid_password("12345678"));
        assert!(!valid_password("short"));
        // Characters, not bytes.
        assert!(valid_password("pásswörd"));
    }
}
