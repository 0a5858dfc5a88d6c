//! Request/response types for the auth endpoints.
//!
//! Every response keeps the `{success: bool, ...}` envelope the frontend
//! checks before reading any other field.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyLoginOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl TokenResponse {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}

/// Step indicator returned by password login so the client knows to prompt
/// for the emailed code. No token is issued at this stage.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginStepResponse {
    pub success: bool,
    pub step: String,
    pub message: String,
}

impl LoginStepResponse {
    #[must_use]
    pub fn otp_sent() -> Self {
        Self {
            success: true,
            step: "OTP_SENT".to_string(),
            message: "Login OTP sent".to_string(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserData {
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(rename = "userData")]
    pub user_data: UserData,
}

impl ProfileResponse {
    #[must_use]
    pub fn new(user_data: UserData) -> Self {
        Self {
            success: true,
            user_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn register_request_round_trips() -> Result<()> {
        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct-horse".to_string(),
            role: "client".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "alice@example.com");
        let decoded: RegisterRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.role, "client");
        Ok(())
    }

    #[test]
    fn login_step_response_signals_otp_sent() -> Result<()> {
        let value = serde_json::to_value(LoginStepResponse::otp_sent())?;
        assert_eq!(
            value.get("step").and_then(serde_json::Value::as_str),
            Some("OTP_SENT")
        );
        assert_eq!(
            value.get("success").and_then(serde_json::Value::as_bool),
            Some(true)
        );
        Ok(())
    }

    #[test]
    fn profile_response_uses_user_data_key() -> Result<()> {
        let response = ProfileResponse::new(UserData {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: "client".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        });
        let value = serde_json::to_value(&response)?;
        assert!(value.get("userData").is_some());
        assert!(value.get("user_data").is_none());
        Ok(())
    }
}
