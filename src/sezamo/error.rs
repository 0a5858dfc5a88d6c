//! Request-level error taxonomy for the auth endpoints.
//!
//! Every failure maps to the `{success: false, message}` envelope the clients
//! expect. Upstream failures (database, mail, Google) keep their source out of
//! the response body; the source is only logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::handlers::auth::otp::OtpError;
use super::handlers::auth::token::InvalidToken;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("User not found")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not Authorized, Login Again")]
    Unauthorized,
    #[error("Invalid or Expired Token")]
    InvalidToken,
    #[error("OTP not requested")]
    OtpNotRequested,
    #[error("OTP expired")]
    OtpExpired,
    #[error("Invalid OTP")]
    OtpMismatch,
    #[error("OTP verification required")]
    OtpNotVerified,
    #[error("User already exists")]
    Conflict,
    #[error("Something went wrong, try again later")]
    Upstream(#[source] anyhow::Error),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<OtpError> for AuthError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::NotRequested => Self::OtpNotRequested,
            OtpError::Expired => Self::OtpExpired,
            OtpError::Mismatch => Self::OtpMismatch,
            OtpError::NotVerified => Self::OtpNotVerified,
        }
    }
}

impl From<InvalidToken> for AuthError {
    fn from(_: InvalidToken) -> Self {
        Self::InvalidToken
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::Upstream(err.into())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.into())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_)
            | Self::OtpNotRequested
            | Self::OtpExpired
            | Self::OtpMismatch
            | Self::OtpNotVerified => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthorized | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Conflict => StatusCode::CONFLICT,
            Self::Upstream(source) => {
                error!("Upstream failure: {source:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
