//! Signup flow: OTP dispatch, verification, and registration.

use axum::{extract::Extension, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::sezamo::email::OtpEmail;
use crate::sezamo::error::AuthError;
use crate::sezamo::handlers::{valid_email, valid_password};

use super::otp::OtpPurpose;
use super::state::AuthState;
use super::storage;
use super::types::{
    RegisterRequest, SendOtpRequest, StatusResponse, TokenResponse, VerifyOtpRequest,
};

#[utoipa::path(
    post,
    path = "/api/auth/send-otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP sent to email", body = StatusResponse),
        (status = 400, description = "Missing or malformed email"),
        (status = 500, description = "Mail delivery failed"),
    ),
    tag = "auth"
)]
pub async fn send_otp(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<SendOtpRequest>>,
) -> Result<Json<StatusResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::validation("Email required"));
    };
    let email = request.email.trim();
    if email.is_empty() {
        return Err(AuthError::validation("Email required"));
    }
    if !valid_email(email) {
        return Err(AuthError::validation("Invalid email format"));
    }

    // The ledger releases its lock before the mail leaves the process, so a
    // slow sender never stalls concurrent verification attempts.
    let code = state.ledger().issue(email, OtpPurpose::Signup).await;
    debug!(%email, %code, "signup OTP issued");

    let mail = OtpEmail::for_challenge(email, OtpPurpose::Signup, &code);
    state.sender().send(&mail).map_err(AuthError::Upstream)?;

    Ok(Json(StatusResponse::ok("OTP sent to email")))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP verified", body = StatusResponse),
        (status = 400, description = "Not requested, expired, or wrong code"),
    ),
    tag = "auth"
)]
pub async fn verify_otp(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> Result<Json<StatusResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::validation("Missing Details"));
    };

    state
        .ledger()
        .verify_signup(request.email.trim(), request.otp.trim())
        .await?;

    Ok(Json(StatusResponse::ok("OTP Verified")))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, token issued", body = TokenResponse),
        (status = 400, description = "Validation failure or missing OTP verification"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "auth"
)]
pub async fn register(
    state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::validation("Missing Details"));
    };
    let name = request.name.trim();
    let email = request.email.trim();
    let role = request.role.trim();
    if name.is_empty() || email.is_empty() || request.password.is_empty() || role.is_empty() {
        return Err(AuthError::validation("Missing Details"));
    }
    if !valid_email(email) {
        return Err(AuthError::validation("Invalid email"));
    }
    // Length is checked before the challenge is consumed, so a rejected form
    // does not burn the verified OTP.
    if !valid_password(&request.password) {
        return Err(AuthError::validation("Password must be 8+ characters"));
    }

    // Sole gate for account creation.
    state.ledger().consume_for_registration(email).await?;

    if storage::find_user_by_email(&pool, email).await?.is_some() {
        return Err(AuthError::Conflict);
    }

    let password_hash = super::hash_password(&request.password)?;
    let user = storage::insert_user(&pool, name, email, &password_hash, role)
        .await
        .map_err(|err| {
            if storage::is_unique_violation(&err) {
                AuthError::Conflict
            } else {
                AuthError::from(err)
            }
        })?;

    let token = state
        .tokens()
        .issue(&user.id.to_string(), &user.email)
        .map_err(AuthError::Upstream)?;

    Ok(Json(TokenResponse::new(token)))
}
