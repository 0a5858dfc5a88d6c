//! Password login with OTP step-up.
//!
//! Step 1 verifies the password and mails a LOGIN code; no token leaves the
//! server until step 2 redeems that code. There is no path to a login OTP
//! without a prior password match.

use axum::{extract::Extension, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::sezamo::email::OtpEmail;
use crate::sezamo::error::AuthError;

use super::otp::OtpPurpose;
use super::state::AuthState;
use super::storage;
use super::types::{LoginRequest, LoginStepResponse, TokenResponse, VerifyLoginOtpRequest};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Password accepted, login OTP sent", body = LoginStepResponse),
        (status = 401, description = "Password mismatch"),
        (status = 404, description = "Unknown email"),
    ),
    tag = "auth"
)]
pub async fn login(
    state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginStepResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::validation("Missing Details"));
    };
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AuthError::validation("Missing Details"));
    }

    let user = storage::find_user_by_email(&pool, email)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !super::password_matches(&request.password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let code = state.ledger().issue(email, OtpPurpose::Login).await;
    debug!(%email, %code, "login OTP issued");

    let mail = OtpEmail::for_challenge(email, OtpPurpose::Login, &code);
    state.sender().send(&mail).map_err(AuthError::Upstream)?;

    Ok(Json(LoginStepResponse::otp_sent()))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-login-otp",
    request_body = VerifyLoginOtpRequest,
    responses(
        (status = 200, description = "Login complete, token issued", body = TokenResponse),
        (status = 400, description = "Not requested, expired, or wrong code"),
        (status = 404, description = "User no longer exists"),
    ),
    tag = "auth"
)]
pub async fn verify_login_otp(
    state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
    payload: Option<Json<VerifyLoginOtpRequest>>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::validation("Missing Details"));
    };
    let email = request.email.trim();

    // Single use: a match deletes the challenge before the user lookup.
    state
        .ledger()
        .verify_login(email, request.otp.trim())
        .await?;

    let user = storage::find_user_by_email(&pool, email)
        .await?
        .ok_or(AuthError::NotFound)?;

    let token = state
        .tokens()
        .issue(&user.id.to_string(), &user.email)
        .map_err(AuthError::Upstream)?;

    Ok(Json(TokenResponse::new(token)))
}
