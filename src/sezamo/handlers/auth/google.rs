//! Google OAuth login: consent redirect and callback exchange.
//!
//! The callback exchanges the authorization code for an access token, reads
//! the verified profile, and finds or creates a local user for that email.
//! Accounts created this way store a sentinel password value that can never
//! match a real password, so they authenticate only via OAuth. The flow never
//! touches the OTP ledger; any failure redirects back to the frontend login
//! page instead of surfacing an error body.

use anyhow::{Context, Result};
use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::sezamo::APP_USER_AGENT;

use super::state::AuthState;
use super::storage;

/// Stored as the password of OAuth-only accounts. Not a valid PHC hash, so
/// password login can never match it.
const GOOGLE_AUTH_SENTINEL: &str = "google-auth";
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const OAUTH_ROLE: &str = "client";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Absent when the user denied consent.
    pub code: Option<String>,
}

/// Redirect the browser to Google's consent page.
pub async fn google_redirect(state: Extension<Arc<AuthState>>) -> Response {
    let Some(google) = state.config().google() else {
        error!("Google OAuth requested but not configured");
        return login_redirect(state.config().frontend_base_url());
    };

    let scopes = ["openid", "email", "profile"].join(" ");
    let auth_url = format!(
        "{GOOGLE_AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}",
        urlencoding::encode(google.client_id()),
        urlencoding::encode(google.redirect_url()),
        urlencoding::encode(&scopes),
    );

    Redirect::to(&auth_url).into_response()
}

/// Handle the provider callback and redirect to the frontend with a token.
pub async fn google_callback(
    state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
    Query(params): Query<CallbackParams>,
) -> Response {
    match callback_inner(&state, &pool, params).await {
        Ok(token) => {
            let base = state.config().frontend_base_url().trim_end_matches('/');
            Redirect::to(&format!("{base}/dashboard?token={token}")).into_response()
        }
        Err(err) => {
            error!("Google OAuth callback failed: {err:?}");
            login_redirect(state.config().frontend_base_url())
        }
    }
}

async fn callback_inner(
    state: &AuthState,
    pool: &PgPool,
    params: CallbackParams,
) -> Result<String> {
    let google = state
        .config()
        .google()
        .context("Google OAuth is not configured")?;
    let code = params.code.context("missing authorization code")?;

    #[derive(Serialize)]
    struct TokenExchangeRequest<'a> {
        code: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
        redirect_uri: &'a str,
        grant_type: &'a str,
    }

    #[derive(Deserialize)]
    struct TokenExchangeResponse {
        access_token: String,
    }

    #[derive(Deserialize)]
    struct UserInfo {
        email: String,
        name: Option<String>,
    }

    let client = reqwest::Client::builder()
        .user_agent(APP_USER_AGENT)
        .build()
        .context("failed to build OAuth HTTP client")?;

    let response = client
        .post(GOOGLE_TOKEN_URL)
        .form(&TokenExchangeRequest {
            code: &code,
            client_id: google.client_id(),
            client_secret: google.client_secret().expose_secret(),
            redirect_uri: google.redirect_url(),
            grant_type: "authorization_code",
        })
        .send()
        .await
        .context("token exchange request failed")?;

    if !response.status().is_success() {
        anyhow::bail!("token exchange failed with status {}", response.status());
    }

    let tokens: TokenExchangeResponse = response
        .json()
        .await
        .context("invalid token exchange response")?;

    let user_info: UserInfo = client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(&tokens.access_token)
        .send()
        .await
        .context("userinfo request failed")?
        .json()
        .await
        .context("invalid userinfo response")?;

    let email = user_info.email.trim().to_string();
    let user = match storage::find_user_by_email(pool, &email).await? {
        Some(user) => user,
        None => {
            let name = user_info.name.unwrap_or_else(|| email.clone());
            storage::insert_user(pool, &name, &email, GOOGLE_AUTH_SENTINEL, OAUTH_ROLE).await?
        }
    };

    state.tokens().issue(&user.id.to_string(), &user.email)
}

fn login_redirect(frontend_base_url: &str) -> Response {
    let base = frontend_base_url.trim_end_matches('/');
    Redirect::to(&format!("{base}/login")).into_response()
}
