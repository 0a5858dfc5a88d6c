//! Authenticated profile endpoint.
//!
//! Pure read: decode the bearer token, look the user up by the embedded id,
//! return public fields. Role comes from storage, never from the token.

use axum::{extract::Extension, http::HeaderMap, Json};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::sezamo::error::AuthError;

use super::auth::state::AuthState;
use super::auth::storage;
use super::auth::token::Claims;
use super::auth::types::{ProfileResponse, UserData};

#[utoipa::path(
    get,
    path = "/api/user/get-profile",
    params(
        ("Authorization" = String, Header, description = "Bearer session token")
    ),
    responses(
        (status = 200, description = "Authenticated user profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "user"
)]
pub async fn get_profile(
    state: Extension<Arc<AuthState>>,
    pool: Extension<PgPool>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, AuthError> {
    let claims = authorize(&headers, &state)?;

    let user_id = Uuid::parse_str(&claims.id).map_err(|_| AuthError::InvalidToken)?;
    let user = storage::find_user_by_id(&pool, user_id)
        .await?
        .ok_or(AuthError::NotFound)?;

    Ok(Json(ProfileResponse::new(UserData {
        name: user.name,
        email: user.email,
        role: user.role,
        created_at: user.created_at.to_rfc3339(),
    })))
}

fn authorize(headers: &HeaderMap, state: &AuthState) -> Result<Claims, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::Unauthorized)?;
    Ok(state.tokens().verify(token)?)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sezamo::email::LogEmailSender;
    use crate::sezamo::handlers::auth::state::AuthConfig;
    use crate::sezamo::handlers::auth::token::TokenIssuer;
    use anyhow::Result;
    use axum::http::{HeaderValue, StatusCode};
    use axum::response::IntoResponse;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;

    fn auth_state() -> Arc<AuthState> {
        let config = AuthConfig::new("https://sezamo.dev".to_string());
        let tokens = TokenIssuer::new(SecretString::from("test-secret".to_string()));
        Arc::new(AuthState::new(config, tokens, Arc::new(LogEmailSender)))
    }

    fn lazy_pool() -> Result<PgPool> {
        Ok(PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?)
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() -> Result<()> {
        let response = get_profile(
            Extension(auth_state()),
            Extension(lazy_pool()?),
            HeaderMap::new(),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn non_bearer_header_is_unauthorized() -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Token abc"),
        );
        let response = get_profile(Extension(auth_state()), Extension(lazy_pool()?), headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-a-token"),
        );
        let response = get_profile(Extension(auth_state()), Extension(lazy_pool()?), headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn foreign_token_is_unauthorized() -> Result<()> {
        let foreign = TokenIssuer::new(SecretString::from("other-secret".to_string()));
        let token = foreign.issue("user-1", "a@x.com")?;
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        let response = get_profile(Extension(auth_state()), Extension(lazy_pool()?), headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
