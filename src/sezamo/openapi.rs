//! OpenAPI document for the HTTP surface.
//!
//! The Google OAuth redirect pair is intentionally not documented; it only
//! makes sense in a browser.

use axum::Json;
use utoipa::OpenApi;

use super::handlers;
use super::handlers::auth::types::{
    LoginRequest, LoginStepResponse, ProfileResponse, RegisterRequest, SendOtpRequest,
    StatusResponse, TokenResponse, UserData, VerifyLoginOtpRequest, VerifyOtpRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::signup::send_otp,
        handlers::auth::signup::verify_otp,
        handlers::auth::signup::register,
        handlers::auth::login::login,
        handlers::auth::login::verify_login_otp,
        handlers::user::get_profile,
    ),
    components(schemas(
        SendOtpRequest,
        VerifyOtpRequest,
        RegisterRequest,
        LoginRequest,
        VerifyLoginOtpRequest,
        StatusResponse,
        TokenResponse,
        LoginStepResponse,
        ProfileResponse,
        UserData,
    )),
    tags(
        (name = "auth", description = "Signup, login, and OTP verification"),
        (name = "user", description = "Authenticated profile access"),
        (name = "health", description = "Service liveness"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

// axum handler serving the generated document
pub(crate) async fn serve() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
