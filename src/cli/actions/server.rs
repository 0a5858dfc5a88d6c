use crate::cli::actions::Action;
use crate::sezamo::{
    email::LogEmailSender,
    handlers::auth::state::{AuthConfig, AuthState, GoogleConfig},
    handlers::auth::token::TokenIssuer,
    new,
};
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            jwt_secret,
            frontend_url,
            otp_ttl_seconds,
            google_client_id,
            google_client_secret,
            google_redirect_url,
        } => {
            let mut config = AuthConfig::new(frontend_url).with_otp_ttl_seconds(otp_ttl_seconds);

            if let (Some(client_id), Some(client_secret)) = (google_client_id, google_client_secret)
            {
                let redirect_url = google_redirect_url.unwrap_or_else(|| {
                    format!("http://localhost:{port}/api/auth/google/callback")
                });
                config =
                    config.with_google(GoogleConfig::new(client_id, client_secret, redirect_url));
            }

            let tokens = TokenIssuer::new(jwt_secret);
            let auth_state = Arc::new(AuthState::new(config, tokens, Arc::new(LogEmailSender)));

            new(port, dsn, auth_state).await?;
        }
    }

    Ok(())
}
