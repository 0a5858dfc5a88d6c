pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        jwt_secret: SecretString,
        frontend_url: String,
        otp_ttl_seconds: u64,
        google_client_id: Option<String>,
        google_client_secret: Option<SecretString>,
        google_redirect_url: Option<String>,
    },
}
