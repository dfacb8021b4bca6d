use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// `Authorization` header value for HTTP Basic authentication.
pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}
