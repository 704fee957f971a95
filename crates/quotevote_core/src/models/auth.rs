//! Login and registration payloads.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Body of `POST /login` and `POST /register`.
///
/// The password travels base64-encoded from its UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: encode_password(password),
        }
    }
}

/// Successful `POST /login` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
}

pub fn encode_password(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}
