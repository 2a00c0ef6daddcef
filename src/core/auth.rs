//! Bearer credentials for the admin backend
//!
//! A [`Credential`] is obtained once (by logging in, or from configuration)
//! and handed to the HTTP client at construction time. Nothing in this crate
//! reads a token from process-wide state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token attached to every request as `Authorization: Bearer <token>`
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wrap a token; surrounding whitespace is trimmed
    ///
    /// Returns `None` for an empty token, which is treated as anonymous.
    pub fn bearer(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self { token })
        }
    }

    /// The raw token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The value of the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response
///
/// Backends differ on the token key; both `access_token` and `token` are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// The credential carried by this response, if any
    pub fn into_credential(self) -> Option<Credential> {
        self.access_token
            .or(self.token)
            .and_then(Credential::bearer)
    }
}
