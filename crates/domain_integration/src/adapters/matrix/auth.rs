//! Request authentication for the Matrix API
//!
//! Most endpoints take the integration's static API token as a bearer
//! `Authorization` header. Patient lookup and password recovery need a
//! session token instead: the adapter logs in with the integration's
//! username/password and sends the token it gets back as `Token: Bearer <token>`.

use crate::credentials::MatrixCredentials;
use crate::error::IntegrationError;

/// Header carrying the static API token
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header carrying the session token, with the same `Bearer` scheme
pub const SESSION_TOKEN_HEADER: &str = "Token";

/// Login endpoint used to obtain session tokens
pub const LOGIN_PATH: &str = "/login";

/// Authentication family of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    StaticToken,
    SessionToken,
}

/// Authentication material for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAuth {
    StaticToken { api_token: String },
    SessionToken { username: String, password: String },
}

impl AuthMode {
    /// Picks the credential fields this mode needs
    ///
    /// # Errors
    ///
    /// `Configuration` when a session-token endpoint is called for an
    /// integration without username/password.
    pub fn resolve(&self, credentials: &MatrixCredentials) -> Result<ResolvedAuth, IntegrationError> {
        match self {
            AuthMode::StaticToken => Ok(ResolvedAuth::StaticToken {
                api_token: credentials.api_token.clone(),
            }),
            AuthMode::SessionToken => {
                let (username, password) = credentials.session_login()?;
                Ok(ResolvedAuth::SessionToken {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
        }
    }
}

/// Formats a bearer credential
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Joins the credentials' base URL and a relative path with exactly one `/`
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
