//! Credential resolution
//!
//! Credential bundles are stored per integration under its `credentials_ref`,
//! with one entry per upstream environment:
//!
//! ```json
//! {
//!   "production": { "apiUrl": "https://...", "apiToken": "...", "username": "...", "password": "..." },
//!   "test":       { "apiUrl": "https://...", "apiToken": "..." }
//! }
//! ```
//!
//! Credentials are resolved fresh for every call and never kept by the
//! adapter. Any missing required field is a configuration error: fatal, not
//! retried, and not reported as an upstream failure.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::IntegrationError;
use crate::integration::IntegrationRecord;
use crate::ports::CredentialsStore;

/// Typed credentials for one Matrix environment
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCredentials {
    pub api_url: String,
    pub api_token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl MatrixCredentials {
    /// Returns the login pair used by session-token endpoints
    pub fn session_login(&self) -> Result<(&str, &str), IntegrationError> {
        let username = self
            .username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| IntegrationError::configuration("Matrix credentials are missing username"))?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| IntegrationError::configuration("Matrix credentials are missing password"))?;
        Ok((username, password))
    }
}

// Secrets stay out of logs.
impl fmt::Debug for MatrixCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixCredentials")
            .field("api_url", &self.api_url)
            .field("api_token", &"***")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Resolves typed credentials for an integration's configured environment
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn CredentialsStore>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn CredentialsStore>) -> Self {
        Self { store }
    }

    /// Looks up and validates the Matrix credentials for `integration`
    ///
    /// # Errors
    ///
    /// `IntegrationError::Configuration` when the bundle or its environment
    /// entry is missing, malformed, or lacks `apiUrl`/`apiToken`.
    pub async fn resolve(
        &self,
        integration: &IntegrationRecord,
    ) -> Result<MatrixCredentials, IntegrationError> {
        let bundle = self
            .store
            .get(&integration.credentials_ref)
            .await
            .map_err(|e| {
                IntegrationError::configuration(format!(
                    "Credentials store lookup failed for {}: {}",
                    integration.credentials_ref, e
                ))
            })?
            .ok_or_else(|| {
                IntegrationError::configuration(format!(
                    "No credentials registered under {}",
                    integration.credentials_ref
                ))
            })?;

        let environment = integration.environment.as_str();
        let entry = bundle.get(environment).cloned().ok_or_else(|| {
            IntegrationError::configuration(format!(
                "Credentials {} have no {} entry",
                integration.credentials_ref, environment
            ))
        })?;

        let credentials: MatrixCredentials = serde_json::from_value(entry).map_err(|e| {
            IntegrationError::configuration(format!(
                "Credentials {} ({}) are malformed: {}",
                integration.credentials_ref, environment, e
            ))
        })?;

        if credentials.api_url.trim().is_empty() {
            return Err(IntegrationError::configuration(format!(
                "Credentials {} ({}) are missing apiUrl",
                integration.credentials_ref, environment
            )));
        }
        if credentials.api_token.trim().is_empty() {
            return Err(IntegrationError::configuration(format!(
                "Credentials {} ({}) are missing apiToken",
                integration.credentials_ref, environment
            )));
        }

        Ok(credentials)
    }
}
