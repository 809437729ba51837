//! API configuration

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use domain_integration::{IntegrationRecord, MatrixSettings};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Log level
    pub log_level: String,
    /// Path of the integration catalog loaded at start-up
    pub catalog_path: Option<String>,
    /// Matrix adapter tunables
    pub matrix: MatrixSettings,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            log_level: "info".to_string(),
            catalog_path: None,
            matrix: MatrixSettings::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// Variables use the `API_` prefix; nested fields use `__`, e.g.
    /// `API_MATRIX__RETRY_CONDITION=transient_only`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Errors loading the integration catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Cannot read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Integration records and credential bundles known to the service
///
/// ```json
/// {
///   "integrations": [{ "id": "...", "tenant_id": "...", "integration_type": "matrix",
///                      "environment": "production", "credentials_ref": "clinic-a" }],
///   "credentials": { "clinic-a": { "production": { "apiUrl": "...", "apiToken": "..." } } }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationCatalog {
    #[serde(default)]
    pub integrations: Vec<IntegrationRecord>,
    #[serde(default)]
    pub credentials: HashMap<String, Value>,
}

impl IntegrationCatalog {
    /// Reads a JSON catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
            path: display,
            source,
        })
    }
}
