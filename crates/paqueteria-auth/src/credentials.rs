//! Service-account key loading.
//!
//! Any problem here is a fatal setup error: the run must stop before it
//! touches the project.

use std::fmt;
use std::path::Path;

use paqueteria_core::{AppError, AppResult};
use serde::Deserialize;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a Google service-account key file used for signing.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Reads and validates the key file at `path`.
    pub async fn from_file(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::credentials(format!(
                "cannot read service account key '{}': {e}",
                path.display()
            ))
        })?;

        Self::from_json(&raw).map_err(|e| match e {
            AppError::Credentials(message) => {
                AppError::credentials(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Parses and validates a key from its JSON text.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let key: Self = serde_json::from_str(raw)
            .map_err(|e| AppError::credentials(format!("malformed service account key: {e}")))?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> AppResult<()> {
        if self.key_type != "service_account" {
            return Err(AppError::credentials(format!(
                "expected a 'service_account' key, got '{}'",
                self.key_type
            )));
        }
        if self.project_id.trim().is_empty() {
            return Err(AppError::credentials("project_id is empty"));
        }
        if self.client_email.trim().is_empty() {
            return Err(AppError::credentials("client_email is empty"));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(AppError::credentials("private_key is not a PEM private key"));
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
