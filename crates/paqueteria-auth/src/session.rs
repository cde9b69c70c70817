//! The authenticated session handle.

use std::fmt;

use chrono::Utc;
use paqueteria_config::FirebaseConfig;
use paqueteria_core::{AppError, AppResult};
use reqwest::Client;
use tracing::{info, warn};

use crate::credentials::ServiceAccountKey;
use crate::token::{create_assertion, exchange_assertion};

/// Bearer token the Firebase emulators accept for privileged requests.
pub const EMULATOR_TOKEN: &str = "owner";

/// An authenticated session against one Firebase project.
///
/// Created once per run and passed explicitly to the clients that need it.
#[derive(Clone)]
pub struct Session {
    project_id: String,
    access_token: String,
}

impl Session {
    /// Authenticates with the service-account key named by `config`.
    ///
    /// When both services run on local emulators the key is optional: the
    /// emulators accept the `owner` token and only the project id is needed.
    ///
    /// # Errors
    ///
    /// Every error returned here is fatal setup: missing or invalid key,
    /// missing project id, or a rejected token exchange.
    pub async fn establish(config: &FirebaseConfig, http: &Client) -> AppResult<Self> {
        if config.uses_emulators_only() {
            let key = match ServiceAccountKey::from_file(&config.credentials_path).await {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!(
                        error = %e,
                        "No usable service account key, relying on emulator settings"
                    );
                    None
                }
            };

            let project_id = config
                .project_id
                .clone()
                .or_else(|| key.map(|k| k.project_id))
                .ok_or_else(|| {
                    AppError::config("FIREBASE_PROJECT_ID is required when using emulators")
                })?;

            info!(project_id = %project_id, "Using Firebase emulators");
            return Ok(Self::emulator(project_id));
        }

        let key = ServiceAccountKey::from_file(&config.credentials_path).await?;
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());

        let assertion = create_assertion(&key, Utc::now())?;
        let token = exchange_assertion(http, &key.token_uri, &assertion).await?;

        info!(
            project_id = %project_id,
            client_email = %key.client_email,
            expires_at = %token.expires_at,
            "Authenticated with service account"
        );

        Ok(Self {
            project_id,
            access_token: token.token,
        })
    }

    /// A session for the local emulators.
    pub fn emulator(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            access_token: EMULATOR_TOKEN.to_string(),
        }
    }

    /// A session from an already obtained token.
    pub fn with_token(project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn bearer_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn emulator_config() -> FirebaseConfig {
        FirebaseConfig {
            credentials_path: PathBuf::from("missing/key.json"),
            project_id: Some("demo-paqueteria".into()),
            auth_emulator_host: Some("localhost:9099".into()),
            firestore_emulator_host: Some("localhost:8080".into()),
            ..FirebaseConfig::default()
        }
    }

    #[tokio::test]
    async fn test_emulator_session_does_not_need_a_key() {
        let session = Session::establish(&emulator_config(), &Client::new())
            .await
            .unwrap();

        assert_eq!(session.project_id(), "demo-paqueteria");
        assert_eq!(session.bearer_token(), EMULATOR_TOKEN);
    }

    #[tokio::test]
    async fn test_emulator_session_requires_project_id() {
        let config = FirebaseConfig {
            project_id: None,
            ..emulator_config()
        };

        let err = Session::establish(&config, &Client::new()).await.unwrap_err();
        assert!(err.is_fatal_setup());
    }

    #[tokio::test]
    async fn test_missing_key_aborts_production_session() {
        let config = FirebaseConfig {
            credentials_path: PathBuf::from("missing/key.json"),
            ..FirebaseConfig::default()
        };

        let err = Session::establish(&config, &Client::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Credentials(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::with_token("p", "ya29.secret");
        assert!(!format!("{session:?}").contains("ya29.secret"));
    }
}
