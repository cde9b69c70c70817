//! Firebase project configuration.

use std::env;
use std::path::PathBuf;

use paqueteria_core::{AppError, AppResult};

/// Service-account key looked up in the working directory when
/// `FIREBASE_CREDENTIALS` is not set.
pub const DEFAULT_CREDENTIALS_PATH: &str = "paqueteria-web-app-firebase-adminsdk.json";

/// Firestore database used when `FIRESTORE_DATABASE` is not set.
pub const DEFAULT_DATABASE_ID: &str = "(default)";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
const FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Connection settings for the Firebase project being provisioned.
///
/// # Environment Variables
///
/// - `FIREBASE_CREDENTIALS`: path to the service-account JSON key
/// - `FIREBASE_PROJECT_ID`: overrides the project id found in the key
/// - `FIRESTORE_DATABASE`: database id (default: `(default)`)
/// - `FIREBASE_AUTH_EMULATOR_HOST`: `host:port` of the Auth emulator
/// - `FIRESTORE_EMULATOR_HOST`: `host:port` of the Firestore emulator
/// - `HTTP_TIMEOUT_SECS`: per-request timeout (default: `30`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub credentials_path: PathBuf,
    pub project_id: Option<String>,
    pub database_id: String,
    pub auth_emulator_host: Option<String>,
    pub firestore_emulator_host: Option<String>,
    pub http_timeout_secs: u64,
}

impl FirebaseConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_timeout_secs = match non_empty("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::config(format!(
                    "HTTP_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        if http_timeout_secs == 0 {
            return Err(AppError::config("HTTP_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Self {
            credentials_path: non_empty("FIREBASE_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            project_id: non_empty("FIREBASE_PROJECT_ID"),
            database_id: non_empty("FIRESTORE_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE_ID.to_string()),
            auth_emulator_host: non_empty("FIREBASE_AUTH_EMULATOR_HOST"),
            firestore_emulator_host: non_empty("FIRESTORE_EMULATOR_HOST"),
            http_timeout_secs,
        })
    }

    /// Replaces the credentials path, e.g. from a `--credentials` flag.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// True when both services are served by local emulators, in which case
    /// no service-account key is required.
    pub fn uses_emulators_only(&self) -> bool {
        self.auth_emulator_host.is_some() && self.firestore_emulator_host.is_some()
    }

    /// Base URL of the Identity Toolkit API (without the `/v1` segment).
    pub fn identity_toolkit_url(&self) -> String {
        match &self.auth_emulator_host {
            Some(host) => format!("http://{host}/identitytoolkit.googleapis.com"),
            None => IDENTITY_TOOLKIT_URL.to_string(),
        }
    }

    /// Base URL of the Firestore API (without the `/v1` segment).
    pub fn firestore_url(&self) -> String {
        match &self.firestore_emulator_host {
            Some(host) => format!("http://{host}"),
            None => FIRESTORE_URL.to_string(),
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            project_id: None,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            auth_emulator_host: None,
            firestore_emulator_host: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppResult<FirebaseConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FirebaseConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, FirebaseConfig::default());
        assert_eq!(config.identity_toolkit_url(), "https://identitytoolkit.googleapis.com");
        assert_eq!(config.firestore_url(), "https://firestore.googleapis.com");
        assert!(!config.uses_emulators_only());
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("FIREBASE_CREDENTIALS", "/etc/keys/sa.json"),
            ("FIREBASE_PROJECT_ID", "paqueteria-web-app"),
            ("FIRESTORE_DATABASE", "staging"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.credentials_path, PathBuf::from("/etc/keys/sa.json"));
        assert_eq!(config.project_id.as_deref(), Some("paqueteria-web-app"));
        assert_eq!(config.database_id, "staging");
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("FIREBASE_PROJECT_ID", "  "), ("FIRESTORE_DATABASE", "")])
            .unwrap();
        assert_eq!(config.project_id, None);
        assert_eq!(config.database_id, DEFAULT_DATABASE_ID);
    }

    #[test]
    fn test_emulator_urls() {
        let config = config_from(&[
            ("FIREBASE_AUTH_EMULATOR_HOST", "localhost:9099"),
            ("FIRESTORE_EMULATOR_HOST", "127.0.0.1:8080"),
        ])
        .unwrap();

        assert!(config.uses_emulators_only());
        assert_eq!(
            config.identity_toolkit_url(),
            "http://localhost:9099/identitytoolkit.googleapis.com"
        );
        assert_eq!(config.firestore_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_timeout_is_a_config_error() {
        let err = config_from(&[("HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = config_from(&[("HTTP_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.is_fatal_setup());
    }

    #[test]
    fn test_credentials_override() {
        let config = FirebaseConfig::default().with_credentials_path("keys/other.json");
        assert_eq!(config.credentials_path, PathBuf::from("keys/other.json"));
    }
}
