//! Seeding behaviour switches.

use std::env;
use std::fmt;
use std::str::FromStr;

use paqueteria_core::{AppError, AppResult};

use crate::parse_flag;

/// How profile documents in `usuarios` are keyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileKeyStrategy {
    /// Key by the account's uid (what the mobile app reads).
    #[default]
    Uid,
    /// Key by the sanitized email, e.g. `admin_at_paqueteria_com`.
    Email,
}

impl FromStr for ProfileKeyStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uid" => Ok(Self::Uid),
            "email" => Ok(Self::Email),
            other => Err(AppError::config(format!(
                "SEED_PROFILE_KEY must be 'uid' or 'email', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ProfileKeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uid => f.write_str("uid"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// Configuration for a seeding run.
///
/// # Environment Variables
///
/// - `SEED_RESET_COLLECTIONS`: wipe sample collections before inserting (default: `true`)
/// - `SEED_PROFILE_KEY`: `uid` or `email` (default: `uid`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedConfig {
    pub reset_collections: bool,
    pub profile_key: ProfileKeyStrategy,
}

impl SeedConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let reset_collections = match lookup("SEED_RESET_COLLECTIONS") {
            Some(raw) if !raw.trim().is_empty() => parse_flag("SEED_RESET_COLLECTIONS", &raw)?,
            _ => defaults.reset_collections,
        };

        let profile_key = match lookup("SEED_PROFILE_KEY") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.profile_key,
        };

        Ok(Self {
            reset_collections,
            profile_key,
        })
    }

    /// Sets whether sample collections are wiped before seeding.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset_collections = reset;
        self
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            reset_collections: true,
            profile_key: ProfileKeyStrategy::Uid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SeedConfig::from_lookup(|_| None).unwrap();
        assert!(config.reset_collections);
        assert_eq!(config.profile_key, ProfileKeyStrategy::Uid);
    }

    #[test]
    fn test_reads_flags() {
        let config = SeedConfig::from_lookup(|name| match name {
            "SEED_RESET_COLLECTIONS" => Some("no".to_string()),
            "SEED_PROFILE_KEY" => Some("Email".to_string()),
            _ => None,
        })
        .unwrap();

        assert!(!config.reset_collections);
        assert_eq!(config.profile_key, ProfileKeyStrategy::Email);
    }

    #[test]
    fn test_rejects_unknown_values() {
        let err = SeedConfig::from_lookup(|name| {
            (name == "SEED_RESET_COLLECTIONS").then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        assert!("rut".parse::<ProfileKeyStrategy>().is_err());
    }

    #[test]
    fn test_with_reset_overrides_environment() {
        let config = SeedConfig::default().with_reset(false);
        assert!(!config.reset_collections);
    }
}
