//! Error taxonomy for provisioning runs.
//!
//! Errors fall into three groups:
//!
//! - **Fatal setup** ([`AppError::Credentials`], [`AppError::Config`],
//!   [`AppError::TokenExchange`]): the run cannot start and must abort before
//!   any remote mutation.
//! - **Duplicate identity** ([`AppError::DuplicateIdentity`]): an account with
//!   the same email already exists. Callers treat this as "already present",
//!   not as a failure.
//! - **Per-item** (everything else): the current account or document is
//!   skipped and the batch continues.

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("credentials error: {0}")]
    Credentials(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("an account with email '{0}' already exists")]
    DuplicateIdentity(String),

    #[error("no account found for email '{0}'")]
    AccountNotFound(String),

    #[error("remote service returned {status}: {message}")]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl AppError {
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }

    /// Builds a [`AppError::Remote`] from an HTTP status and the provider's
    /// error payload.
    pub fn remote(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            code,
            message: message.into(),
        }
    }

    /// True when the error means the account already exists.
    pub fn is_duplicate_identity(&self) -> bool {
        matches!(self, Self::DuplicateIdentity(_))
    }

    /// True for errors that must abort the run before any mutation.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(
            self,
            Self::Credentials(_) | Self::Config(_) | Self::TokenExchange(_)
        )
    }

    /// HTTP status of a remote error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
