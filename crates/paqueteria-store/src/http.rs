//! Shared HTTP plumbing for the Google REST clients.

use std::time::Duration;

use paqueteria_config::FirebaseConfig;
use paqueteria_core::{AppError, AppResult};
use reqwest::{Client, Response};
use serde::Deserialize;

const USER_AGENT: &str = concat!("paqueteria-seed/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the session and both store clients.
pub fn build_http_client(config: &FirebaseConfig) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

pub(crate) fn transport_error(error: reqwest::Error) -> AppError {
    AppError::transport(error.to_string())
}

/// Converts a non-success response into [`AppError::Remote`].
pub(crate) async fn error_from_response(response: Response) -> AppError {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => parse_error_body(status, &body),
        Err(e) => AppError::remote(status, None, format!("unreadable error body: {e}")),
    }
}

/// Extracts the error code from a Google API error payload.
///
/// Identity Toolkit puts a symbolic code at the start of `message`
/// (`EMAIL_EXISTS`, `INVALID_PASSWORD : Password should be ...`); Firestore
/// uses a human message plus a canonical `status` (`NOT_FOUND`).
pub(crate) fn parse_error_body(status: u16, body: &str) -> AppError {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        let message = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.trim().to_string()
        };
        return AppError::remote(status, None, message);
    };

    let ErrorBody { message, status: canonical } = envelope.error;
    let leading = message.split(" : ").next().unwrap_or_default().trim();
    let code = if is_symbolic_code(leading) {
        Some(leading.to_string())
    } else {
        canonical
    };

    AppError::remote(status, code, message)
}

fn is_symbolic_code(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
