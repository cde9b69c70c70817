//! OAuth 2.0 JWT-bearer token minting.
//!
//! A service account proves its identity by signing a short-lived RS256
//! assertion with its private key. Google's token endpoint answers with a
//! bearer access token valid for about an hour, which is all a seeding run
//! needs.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use paqueteria_core::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::claims::AssertionClaims;
use crate::credentials::ServiceAccountKey;

/// Scopes requested for the access token, the same set the Firebase Admin
/// SDKs ask for.
pub const SCOPES: [&str; 5] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/datastore",
    "https://www.googleapis.com/auth/identitytoolkit",
    "https://www.googleapis.com/auth/firebase",
    "https://www.googleapis.com/auth/userinfo.email",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google rejects assertions valid for longer than an hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Bearer token returned by the token endpoint.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Signs the JWT-bearer assertion for `key`, issued at `now`.
///
/// # Errors
///
/// Returns a credentials error if the private key cannot be parsed or the
/// assertion cannot be signed.
pub fn create_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> AppResult<String> {
    let iat = now.timestamp();
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: SCOPES.join(" "),
        aud: key.token_uri.clone(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| AppError::credentials(format!("invalid private key: {e}")))?;

    encode(&header, &claims, &encoding_key)
        .map_err(|e| AppError::credentials(format!("failed to sign assertion: {e}")))
}

/// Exchanges a signed assertion for an access token at `token_uri`.
///
/// # Errors
///
/// Returns [`AppError::TokenExchange`] if the endpoint is unreachable or
/// rejects the assertion (e.g. a revoked key or a skewed clock).
#[instrument(skip(client, assertion))]
pub async fn exchange_assertion(
    client: &Client,
    token_uri: &str,
    assertion: &str,
) -> AppResult<AccessToken> {
    let response = client
        .post(token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
        .send()
        .await
        .map_err(|e| AppError::token_exchange(format!("token endpoint unreachable: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::token_exchange(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let parsed: TokenResponse = response
        .json()
        .await
        .map_err(|e| AppError::token_exchange(format!("unreadable token response: {e}")))?;

    let lifetime = parsed.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
    debug!(expires_in = lifetime, "Obtained access token");

    Ok(AccessToken {
        token: parsed.access_token,
        expires_at: Utc::now() + Duration::seconds(lifetime),
    })
}
