use serde::{Deserialize, Serialize};

/// Claims of the self-signed assertion exchanged for an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Service-account email.
    pub iss: String,
    /// Space-separated OAuth scopes.
    pub scope: String,
    /// Token endpoint the assertion is meant for.
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}
