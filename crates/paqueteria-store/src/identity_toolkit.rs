//! Firebase Authentication through the Identity Toolkit REST API.

use async_trait::async_trait;
use paqueteria_auth::Session;
use paqueteria_auth::session::EMULATOR_TOKEN;
use paqueteria_config::FirebaseConfig;
use paqueteria_core::{AppError, AppResult};
use paqueteria_models::{Account, AccountId};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::accounts::AccountProvider;
use crate::http::{error_from_response, transport_error};

/// Provider codes that mean "this email is already registered".
const DUPLICATE_CODES: [&str; 2] = ["EMAIL_EXISTS", "DUPLICATE_EMAIL"];

#[derive(Clone)]
pub struct IdentityToolkitClient {
    http: Client,
    base_url: String,
    project_id: String,
    bearer: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest<'a> {
    email: &'a str,
    password: &'a str,
    display_name: &'a str,
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    email: [&'a str; 1],
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<UserInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    disabled: bool,
}

impl UserInfo {
    fn into_account(self, requested_email: &str) -> Account {
        Account {
            id: AccountId::new(self.local_id),
            email: self.email.unwrap_or_else(|| requested_email.to_string()),
            display_name: self.display_name,
            disabled: self.disabled,
        }
    }
}

impl IdentityToolkitClient {
    /// `base_url` excludes the `/v1` segment.
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        bearer: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            bearer: bearer.into(),
        }
    }

    /// Targets the production API or the Auth emulator, per `config`.
    pub fn from_session(http: Client, config: &FirebaseConfig, session: &Session) -> Self {
        let bearer = if config.auth_emulator_host.is_some() {
            EMULATOR_TOKEN
        } else {
            session.bearer_token()
        };
        Self::new(
            http,
            config.identity_toolkit_url(),
            session.project_id(),
            bearer,
        )
    }

    fn accounts_url(&self) -> String {
        format!("{}/v1/projects/{}/accounts", self.base_url, self.project_id)
    }
}

fn is_duplicate(error: &AppError) -> bool {
    matches!(
        error,
        AppError::Remote { code: Some(code), .. } if DUPLICATE_CODES.contains(&code.as_str())
    )
}

#[async_trait]
impl AccountProvider for IdentityToolkitClient {
    #[instrument(skip(self, password))]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<Account> {
        let request = CreateAccountRequest {
            email,
            password,
            display_name,
        };

        let response = self
            .http
            .post(self.accounts_url())
            .bearer_auth(&self.bearer)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let error = error_from_response(response).await;
            if is_duplicate(&error) {
                return Err(AppError::DuplicateIdentity(email.to_string()));
            }
            return Err(error);
        }

        let user: UserInfo = response.json().await.map_err(transport_error)?;
        debug!(uid = %user.local_id, "Account created");

        let mut account = user.into_account(email);
        account.display_name.get_or_insert_with(|| display_name.to_string());
        Ok(account)
    }

    #[instrument(skip(self))]
    async fn find_account_by_email(&self, email: &str) -> AppResult<Account> {
        let response = self
            .http
            .post(format!("{}:lookup", self.accounts_url()))
            .bearer_auth(&self.bearer)
            .json(&LookupRequest { email: [email] })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let lookup: LookupResponse = response.json().await.map_err(transport_error)?;
        lookup
            .users
            .into_iter()
            .next()
            .map(|user| user.into_account(email))
            .ok_or_else(|| AppError::AccountNotFound(email.to_string()))
    }
}
