use async_trait::async_trait;
use paqueteria_core::AppResult;
use paqueteria_models::Account;

/// The authentication provider's account store.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Creates an account.
    ///
    /// Fails with [`AppError::DuplicateIdentity`](paqueteria_core::AppError::DuplicateIdentity)
    /// when the email is already registered.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<Account>;

    /// Finds an existing account.
    ///
    /// Fails with [`AppError::AccountNotFound`](paqueteria_core::AppError::AccountNotFound)
    /// when no account uses `email`.
    async fn find_account_by_email(&self, email: &str) -> AppResult<Account>;
}
