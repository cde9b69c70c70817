//! Authentication accounts.

use std::fmt;

use crate::roles::Role;

/// Provider-assigned account identifier (Firebase `uid`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An account to provision.
///
/// The password is only ever sent to the account provider on creation; it is
/// never part of a profile document.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountDescriptor {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

impl AccountDescriptor {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            display_name: display_name.into(),
            role,
        }
    }
}

impl fmt::Debug for AccountDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountDescriptor")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .finish()
    }
}

/// An account as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub display_name: Option<String>,
    pub disabled: bool,
}
