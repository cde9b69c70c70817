//! User profile documents stored in `usuarios`.

use crate::accounts::AccountDescriptor;
use crate::document::{Document, ToDocument};
use crate::roles::Role;
use crate::timestamps::Timestamp;

/// Profile document of one account.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileRecord {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProfileRecord {
    /// A fresh, active profile for `descriptor`, stamped by the store.
    pub fn for_account(descriptor: &AccountDescriptor) -> Self {
        Self {
            email: descriptor.email.clone(),
            display_name: descriptor.display_name.clone(),
            role: descriptor.role,
            active: true,
            created_at: Timestamp::ServerAssigned,
            updated_at: Timestamp::ServerAssigned,
        }
    }

    /// Keeps the creation time of a previously written profile.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }
}

impl ToDocument for ProfileRecord {
    fn to_document(&self) -> Document {
        Document::new()
            .with("email", self.email.as_str())
            .with("nombre", self.display_name.as_str())
            .with("rol", self.role.as_str())
            .with("activo", self.active)
            .with("createdAt", self.created_at)
            .with("updatedAt", self.updated_at)
    }
}
