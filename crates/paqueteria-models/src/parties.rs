//! Senders (`emisores`) and receivers (`receptores`).

use crate::document::{Document, ToDocument};
use crate::timestamps::Timestamp;

/// A customer shipping parcels.
#[derive(Clone, Debug, PartialEq)]
pub struct Sender {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    /// Chilean tax id.
    pub rut: String,
    pub active: bool,
    pub created_at: Timestamp,
}

/// A customer receiving parcels.
#[derive(Clone, Debug, PartialEq)]
pub struct Receiver {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    /// Chilean tax id.
    pub rut: String,
    pub active: bool,
    pub created_at: Timestamp,
}

fn party_document(
    name: &str,
    phone: &str,
    address: &str,
    email: &str,
    rut: &str,
    active: bool,
    created_at: Timestamp,
) -> Document {
    Document::new()
        .with("nombre", name)
        .with("telefono", phone)
        .with("direccion", address)
        .with("email", email)
        .with("rut", rut)
        .with("activo", active)
        .with("createdAt", created_at)
}

impl ToDocument for Sender {
    fn to_document(&self) -> Document {
        party_document(
            &self.name,
            &self.phone,
            &self.address,
            &self.email,
            &self.rut,
            self.active,
            self.created_at,
        )
    }
}

impl ToDocument for Receiver {
    fn to_document(&self) -> Document {
        party_document(
            &self.name,
            &self.phone,
            &self.address,
            &self.email,
            &self.rut,
            self.active,
            self.created_at,
        )
    }
}
