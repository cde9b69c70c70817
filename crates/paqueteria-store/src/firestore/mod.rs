//! Cloud Firestore through the v1 REST API.
//!
//! - [`codec`]: [`Document`](paqueteria_models::Document) to and from Firestore `Value` JSON
//! - [`client`]: the [`DocumentStore`](crate::DocumentStore) implementation

pub mod client;
pub mod codec;

pub use client::FirestoreClient;
