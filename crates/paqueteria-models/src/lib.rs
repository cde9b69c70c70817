//! # Paqueteria Models
//!
//! Domain models of the parcel-delivery backend as they are provisioned into
//! Firebase.
//!
//! # Modules
//!
//! - [`accounts`]: account descriptors and provider-side accounts
//! - [`collections`]: Firestore collection names
//! - [`document`]: store-agnostic document field values
//! - [`orders`]: delivery orders and their status history
//! - [`parties`]: senders and receivers
//! - [`profiles`]: user profile documents
//! - [`roles`]: account roles
//! - [`timestamps`]: literal vs server-assigned timestamps
//!
//! Field names written to the store are the ones the mobile app reads
//! (`nombre`, `rol`, `estadoHistorial`, ...); Rust identifiers are English.

pub mod accounts;
pub mod collections;
pub mod document;
pub mod orders;
pub mod parties;
pub mod profiles;
pub mod roles;
pub mod timestamps;

pub use accounts::{Account, AccountDescriptor, AccountId};
pub use document::{Document, FieldValue, ToDocument};
pub use orders::{Order, OrderStatus, StatusChange, StatusHistory};
pub use parties::{Receiver, Sender};
pub use profiles::ProfileRecord;
pub use roles::Role;
pub use timestamps::{Timestamp, format_order_date, parse_order_date};
