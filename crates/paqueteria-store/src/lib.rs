//! # Paqueteria Store
//!
//! The two external collaborators of a provisioning run, behind traits so
//! the seeding procedure can run against real services or in-memory fakes:
//!
//! - [`AccountProvider`]: create accounts and look them up by email
//!   (Firebase Authentication, via [`IdentityToolkitClient`])
//! - [`DocumentStore`]: set, add, get, list and delete documents
//!   (Cloud Firestore, via [`FirestoreClient`])
//!
//! With the `test-utils` feature, [`memory`] provides in-memory
//! implementations of both.
//!
//! # Example
//!
//! ```ignore
//! use paqueteria_store::{FirestoreClient, IdentityToolkitClient, build_http_client};
//!
//! let http = build_http_client(&config)?;
//! let session = Session::establish(&config, &http).await?;
//! let accounts = IdentityToolkitClient::from_session(http.clone(), &config, &session);
//! let store = FirestoreClient::from_session(http, &config, &session);
//! ```

pub mod accounts;
pub mod auto_id;
pub mod documents;
pub mod firestore;
pub mod http;
pub mod identity_toolkit;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use accounts::AccountProvider;
pub use documents::{DocumentRef, DocumentStore};
pub use firestore::FirestoreClient;
pub use http::build_http_client;
pub use identity_toolkit::IdentityToolkitClient;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{InMemoryAccounts, InMemoryStore};
