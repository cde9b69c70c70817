//! # Paqueteria Auth
//!
//! Authentication against Google APIs with a Firebase service account.
//!
//! The flow mirrors the OAuth 2.0 JWT-bearer grant used by the Firebase Admin
//! SDKs:
//!
//! 1. [`credentials`]: load and validate the service-account JSON key
//! 2. [`token`]: sign an RS256 assertion and exchange it for an access token
//! 3. [`session`]: hold the resulting token and project id as an explicit
//!    handle passed to every client
//!
//! # Example
//!
//! ```ignore
//! use paqueteria_auth::Session;
//! use paqueteria_config::FirebaseConfig;
//!
//! let config = FirebaseConfig::from_env()?;
//! let http = reqwest::Client::new();
//! let session = Session::establish(&config, &http).await?;
//! println!("Authenticated for project {}", session.project_id());
//! ```

pub mod claims;
pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::ServiceAccountKey;
pub use session::Session;
pub use token::{AccessToken, create_assertion, exchange_assertion};
