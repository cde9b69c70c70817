//! # Paqueteria
//!
//! Provisioning tools for the Paqueteria parcel-delivery Firebase project.
//!
//! ## Overview
//!
//! The tools bring a Firebase project to a known initial state and can be
//! re-run safely:
//!
//! - **Accounts**: staff accounts in Firebase Authentication, created once
//!   and reported as "already exists" on later runs
//! - **Profiles**: one `usuarios` document per account with role and display
//!   metadata (never the password)
//! - **Sample data**: senders (`emisores`), receivers (`receptores`) and
//!   orders (`ordenes`) covering every order status
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── paqueteria-core/           # AppError, AppResult
//! ├── paqueteria-config/         # FirebaseConfig, SeedConfig (environment)
//! ├── paqueteria-auth/           # service-account key, token exchange, Session
//! ├── paqueteria-models/         # accounts, profiles, parties, orders, documents
//! ├── paqueteria-store/          # AccountProvider / DocumentStore + REST clients
//! ├── paqueteria-observability/  # console logging
//! └── paqueteria-cli/            # seeder library and the paqueteria-cli binary
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! FIREBASE_CREDENTIALS=paqueteria-web-app-firebase-adminsdk.json
//! cargo run --bin paqueteria-cli -- seed
//! ```
//!
//! Against the local emulators no key is needed:
//!
//! ```bash
//! FIREBASE_PROJECT_ID=demo-paqueteria \
//! FIREBASE_AUTH_EMULATOR_HOST=localhost:9099 \
//! FIRESTORE_EMULATOR_HOST=localhost:8080 \
//! cargo run --bin paqueteria-cli -- seed
//! ```

// Re-export workspace crates for convenience
pub use paqueteria_auth;
pub use paqueteria_cli;
pub use paqueteria_config;
pub use paqueteria_core;
pub use paqueteria_models;
pub use paqueteria_observability;
pub use paqueteria_store;

pub use paqueteria_cli::seeder;
pub use paqueteria_core::{AppError, AppResult};
