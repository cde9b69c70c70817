//! # Paqueteria Config
//!
//! Configuration types for the provisioning tools, loaded from environment
//! variables (a `.env` file is honoured by the binaries through `dotenvy`).
//!
//! - [`firebase`]: credentials path, project, emulator hosts, HTTP timeout
//! - [`seed`]: behaviour switches of the seeding procedure
//!
//! # Example
//!
//! ```ignore
//! use paqueteria_config::{FirebaseConfig, SeedConfig};
//!
//! let firebase = FirebaseConfig::from_env()?;
//! let seed = SeedConfig::from_env()?;
//! ```

pub mod firebase;
pub mod seed;

pub use firebase::FirebaseConfig;
pub use seed::{ProfileKeyStrategy, SeedConfig};

/// Parses a boolean flag the way shell users write them.
pub(crate) fn parse_flag(name: &str, raw: &str) -> paqueteria_core::AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(paqueteria_core::AppError::config(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}
