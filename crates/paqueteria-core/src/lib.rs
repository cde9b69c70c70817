//! # Paqueteria Core
//!
//! Foundational types shared by every Paqueteria provisioning crate.
//!
//! - [`errors`]: the [`AppError`] taxonomy and the [`AppResult`] alias
//!
//! # Example
//!
//! ```ignore
//! use paqueteria_core::{AppError, AppResult};
//!
//! fn load() -> AppResult<()> {
//!     Err(AppError::credentials("service account key not found"))
//! }
//!
//! assert!(load().unwrap_err().is_fatal_setup());
//! ```

pub mod errors;

pub use errors::{AppError, AppResult};
