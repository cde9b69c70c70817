//! Paqueteria Observability
//!
//! Console logging for the provisioning commands. Progress for humans is
//! printed by the commands themselves; tracing output is diagnostics, quiet
//! by default and raised with `LOG_LEVEL` or `RUST_LOG`.
//!
//! ```no_run
//! paqueteria_observability::init_basic_console_logging();
//! tracing::info!("ready");
//! ```

pub mod basic_logging;

pub use basic_logging::{default_directives, init_basic_console_logging};
