//! # Paqueteria CLI
//!
//! Provisioning routines for the Paqueteria Firebase project.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use paqueteria_cli::seeder::{self, SeedPlan};
//!
//! let plan = SeedPlan::fixtures(chrono::Utc::now());
//! let summary = seeder::seed_all(&accounts, &store, &plan, &config).await;
//! ```

pub mod seeder;
