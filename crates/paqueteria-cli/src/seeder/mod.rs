//! Firebase seeding.
//!
//! A full run is strictly sequential: provision accounts, write their
//! profiles, optionally clear the sample collections, insert the sample
//! records, then print a summary. Each remote call is awaited before the
//! next one starts. Per-item failures are reported and skipped, so every
//! step runs even when earlier items failed.

pub mod accounts;
pub mod collections;
pub mod fixtures;
pub mod models;
pub mod profiles;
pub mod samples;

use std::fmt;
use std::time::Instant;

use paqueteria_config::{ProfileKeyStrategy, SeedConfig};
use paqueteria_models::AccountDescriptor;
use paqueteria_store::{AccountProvider, DocumentStore};

pub use accounts::{lookup_accounts, provision_account, provision_accounts};
pub use collections::{clear_collection, clear_samples};
pub use models::{
    AccountOutcome, ProfileReport, ProvisionReport, ProvisionedAccount, ResetReport, SampleBatch,
    SampleReport, SeedPlan, SeedSummary,
};
pub use profiles::{profile_key, sanitize_email, write_profile, write_profiles};
pub use samples::{SeedRecord, insert_records, seed_samples};

/// Runs the complete provisioning procedure.
pub async fn seed_all(
    accounts: &dyn AccountProvider,
    store: &dyn DocumentStore,
    plan: &SeedPlan,
    config: &SeedConfig,
) -> SeedSummary {
    let start_time = Instant::now();
    println!("🌱 Starting Firebase seeding...\n");

    let provisioned = provision_accounts(accounts, &plan.accounts).await;
    println!();

    let profiles = write_profiles(store, &provisioned, config.profile_key).await;
    println!();

    let reset = if config.reset_collections {
        let report = clear_samples(store).await;
        println!();
        Some(report)
    } else {
        println!("⏭️  Keeping existing sample data (reset disabled)\n");
        None
    };

    let samples = seed_samples(store, &plan.samples).await;

    let summary = SeedSummary {
        accounts: provisioned,
        profiles,
        reset,
        samples,
    };

    println!("\n{}", render_summary(&summary));
    print_credentials(&plan.accounts);
    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());

    summary
}

/// Creates the accounts and writes their profiles.
pub async fn create_users(
    accounts: &dyn AccountProvider,
    store: &dyn DocumentStore,
    descriptors: &[AccountDescriptor],
    strategy: ProfileKeyStrategy,
) -> (ProvisionReport, ProfileReport) {
    let provisioned = provision_accounts(accounts, descriptors).await;
    println!();
    let profiles = write_profiles(store, &provisioned, strategy).await;
    (provisioned, profiles)
}

/// Writes profiles for accounts that already exist, creating none.
pub async fn create_profiles(
    accounts: &dyn AccountProvider,
    store: &dyn DocumentStore,
    descriptors: &[AccountDescriptor],
    strategy: ProfileKeyStrategy,
) -> (ProvisionReport, ProfileReport) {
    let found = lookup_accounts(accounts, descriptors).await;
    println!();
    let profiles = write_profiles(store, &found, strategy).await;
    (found, profiles)
}

/// Clears (when `reset`) and re-inserts the sample collections.
pub async fn seed_samples_only(
    store: &dyn DocumentStore,
    batch: &SampleBatch,
    reset: bool,
) -> (Option<ResetReport>, SampleReport) {
    let reset = if reset {
        let report = clear_samples(store).await;
        println!();
        Some(report)
    } else {
        None
    };
    (reset, seed_samples(store, batch).await)
}

/// Human-readable summary of a run.
pub fn render_summary(summary: &SeedSummary) -> String {
    summary.to_string()
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(out, self)
    }
}

fn write_summary(out: &mut fmt::Formatter<'_>, summary: &SeedSummary) -> fmt::Result {
    let accounts = &summary.accounts;
    let samples = &summary.samples;

    writeln!(out, "📊 Summary:")?;
    writeln!(
        out,
        "   👥 Accounts: {} created, {} already existed, {} failed",
        accounts.created(),
        accounts.already_existing(),
        accounts.failed()
    )?;
    writeln!(
        out,
        "   👤 Profiles: {} written, {} failed",
        summary.profiles.written.len(),
        summary.profiles.failed.len()
    )?;
    match &summary.reset {
        Some(reset) => {
            writeln!(out, "   🗑️  Reset: {} documents deleted", reset.total_deleted())?;
        }
        None => {
            writeln!(out, "   🗑️  Reset: skipped")?;
        }
    }
    writeln!(out, "   📦 Senders: {} documents", samples.senders.inserted.len())?;
    writeln!(out, "   📬 Receivers: {} documents", samples.receivers.inserted.len())?;
    writeln!(out, "   📋 Orders: {} documents", samples.orders.inserted.len())?;

    for (status, count) in &samples.order_status_counts {
        let noun = if *count == 1 { "order" } else { "orders" };
        writeln!(out, "      - {status}: {count} {noun}")?;
    }

    let failures = accounts.failed()
        + summary.profiles.failed.len()
        + samples.senders.failed.len()
        + samples.receivers.failed.len()
        + samples.orders.failed.len();
    if failures > 0 {
        writeln!(out, "   ⚠️  Failed items: {failures} (see the ❌ lines above)")?;
    }

    Ok(())
}

/// Prints the login credentials of the seeded accounts.
pub fn print_credentials(descriptors: &[AccountDescriptor]) {
    println!("🔐 Login credentials:");
    for descriptor in descriptors {
        println!("   {}:", descriptor.role);
        println!("      Email: {}", descriptor.email);
        println!("      Password: {}", descriptor.password);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use paqueteria_models::collections::{ORDERS, USERS};
    use paqueteria_store::{InMemoryAccounts, InMemoryStore};

    fn plan() -> SeedPlan {
        SeedPlan::fixtures(Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_seed_all_summary() {
        let accounts = InMemoryAccounts::new();
        let store = InMemoryStore::new();

        let summary = seed_all(&accounts, &store, &plan(), &SeedConfig::default()).await;

        assert_eq!(summary.accounts.created(), 2);
        assert_eq!(summary.profiles.written.len(), 2);
        assert_eq!(summary.reset.as_ref().map(ResetReport::total_deleted), Some(0));
        assert_eq!(store.count(USERS).await, 2);
        assert_eq!(store.count(ORDERS).await, 5);

        let rendered = render_summary(&summary);
        assert!(rendered.contains("2 created, 0 already existed, 0 failed"));
        assert!(rendered.contains("- CREADA: 2 orders"));
        assert!(rendered.contains("- ENTREGADA: 1 order\n"));
        assert!(!rendered.contains("Failed items"));
    }

    #[tokio::test]
    async fn test_seed_all_without_reset_duplicates_samples() {
        let accounts = InMemoryAccounts::new();
        let store = InMemoryStore::new();
        let config = SeedConfig::default().with_reset(false);

        seed_all(&accounts, &store, &plan(), &config).await;
        let summary = seed_all(&accounts, &store, &plan(), &config).await;

        assert!(summary.reset.is_none());
        assert_eq!(summary.accounts.already_existing(), 2);
        assert_eq!(store.count(ORDERS).await, 10);
        assert_eq!(store.count(USERS).await, 2);
        assert!(render_summary(&summary).contains("Reset: skipped"));
    }

    #[tokio::test]
    async fn test_create_profiles_only_uses_existing_accounts() {
        let accounts = InMemoryAccounts::new();
        let store = InMemoryStore::new();
        let descriptors = fixtures::default_accounts();
        accounts
            .preexisting(&descriptors[0].email, &descriptors[0].display_name)
            .await;

        let (found, profiles) =
            create_profiles(&accounts, &store, &descriptors, ProfileKeyStrategy::Email).await;

        assert_eq!(found.already_existing(), 1);
        assert_eq!(found.failed(), 1);
        assert_eq!(profiles.written, vec!["admin_at_paqueteria_com".to_string()]);
        assert_eq!(accounts.len().await, 1);
    }

    #[tokio::test]
    async fn test_failures_are_flagged_in_summary() {
        let accounts = InMemoryAccounts::new().failing_creation_for(fixtures::COURIER_EMAIL);
        let store = InMemoryStore::new();

        let summary = seed_all(&accounts, &store, &plan(), &SeedConfig::default()).await;

        assert_eq!(summary.accounts.failed(), 1);
        assert_eq!(store.count(USERS).await, 1);
        assert!(render_summary(&summary).contains("Failed items: 1"));
    }
}
