//! Account provisioning.
//!
//! Creating an account that already exists is not an error: the existing
//! account is looked up and reported instead, which makes provisioning
//! idempotent by email.

use paqueteria_models::AccountDescriptor;
use paqueteria_store::AccountProvider;
use std::time::Instant;
use tracing::{info, warn};

use super::models::{AccountOutcome, ProvisionReport, ProvisionedAccount};

/// Creates one account, classifying the result exactly once.
pub async fn provision_account(
    accounts: &dyn AccountProvider,
    descriptor: &AccountDescriptor,
) -> ProvisionedAccount {
    let created = accounts
        .create_account(
            &descriptor.email,
            &descriptor.password,
            &descriptor.display_name,
        )
        .await;

    let (outcome, account) = match created {
        Ok(account) => {
            info!(email = %descriptor.email, uid = %account.id, "Account created");
            println!(
                "   ✓ Account '{}' created ({})",
                descriptor.display_name, descriptor.role
            );
            (AccountOutcome::Created(account.id.clone()), Some(account))
        }
        Err(e) if e.is_duplicate_identity() => {
            match accounts.find_account_by_email(&descriptor.email).await {
                Ok(existing) => {
                    info!(email = %descriptor.email, uid = %existing.id, "Account already exists");
                    println!("   ℹ️  Account '{}' already exists", descriptor.email);
                    (
                        AccountOutcome::AlreadyExists(existing.id.clone()),
                        Some(existing),
                    )
                }
                Err(lookup) => {
                    warn!(
                        email = %descriptor.email,
                        error = %lookup,
                        "Existing account lookup failed"
                    );
                    println!(
                        "   ❌ Account '{}' exists but could not be fetched: {}",
                        descriptor.email, lookup
                    );
                    (
                        AccountOutcome::Failed(format!(
                            "account exists but lookup failed: {lookup}"
                        )),
                        None,
                    )
                }
            }
        }
        Err(e) => {
            warn!(email = %descriptor.email, error = %e, "Account creation failed");
            println!("   ❌ Error creating account '{}': {}", descriptor.email, e);
            (AccountOutcome::Failed(e.to_string()), None)
        }
    };

    ProvisionedAccount {
        descriptor: descriptor.clone(),
        outcome,
        account,
    }
}

/// Provisions every descriptor in order; failures never stop the batch.
pub async fn provision_accounts(
    accounts: &dyn AccountProvider,
    descriptors: &[AccountDescriptor],
) -> ProvisionReport {
    let start_time = Instant::now();
    println!("👥 Provisioning {} accounts...", descriptors.len());

    let mut report = ProvisionReport::default();
    for descriptor in descriptors {
        report
            .accounts
            .push(provision_account(accounts, descriptor).await);
    }

    println!(
        "   ✓ {} created, {} already existed, {} failed in {:?}",
        report.created(),
        report.already_existing(),
        report.failed(),
        start_time.elapsed()
    );

    report
}

/// Looks up existing accounts without creating any.
///
/// Found accounts are reported as `AlreadyExists`; missing ones as `Failed`.
pub async fn lookup_accounts(
    accounts: &dyn AccountProvider,
    descriptors: &[AccountDescriptor],
) -> ProvisionReport {
    println!("🔎 Looking up {} accounts...", descriptors.len());

    let mut report = ProvisionReport::default();
    for descriptor in descriptors {
        let provisioned = match accounts.find_account_by_email(&descriptor.email).await {
            Ok(account) => {
                println!("   ✓ Found {} (UID: {})", account.email, account.id);
                ProvisionedAccount {
                    descriptor: descriptor.clone(),
                    outcome: AccountOutcome::AlreadyExists(account.id.clone()),
                    account: Some(account),
                }
            }
            Err(e) => {
                warn!(email = %descriptor.email, error = %e, "Account lookup failed");
                println!("   ❌ {}: {}", descriptor.email, e);
                ProvisionedAccount {
                    descriptor: descriptor.clone(),
                    outcome: AccountOutcome::Failed(e.to_string()),
                    account: None,
                }
            }
        };
        report.accounts.push(provisioned);
    }

    report
}
