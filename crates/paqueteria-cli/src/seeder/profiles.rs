//! Profile documents in `usuarios`.

use paqueteria_config::ProfileKeyStrategy;
use paqueteria_core::AppResult;
use paqueteria_models::collections::USERS;
use paqueteria_models::{AccountDescriptor, AccountId, ProfileRecord, ToDocument};
use paqueteria_store::DocumentStore;
use std::time::Instant;
use tracing::{instrument, warn};

use super::models::{FailedRecord, ProfileReport, ProvisionReport};

/// Makes an email usable as a document id.
pub fn sanitize_email(email: &str) -> String {
    email.replace('@', "_at_").replace(['.', '/'], "_")
}

/// Document key of an account's profile.
pub fn profile_key(
    id: &AccountId,
    descriptor: &AccountDescriptor,
    strategy: ProfileKeyStrategy,
) -> String {
    match strategy {
        ProfileKeyStrategy::Uid if !id.as_str().is_empty() => id.as_str().to_string(),
        _ => sanitize_email(&descriptor.email),
    }
}

/// Upserts the profile at `key`.
///
/// An existing `createdAt` is carried over; `updatedAt` is always stamped by
/// the store. The password never reaches the document.
#[instrument(skip(store, descriptor), fields(email = %descriptor.email))]
pub async fn write_profile(
    store: &dyn DocumentStore,
    key: &str,
    descriptor: &AccountDescriptor,
) -> AppResult<()> {
    let mut record = ProfileRecord::for_account(descriptor);

    let existing = store.get_document(USERS, key).await?;
    if let Some(created_at) = existing.and_then(|doc| doc.get_timestamp("createdAt")) {
        record = record.with_created_at(created_at);
    }

    store.set_document(USERS, key, &record.to_document()).await
}

/// Writes one profile per successfully provisioned account.
pub async fn write_profiles(
    store: &dyn DocumentStore,
    provisioned: &ProvisionReport,
    strategy: ProfileKeyStrategy,
) -> ProfileReport {
    let start_time = Instant::now();
    println!("👤 Writing user profiles...");

    let mut report = ProfileReport::default();
    for (id, descriptor) in provisioned.successful() {
        let key = profile_key(id, descriptor, strategy);
        match write_profile(store, &key, descriptor).await {
            Ok(()) => {
                println!(
                    "   ✓ Profile '{}' written ({}) -> {}/{}",
                    descriptor.display_name, descriptor.role, USERS, key
                );
                report.written.push(key);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Profile write failed");
                println!("   ❌ Error writing profile for {}: {}", descriptor.email, e);
                report.failed.push(FailedRecord {
                    label: descriptor.email.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    println!(
        "   ✓ Wrote {} profiles in {:?}",
        report.written.len(),
        start_time.elapsed()
    );

    report
}
