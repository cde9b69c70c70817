//! Collection reset.

use paqueteria_models::collections::SAMPLE_COLLECTIONS;
use paqueteria_store::DocumentStore;
use std::time::Instant;
use tracing::warn;

use super::models::{CollectionReset, ResetReport};

/// Deletes every document currently in `collection`.
///
/// A failed delete is counted and skipped; a failed listing leaves the
/// collection untouched and is reported in `error`.
pub async fn clear_collection(store: &dyn DocumentStore, collection: &str) -> CollectionReset {
    let mut reset = CollectionReset {
        collection: collection.to_string(),
        deleted: 0,
        failed: 0,
        error: None,
    };

    let references = match store.list_documents(collection).await {
        Ok(references) => references,
        Err(e) => {
            warn!(collection, error = %e, "Listing collection failed");
            println!("   ❌ Could not list '{collection}': {e}");
            reset.error = Some(e.to_string());
            return reset;
        }
    };

    for reference in &references {
        match store.delete_document(reference).await {
            Ok(()) => reset.deleted += 1,
            Err(e) => {
                warn!(document = %reference, error = %e, "Delete failed");
                reset.failed += 1;
            }
        }
    }

    println!(
        "   ✓ {} documents deleted from '{}'",
        reset.deleted, collection
    );
    if reset.failed > 0 {
        println!("   ❌ {} documents could not be deleted from '{}'", reset.failed, collection);
    }

    reset
}

/// Clears the sender, receiver and order collections.
pub async fn clear_samples(store: &dyn DocumentStore) -> ResetReport {
    let start_time = Instant::now();
    println!("🗑️  Clearing previous sample data...");

    let mut report = ResetReport::default();
    for collection in SAMPLE_COLLECTIONS {
        report
            .collections
            .push(clear_collection(store, collection).await);
    }

    println!(
        "   ✓ Deleted {} documents in {:?}",
        report.total_deleted(),
        start_time.elapsed()
    );

    report
}
