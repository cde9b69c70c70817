//! Sample sender, receiver and order records.
//!
//! Records are added under store-generated ids, so inserting the same batch
//! twice without a reset duplicates it.

use std::collections::BTreeMap;

use paqueteria_core::AppResult;
use paqueteria_models::collections::{ORDERS, RECEIVERS, SENDERS};
use paqueteria_models::{Order, OrderStatus, Receiver, Sender, ToDocument};
use paqueteria_store::{DocumentRef, DocumentStore};
use std::time::Instant;
use tracing::warn;

use super::models::{FailedRecord, InsertReport, InsertedRecord, SampleBatch, SampleReport};

/// A record of one of the sample collections.
pub trait SeedRecord: ToDocument {
    /// Progress line text identifying the record.
    fn label(&self) -> String;

    /// Checked before the record is written.
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }
}

impl SeedRecord for Sender {
    fn label(&self) -> String {
        format!("Sender '{}'", self.name)
    }
}

impl SeedRecord for Receiver {
    fn label(&self) -> String {
        format!("Receiver '{}'", self.name)
    }
}

impl SeedRecord for Order {
    fn label(&self) -> String {
        format!("Order '{}' - status {}", self.order_number, self.status())
    }

    fn validate(&self) -> AppResult<()> {
        Order::validate(self)
    }
}

async fn insert_record<R: SeedRecord>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &R,
) -> AppResult<DocumentRef> {
    record.validate()?;
    store.add_document(collection, &record.to_document()).await
}

/// Adds every record to `collection`, one progress line each.
pub async fn insert_records<R: SeedRecord + Sync>(
    store: &dyn DocumentStore,
    collection: &str,
    records: &[R],
) -> InsertReport {
    let mut report = InsertReport::new(collection);

    for (index, record) in records.iter().enumerate() {
        let label = record.label();
        match insert_record(store, collection, record).await {
            Ok(reference) => {
                println!("   ✓ {label} created");
                report.inserted.push(InsertedRecord { index, reference });
            }
            Err(e) => {
                warn!(collection, record = %label, error = %e, "Insert failed");
                println!("   ❌ {label}: {e}");
                report.failed.push(FailedRecord {
                    label,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Inserts the whole batch: senders, then receivers, then orders.
pub async fn seed_samples(store: &dyn DocumentStore, batch: &SampleBatch) -> SampleReport {
    let start_time = Instant::now();

    println!("📦 Creating {} senders...", batch.senders.len());
    let senders = insert_records(store, SENDERS, &batch.senders).await;

    println!("📬 Creating {} receivers...", batch.receivers.len());
    let receivers = insert_records(store, RECEIVERS, &batch.receivers).await;

    println!("📋 Creating {} orders...", batch.orders.len());
    let orders = insert_records(store, ORDERS, &batch.orders).await;

    let mut order_status_counts: BTreeMap<OrderStatus, usize> = BTreeMap::new();
    for inserted in &orders.inserted {
        if let Some(order) = batch.orders.get(inserted.index) {
            *order_status_counts.entry(order.status()).or_default() += 1;
        }
    }

    println!(
        "   ✓ Inserted {} sample documents in {:?}",
        senders.inserted.len() + receivers.inserted.len() + orders.inserted.len(),
        start_time.elapsed()
    );

    SampleReport {
        senders,
        receivers,
        orders,
        order_status_counts,
    }
}
