use chrono::{DateTime, TimeZone, Utc};
use paqueteria::paqueteria_models::{AccountDescriptor, Document, Role};
use paqueteria::paqueteria_store::DocumentStore;
use paqueteria::paqueteria_store::auto_id::auto_id;
use paqueteria::seeder::SeedPlan;
use paqueteria_store::{InMemoryAccounts, InMemoryStore};

/// Fixed start time so order dates are reproducible.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn test_plan() -> SeedPlan {
    SeedPlan::fixtures(test_now())
}

#[allow(dead_code)]
pub fn setup() -> (InMemoryAccounts, InMemoryStore) {
    (InMemoryAccounts::new(), InMemoryStore::new())
}

#[allow(dead_code)]
pub fn admin_descriptor() -> AccountDescriptor {
    AccountDescriptor::new(
        "admin@paqueteria.com",
        "Admin123!",
        "Administrador Principal",
        Role::Administrador,
    )
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", auto_id().to_lowercase())
}

/// Adds `count` placeholder documents to `collection`.
#[allow(dead_code)]
pub async fn fill_collection(store: &InMemoryStore, collection: &str, count: usize) {
    for i in 0..count {
        store
            .add_document(collection, &Document::new().with("seq", i as i64))
            .await
            .unwrap();
    }
}
