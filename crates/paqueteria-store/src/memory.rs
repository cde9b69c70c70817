//! In-memory [`AccountProvider`] and [`DocumentStore`] for tests.
//!
//! Both honor the same contracts as the remote clients: duplicate emails
//! fail with `DuplicateIdentity`, lookups of unknown emails fail with
//! `AccountNotFound`, documents the Firestore encoder rejects are rejected
//! here too, and server-assigned timestamps are stamped with the current
//! time on write. Failures can be injected per email or per
//! collection.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paqueteria_core::{AppError, AppResult};
use paqueteria_models::{Account, AccountId, Document, FieldValue, Timestamp};
use tokio::sync::RwLock;

use crate::accounts::AccountProvider;
use crate::auto_id::auto_id;
use crate::documents::{DocumentRef, DocumentStore};
use crate::firestore::codec::encode_document;

fn unavailable(what: &str) -> AppError {
    AppError::remote(503, Some("UNAVAILABLE".to_string()), format!("{what} is unavailable"))
}

// Emails are case-insensitive at the provider.
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Default)]
struct AccountsState {
    by_email: BTreeMap<String, Account>,
    next_uid: u64,
    failing_creations: HashSet<String>,
    failing_lookups: HashSet<String>,
    create_calls: usize,
}

#[derive(Default)]
pub struct InMemoryAccounts {
    state: RwLock<AccountsState>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create_account` for `email` fail with a remote error.
    pub fn failing_creation_for(mut self, email: &str) -> Self {
        self.state.get_mut().failing_creations.insert(email_key(email));
        self
    }

    /// Makes `find_account_by_email` for `email` fail with a remote error.
    pub fn failing_lookup_for(mut self, email: &str) -> Self {
        self.state.get_mut().failing_lookups.insert(email_key(email));
        self
    }

    /// Registers an account as if created before the run.
    pub async fn preexisting(&self, email: &str, display_name: &str) -> Account {
        let mut state = self.state.write().await;
        insert_account(&mut state, email, display_name)
    }

    pub async fn get(&self, email: &str) -> Option<Account> {
        self.state.read().await.by_email.get(&email_key(email)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.by_email.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of `create_account` calls, including failed ones.
    pub async fn create_calls(&self) -> usize {
        self.state.read().await.create_calls
    }
}

fn insert_account(state: &mut AccountsState, email: &str, display_name: &str) -> Account {
    state.next_uid += 1;
    let account = Account {
        id: AccountId::new(format!("uid-{:04}", state.next_uid)),
        email: email.trim().to_string(),
        display_name: Some(display_name.to_string()),
        disabled: false,
    };
    state.by_email.insert(email_key(email), account.clone());
    account
}

#[async_trait]
impl AccountProvider for InMemoryAccounts {
    async fn create_account(
        &self,
        email: &str,
        _password: &str,
        display_name: &str,
    ) -> AppResult<Account> {
        let mut state = self.state.write().await;
        state.create_calls += 1;

        let key = email_key(email);
        if state.failing_creations.contains(&key) {
            return Err(unavailable("account creation"));
        }
        if state.by_email.contains_key(&key) {
            return Err(AppError::DuplicateIdentity(email.to_string()));
        }
        Ok(insert_account(&mut state, email, display_name))
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Account> {
        let state = self.state.read().await;
        let key = email_key(email);
        if state.failing_lookups.contains(&key) {
            return Err(unavailable("account lookup"));
        }
        state
            .by_email
            .get(&key)
            .cloned()
            .ok_or_else(|| AppError::AccountNotFound(email.to_string()))
    }
}

#[derive(Default)]
struct StoreState {
    collections: BTreeMap<String, BTreeMap<String, Document>>,
    failing_writes: HashSet<String>,
    failing_deletes: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every set/add into `collection` fail with a remote error.
    pub fn failing_writes_to(mut self, collection: &str) -> Self {
        self.state.get_mut().failing_writes.insert(collection.to_string());
        self
    }

    /// Makes every delete in `collection` fail with a remote error.
    pub fn failing_deletes_in(mut self, collection: &str) -> Self {
        self.state.get_mut().failing_deletes.insert(collection.to_string());
        self
    }

    pub async fn document(&self, collection: &str, id: &str) -> Option<Document> {
        let state = self.state.read().await;
        state.collections.get(collection)?.get(id).cloned()
    }

    /// All documents of `collection`, ordered by id.
    pub async fn documents(&self, collection: &str) -> Vec<(String, Document)> {
        let state = self.state.read().await;
        state
            .collections
            .get(collection)
            .map(|docs| docs.iter().map(|(id, doc)| (id.clone(), doc.clone())).collect())
            .unwrap_or_default()
    }

    pub async fn count(&self, collection: &str) -> usize {
        let state = self.state.read().await;
        state.collections.get(collection).map_or(0, BTreeMap::len)
    }
}

/// Replaces server-assigned timestamps with `now`, as the store would.
fn resolve_server_timestamps(document: &Document, now: DateTime<Utc>) -> Document {
    document
        .iter()
        .map(|(name, value)| (name.to_string(), resolve_value(value, now)))
        .collect()
}

fn resolve_value(value: &FieldValue, now: DateTime<Utc>) -> FieldValue {
    match value {
        FieldValue::Timestamp(Timestamp::ServerAssigned) => {
            FieldValue::Timestamp(Timestamp::At(now))
        }
        FieldValue::Array(values) => {
            FieldValue::Array(values.iter().map(|v| resolve_value(v, now)).collect())
        }
        FieldValue::Map(document) => FieldValue::Map(resolve_server_timestamps(document, now)),
        other => other.clone(),
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        Ok(self.document(collection, id).await)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
    ) -> AppResult<()> {
        encode_document(document)?;

        let mut state = self.state.write().await;
        if state.failing_writes.contains(collection) {
            return Err(unavailable(collection));
        }
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), resolve_server_timestamps(document, Utc::now()));
        Ok(())
    }

    async fn add_document(&self, collection: &str, document: &Document) -> AppResult<DocumentRef> {
        encode_document(document)?;

        let mut state = self.state.write().await;
        if state.failing_writes.contains(collection) {
            return Err(unavailable(collection));
        }

        let docs = state.collections.entry(collection.to_string()).or_default();
        let id = loop {
            let candidate = auto_id();
            if !docs.contains_key(&candidate) {
                break candidate;
            }
        };
        docs.insert(id.clone(), resolve_server_timestamps(document, Utc::now()));
        Ok(DocumentRef::new(collection, id))
    }

    async fn list_documents(&self, collection: &str) -> AppResult<Vec<DocumentRef>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.keys()
                    .map(|id| DocumentRef::new(collection, id.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_document(&self, reference: &DocumentRef) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.failing_deletes.contains(&reference.collection) {
            return Err(unavailable(&reference.collection));
        }
        if let Some(docs) = state.collections.get_mut(&reference.collection) {
            docs.remove(&reference.id);
        }
        Ok(())
    }
}
