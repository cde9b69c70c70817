use std::fmt;

use async_trait::async_trait;
use paqueteria_core::AppResult;
use paqueteria_models::Document;

/// Location of a stored document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document database with top-level collections.
///
/// Server-assigned timestamps inside a written [`Document`] are stamped by
/// the store at write time.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document, `None` if it does not exist.
    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Creates or fully overwrites the document at `collection/id`.
    async fn set_document(&self, collection: &str, id: &str, document: &Document)
    -> AppResult<()>;

    /// Creates a document under a store-generated id.
    async fn add_document(&self, collection: &str, document: &Document) -> AppResult<DocumentRef>;

    /// Lists every document currently in `collection`.
    async fn list_documents(&self, collection: &str) -> AppResult<Vec<DocumentRef>>;

    async fn delete_document(&self, reference: &DocumentRef) -> AppResult<()>;
}
