use async_trait::async_trait;
use paqueteria_auth::Session;
use paqueteria_auth::session::EMULATOR_TOKEN;
use paqueteria_config::FirebaseConfig;
use paqueteria_core::AppResult;
use paqueteria_models::Document;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::auto_id::auto_id;
use crate::documents::{DocumentRef, DocumentStore};
use crate::firestore::codec::{decode_fields, encode_document};
use crate::http::{error_from_response, transport_error};

const LIST_PAGE_SIZE: &str = "300";

#[derive(Clone)]
pub struct FirestoreClient {
    http: Client,
    base_url: String,
    project_id: String,
    database_id: String,
    bearer: String,
}

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl FirestoreClient {
    /// `base_url` excludes the `/v1` segment.
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        bearer: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            bearer: bearer.into(),
        }
    }

    /// Targets the production API or the Firestore emulator, per `config`.
    pub fn from_session(http: Client, config: &FirebaseConfig, session: &Session) -> Self {
        let bearer = if config.firestore_emulator_host.is_some() {
            EMULATOR_TOKEN
        } else {
            session.bearer_token()
        };
        Self::new(
            http,
            config.firestore_url(),
            session.project_id(),
            &config.database_id,
            bearer,
        )
    }

    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.documents_root())
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/v1/{resource}", self.base_url)
    }

    /// A full-document `update` write, with server timestamps as transforms.
    fn update_write(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
        must_not_exist: bool,
    ) -> AppResult<Value> {
        let encoded = encode_document(document)?;
        let mut write = json!({
            "update": {
                "name": self.document_name(collection, id),
                "fields": encoded.fields,
            }
        });

        let transforms = encoded.field_transforms();
        if !transforms.is_empty() {
            write["updateTransforms"] = Value::Array(transforms);
        }
        if must_not_exist {
            write["currentDocument"] = json!({"exists": false});
        }
        Ok(write)
    }

    async fn commit(&self, write: Value) -> AppResult<()> {
        let response = self
            .http
            .post(self.url(&format!("{}:commit", self.documents_root())))
            .bearer_auth(&self.bearer)
            .json(&json!({"writes": [write]}))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}

fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self))]
    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let response = self
            .http
            .get(self.url(&self.document_name(collection, id)))
            .bearer_auth(&self.bearer)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let raw: RawDocument = response.json().await.map_err(transport_error)?;
        decode_fields(&raw.fields).map(Some)
    }

    #[instrument(skip(self, document))]
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
    ) -> AppResult<()> {
        let write = self.update_write(collection, id, document, false)?;
        self.commit(write).await?;
        debug!("Document written");
        Ok(())
    }

    #[instrument(skip(self, document))]
    async fn add_document(&self, collection: &str, document: &Document) -> AppResult<DocumentRef> {
        let id = auto_id();
        let write = self.update_write(collection, &id, document, true)?;
        self.commit(write).await?;
        debug!(id = %id, "Document added");
        Ok(DocumentRef::new(collection, id))
    }

    #[instrument(skip(self))]
    async fn list_documents(&self, collection: &str) -> AppResult<Vec<DocumentRef>> {
        let url = self.url(&format!("{}/{collection}", self.documents_root()));
        let mut references = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&self.bearer)
                .query(&[("pageSize", LIST_PAGE_SIZE), ("mask.fieldPaths", "__name__")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await.map_err(transport_error)?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let page: ListResponse = response.json().await.map_err(transport_error)?;
            references.extend(
                page.documents
                    .iter()
                    .map(|doc| DocumentRef::new(collection, document_id(&doc.name))),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = references.len(), "Listed documents");
        Ok(references)
    }

    #[instrument(skip(self, reference), fields(document = %reference))]
    async fn delete_document(&self, reference: &DocumentRef) -> AppResult<()> {
        let response = self
            .http
            .delete(self.url(&self.document_name(&reference.collection, &reference.id)))
            .bearer_auth(&self.bearer)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paqueteria_models::Timestamp;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ROOT: &str = "/v1/projects/demo-paqueteria/databases/(default)/documents";

    fn client(server: &MockServer) -> FirestoreClient {
        FirestoreClient::new(
            Client::new(),
            server.uri(),
            "demo-paqueteria",
            "(default)",
            "test-token",
        )
    }

    #[tokio::test]
    async fn test_set_document_sends_transforms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{ROOT}:commit")))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({
                "writes": [{
                    "update": {
                        "name": "projects/demo-paqueteria/databases/(default)/documents/usuarios/uid-1",
                        "fields": {
                            "email": {"stringValue": "admin@paqueteria.com"},
                            "activo": {"booleanValue": true}
                        }
                    },
                    "updateTransforms": [
                        {"fieldPath": "updatedAt", "setToServerValue": "REQUEST_TIME"}
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "writeResults": [{}],
                "commitTime": "2025-03-14T09:30:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let document = Document::new()
            .with("email", "admin@paqueteria.com")
            .with("activo", true)
            .with("updatedAt", Timestamp::ServerAssigned);

        client(&server)
            .set_document("usuarios", "uid-1", &document)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_document_requires_absent_target() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{ROOT}:commit")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"writeResults": [{}]})))
            .expect(1)
            .mount(&server)
            .await;

        let reference = client(&server)
            .add_document("emisores", &Document::new().with("nombre", "Tienda"))
            .await
            .unwrap();

        assert_eq!(reference.collection, "emisores");
        assert_eq!(reference.id.len(), 20);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let write = &body["writes"][0];
        assert_eq!(write["currentDocument"], json!({"exists": false}));
        assert!(
            write["update"]["name"]
                .as_str()
                .unwrap()
                .ends_with(&format!("/emisores/{}", reference.id))
        );
        assert!(write.get("updateTransforms").is_none());
    }

    #[tokio::test]
    async fn test_get_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{ROOT}/usuarios/uid-1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/demo-paqueteria/databases/(default)/documents/usuarios/uid-1",
                "fields": {
                    "email": {"stringValue": "admin@paqueteria.com"},
                    "createdAt": {"timestampValue": "2025-01-01T00:00:00Z"}
                },
                "createTime": "2025-01-01T00:00:00Z",
                "updateTime": "2025-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;

        let document = client(&server)
            .get_document("usuarios", "uid-1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(document.get_str("email"), Some("admin@paqueteria.com"));
        assert!(matches!(
            document.get_timestamp("createdAt"),
            Some(Timestamp::At(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{ROOT}/usuarios/missing")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}
            })))
            .mount(&server)
            .await;

        let document = client(&server).get_document("usuarios", "missing").await.unwrap();
        assert!(document.is_none());
    }

    #[tokio::test]
    async fn test_list_documents_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{ROOT}/ordenes")))
            .and(query_param("pageToken", "next-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [{"name": "projects/demo-paqueteria/databases/(default)/documents/ordenes/c"}]
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{ROOT}/ordenes")))
            .and(query_param("pageSize", "300"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {"name": "projects/demo-paqueteria/databases/(default)/documents/ordenes/a"},
                    {"name": "projects/demo-paqueteria/databases/(default)/documents/ordenes/b"}
                ],
                "nextPageToken": "next-1"
            })))
            .with_priority(2)
            .mount(&server)
            .await;

        let references = client(&server).list_documents("ordenes").await.unwrap();
        let ids: Vec<&str> = references.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{ROOT}/receptores")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let references = client(&server).list_documents("receptores").await.unwrap();
        assert!(references.is_empty());
    }

    #[tokio::test]
    async fn test_delete_document() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{ROOT}/emisores/abc")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete_document(&DocumentRef::new("emisores", "abc"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_commit_error_is_remote() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{ROOT}:commit")))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "Missing or insufficient permissions.",
                    "status": "PERMISSION_DENIED"
                }
            })))
            .mount(&server)
            .await;

        let error = client(&server)
            .set_document("usuarios", "uid-1", &Document::new().with("activo", true))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            paqueteria_core::AppError::Remote {
                status: 403,
                code: Some(ref c),
                ..
            } if c == "PERMISSION_DENIED"
        ));
    }
}
