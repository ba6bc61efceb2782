use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use sion_core::{AppError, AppResult};
use tracing::debug;
use url::Url;

mod document;
mod value;

pub(crate) use document::{DocumentReader, FirestoreDocument};
pub(crate) use value::{ArrayValue, Fields, FirestoreValue};

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/";
const DEFAULT_PAGE_SIZE: u32 = 300;

/// Connection settings for the Firestore REST API.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    base_url: Url,
    project_id: String,
    database_id: String,
    api_key: Option<String>,
    access_token: Option<String>,
    page_size: u32,
}

impl FirestoreConfig {
    /// Creates settings for the hosted Firestore service.
    pub fn new(project_id: impl Into<String>, database_id: impl Into<String>) -> AppResult<Self> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|error| AppError::Internal(format!("invalid Firestore base URL: {error}")))?;
        Self::with_base_url(base_url, project_id, database_id)
    }

    /// Creates settings for a local emulator listening on `host` (`host:port`).
    pub fn for_emulator(
        host: &str,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(format!("http://{}/", host.trim()).as_str()).map_err(|error| {
            AppError::Validation(format!("invalid Firestore emulator host '{host}': {error}"))
        })?;
        Self::with_base_url(base_url, project_id, database_id)
    }

    /// Creates settings against an explicit API root.
    pub fn with_base_url(
        base_url: Url,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
    ) -> AppResult<Self> {
        let project_id = project_id.into();
        let database_id = database_id.into();

        if project_id.trim().is_empty() || project_id.contains('/') {
            return Err(AppError::Validation(format!(
                "invalid Firestore project id '{project_id}'"
            )));
        }

        if database_id.trim().is_empty() || database_id.contains('/') {
            return Err(AppError::Validation(format!(
                "invalid Firestore database id '{database_id}'"
            )));
        }

        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "Firestore base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            base_url,
            project_id,
            database_id,
            api_key: None,
            access_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Sends `key=<api_key>` with every request.
    #[must_use]
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|value| !value.trim().is_empty());
        self
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token.filter(|value| !value.trim().is_empty());
        self
    }

    /// Overrides the page size used when listing collections.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Returns the configured project id.
    #[must_use]
    pub fn project_id(&self) -> &str {
        self.project_id.as_str()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryResponseItem {
    document: Option<FirestoreDocument>,
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorBody {
    error: FirestoreErrorDetail,
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Thin client over the Firestore REST document endpoints.
///
/// Constructed once by the composition root and shared by the repositories.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    http_client: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreClient {
    /// Creates a client from an HTTP client and connection settings.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: FirestoreConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Returns the full resource name of a document.
    #[must_use]
    pub(crate) fn document_name(&self, collection: &str, document_id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{collection}/{document_id}",
            self.config.project_id, self.config.database_id
        )
    }

    /// Fetches one document; `None` when it does not exist.
    pub(crate) async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> AppResult<Option<FirestoreDocument>> {
        let url = self.documents_url(&[collection, document_id], &[])?;
        debug!(collection, document_id, "fetching document");

        let operation = format!("get {collection}/{document_id}");
        let response = self.send(Method::GET, url, None, &operation).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        read_json(response, &operation).await.map(Some)
    }

    /// Lists every document in a collection, following page tokens.
    pub(crate) async fn list_documents(
        &self,
        collection: &str,
    ) -> AppResult<Vec<FirestoreDocument>> {
        let page_size = self.config.page_size.to_string();
        let operation = format!("list {collection}");
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", page_size.as_str())];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let url = self.documents_url(&[collection], &query)?;
            let response = self.send(Method::GET, url, None, &operation).await?;
            let page: ListDocumentsResponse = read_json(response, &operation).await?;

            documents.extend(page.documents);
            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    /// Writes a document at a known id, creating or fully replacing it.
    pub(crate) async fn upsert_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: Fields,
    ) -> AppResult<FirestoreDocument> {
        let url = self.documents_url(&[collection, document_id], &[])?;
        debug!(collection, document_id, "upserting document");

        let body = serde_json::to_value(FirestoreDocument::from_fields(fields))
            .map_err(|error| AppError::Internal(format!("failed to encode document: {error}")))?;
        let operation = format!("upsert {collection}/{document_id}");
        let response = self
            .send(Method::PATCH, url, Some(body), &operation)
            .await?;
        read_json(response, &operation).await
    }

    /// Creates a new document; the server assigns an id when none is given.
    ///
    /// Fails with [`AppError::Conflict`] when the id is already taken.
    pub(crate) async fn create_document(
        &self,
        collection: &str,
        document_id: Option<&str>,
        fields: Fields,
    ) -> AppResult<FirestoreDocument> {
        let query: Vec<(&str, &str)> = document_id
            .map(|id| vec![("documentId", id)])
            .unwrap_or_default();
        let url = self.documents_url(&[collection], &query)?;
        debug!(collection, document_id, "creating document");

        let body = serde_json::to_value(FirestoreDocument::from_fields(fields))
            .map_err(|error| AppError::Internal(format!("failed to encode document: {error}")))?;
        let operation = format!("create in {collection}");
        let response = self
            .send(Method::POST, url, Some(body), &operation)
            .await?;
        read_json(response, &operation).await
    }

    /// Returns up to `limit` documents of `collection` whose `field_path` equals `value`.
    pub(crate) async fn query_equal(
        &self,
        collection: &str,
        field_path: &str,
        value: FirestoreValue,
        limit: u32,
    ) -> AppResult<Vec<FirestoreDocument>> {
        let mut url = self.documents_url(&[], &[])?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| {
                    AppError::Internal("Firestore base URL cannot carry a path".to_owned())
                })?;
            segments.pop();
            segments.push("documents:runQuery");
        }
        debug!(collection, field_path, "running equality query");

        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field_path },
                        "op": "EQUAL",
                        "value": value,
                    }
                },
                "limit": limit,
            }
        });
        let operation = format!("query {collection}");
        let response = self
            .send(Method::POST, url, Some(body), &operation)
            .await?;
        let items: Vec<RunQueryResponseItem> = read_json(response, &operation).await?;

        Ok(items.into_iter().filter_map(|item| item.document).collect())
    }

    fn documents_url(&self, path: &[&str], query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| {
                    AppError::Internal("Firestore base URL cannot carry a path".to_owned())
                })?;
            segments.pop_if_empty().extend([
                "v1",
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database_id.as_str(),
                "documents",
            ]);
            segments.extend(path);
        }

        if !query.is_empty() || self.config.api_key.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if let Some(api_key) = self.config.api_key.as_deref() {
                pairs.append_pair("key", api_key);
            }
        }

        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
        operation: &str,
    ) -> AppResult<reqwest::Response> {
        let mut request = self.http_client.request(method, url);
        if let Some(token) = self.config.access_token.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        request.send().await.map_err(|error| {
            AppError::Internal(format!("Firestore {operation} request failed: {error}"))
        })
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> AppResult<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response, operation).await);
    }

    let body = response.bytes().await.map_err(|error| {
        AppError::Internal(format!("failed to read Firestore {operation} response: {error}"))
    })?;

    serde_json::from_slice(&body).map_err(|error| {
        AppError::MalformedDocument(format!(
            "failed to decode Firestore {operation} response: {error}"
        ))
    })
}

async fn error_from_response(response: reqwest::Response, operation: &str) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<FirestoreErrorBody>(body.as_str())
        .map(|parsed| format!("{} {}", parsed.error.status, parsed.error.message))
        .unwrap_or(body);
    let detail = detail.trim();

    match status {
        StatusCode::CONFLICT => AppError::Conflict(format!("Firestore {operation}: {detail}")),
        StatusCode::NOT_FOUND => AppError::NotFound(format!("Firestore {operation}: {detail}")),
        _ => AppError::Internal(format!(
            "Firestore {operation} failed with status {status}: {detail}"
        )),
    }
}

#[cfg(test)]
mod tests;
