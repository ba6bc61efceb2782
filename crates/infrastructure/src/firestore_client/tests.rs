use serde_json::json;
use sion_core::AppError;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{Fields, FirestoreClient, FirestoreConfig, FirestoreValue};

const ROLES_PATH: &str = "/v1/projects/sion-admin/databases/(default)/documents/roles";

fn client_for(
    server: &MockServer,
    config: impl FnOnce(FirestoreConfig) -> FirestoreConfig,
) -> FirestoreClient {
    let base_url = Url::parse(server.uri().as_str()).unwrap_or_else(|_| unreachable!());
    let settings = FirestoreConfig::with_base_url(base_url, "sion-admin", "(default)")
        .unwrap_or_else(|_| unreachable!());
    FirestoreClient::new(reqwest::Client::new(), config(settings))
}

#[tokio::test]
async fn missing_document_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROLES_PATH}/obispo")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, |config| config);
    let document = client.get_document("roles", "obispo").await;
    assert!(matches!(document, Ok(None)));
}

#[tokio::test]
async fn credentials_are_attached_to_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROLES_PATH}/miembro")))
        .and(query_param("key", "api-key-1"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/sion-admin/databases/(default)/documents/roles/miembro",
            "fields": { "name": { "stringValue": "Miembro" } }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, |config| {
        config
            .api_key(Some("api-key-1".to_owned()))
            .access_token(Some("token-1".to_owned()))
    });
    let document = client.get_document("roles", "miembro").await;
    assert!(document.is_ok());
    assert_eq!(
        document.unwrap_or_default().map(|document| document.id().to_owned()),
        Some("miembro".to_owned())
    );
}

#[tokio::test]
async fn listing_follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                { "name": "projects/sion-admin/databases/(default)/documents/roles/servidor" }
            ]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                { "name": "projects/sion-admin/databases/(default)/documents/roles/miembro" }
            ],
            "nextPageToken": "page-2"
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let client = client_for(&server, |config| config.page_size(1));
    let documents = client.list_documents("roles").await.unwrap_or_default();
    let ids: Vec<&str> = documents.iter().map(|document| document.id()).collect();
    assert_eq!(ids, vec!["miembro", "servidor"]);
}

#[tokio::test]
async fn empty_collection_lists_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server, |config| config);
    let documents = client.list_documents("roles").await;
    assert!(documents.is_ok());
    assert!(documents.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn upsert_patches_document_at_its_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{ROLES_PATH}/servidor")))
        .and(body_partial_json(json!({
            "fields": { "name": { "stringValue": "Servidor" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/sion-admin/databases/(default)/documents/roles/servidor",
            "fields": { "name": { "stringValue": "Servidor" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, |config| config);
    let fields = Fields::from([("name".to_owned(), FirestoreValue::string("Servidor"))]);
    let written = client.upsert_document("roles", "servidor", fields).await;
    assert!(written.is_ok());
}

#[tokio::test]
async fn create_with_taken_id_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/sion-admin/databases/(default)/documents/users"))
        .and(query_param("documentId", "ana"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": { "code": 409, "message": "Document already exists", "status": "ALREADY_EXISTS" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, |config| config);
    let result = client
        .create_document("users", Some("ana"), Fields::new())
        .await;
    match result {
        Err(AppError::Conflict(message)) => assert!(message.contains("ALREADY_EXISTS")),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_surface_as_internal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROLES_PATH}/miembro")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, |config| config);
    match client.get_document("roles", "miembro").await {
        Err(AppError::Internal(message)) => {
            assert!(message.contains("403"));
            assert!(message.contains("PERMISSION_DENIED"));
        }
        other => panic!("expected internal error, got {other:?}"),
    }
}

#[tokio::test]
async fn equality_query_returns_matching_documents() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/sion-admin/databases/(default)/documents:runQuery"))
        .and(body_partial_json(json!({
            "structuredQuery": {
                "from": [{ "collectionId": "users" }],
                "where": { "fieldFilter": {
                    "field": { "fieldPath": "email" },
                    "op": "EQUAL",
                    "value": { "stringValue": "ana@sion.example" }
                } }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "document": { "name": "projects/sion-admin/databases/(default)/documents/users/ana" },
                "readTime": "2024-03-09T18:30:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, |config| config);
    let documents = client
        .query_equal("users", "email", FirestoreValue::string("ana@sion.example"), 1)
        .await
        .unwrap_or_default();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id(), "ana");
}

#[test]
fn document_names_use_project_and_database() {
    let config = FirestoreConfig::new("sion-admin", "(default)").unwrap_or_else(|_| unreachable!());
    let client = FirestoreClient::new(reqwest::Client::new(), config);
    assert_eq!(
        client.document_name("roles", "miembro"),
        "projects/sion-admin/databases/(default)/documents/roles/miembro"
    );
}

#[test]
fn emulator_host_and_ids_are_validated() {
    assert!(FirestoreConfig::for_emulator("localhost:8080", "sion-admin", "(default)").is_ok());
    assert!(FirestoreConfig::new("", "(default)").is_err());
    assert!(FirestoreConfig::new("sion-admin", "a/b").is_err());
}
