use chrono::{TimeZone, Utc};
use serde_json::json;
use sion_application::UserRepository;
use sion_core::{AppError, NonEmptyString};
use sion_domain::{
    EmailAddress, RecordStamps, RoleId, UserId, UserProfile, UserRecord, UserStatus,
};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::firestore_client::{FirestoreClient, FirestoreConfig, FirestoreDocument};

use super::{FirestoreUserRepository, decode_user};

const DOCUMENTS_PATH: &str = "/v1/projects/sion-admin/databases/(default)/documents";

fn document(value: serde_json::Value) -> FirestoreDocument {
    serde_json::from_value(value).unwrap_or_else(|_| unreachable!())
}

fn repository_for(server: &MockServer) -> FirestoreUserRepository {
    let base_url = Url::parse(server.uri().as_str()).unwrap_or_else(|_| unreachable!());
    let config = FirestoreConfig::with_base_url(base_url, "sion-admin", "(default)")
        .unwrap_or_else(|_| unreachable!());
    FirestoreUserRepository::new(FirestoreClient::new(reqwest::Client::new(), config))
}

fn ana_document() -> serde_json::Value {
    json!({
        "name": "projects/sion-admin/databases/(default)/documents/users/ana",
        "fields": {
            "name": { "stringValue": "Ana" },
            "lastName": { "stringValue": "Ruiz" },
            "email": { "stringValue": "ana@sion.example" },
            "status": { "stringValue": "inactive" },
            "createdAt": { "timestampValue": "2024-03-09T18:30:00Z" },
            "roles": { "arrayValue": { "values": [
                { "referenceValue": "projects/sion-admin/databases/(default)/documents/roles/servidor" },
                { "stringValue": "miembro" }
            ] } }
        }
    })
}

#[test]
fn decodes_user_with_mixed_role_links() {
    let user = decode_user(&document(ana_document()));
    assert!(user.is_ok());

    let user = user.unwrap_or_else(|_| unreachable!());
    assert_eq!(user.id().as_str(), "ana");
    assert_eq!(user.status(), UserStatus::Inactive);
    assert_eq!(user.profile().effective_display_name(), "Ana Ruiz");
    let roles: Vec<&str> = user.role_ids().iter().map(RoleId::as_str).collect();
    assert_eq!(roles, vec!["servidor", "miembro"]);
    assert_eq!(
        user.stamps().created_at,
        Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).single()
    );
}

#[test]
fn user_without_roles_or_status_defaults() {
    let user = decode_user(&document(json!({
        "name": "projects/p/databases/(default)/documents/users/bruno",
        "fields": {
            "name": { "stringValue": "Bruno" },
            "email": { "stringValue": "bruno@sion.example" }
        }
    })));

    let user = user.unwrap_or_else(|_| unreachable!());
    assert!(user.role_ids().is_empty());
    assert_eq!(user.status(), UserStatus::Active);
}

#[test]
fn rejects_malformed_user_documents() {
    let missing_email = decode_user(&document(json!({
        "name": "projects/p/databases/(default)/documents/users/bruno",
        "fields": { "name": { "stringValue": "Bruno" } }
    })));
    assert!(matches!(missing_email, Err(AppError::MalformedDocument(_))));

    let roles_as_string = decode_user(&document(json!({
        "name": "projects/p/databases/(default)/documents/users/bruno",
        "fields": {
            "name": { "stringValue": "Bruno" },
            "email": { "stringValue": "bruno@sion.example" },
            "roles": { "stringValue": "miembro" }
        }
    })));
    assert!(matches!(roles_as_string, Err(AppError::MalformedDocument(_))));

    let unknown_status = decode_user(&document(json!({
        "name": "projects/p/databases/(default)/documents/users/bruno",
        "fields": {
            "name": { "stringValue": "Bruno" },
            "email": { "stringValue": "bruno@sion.example" },
            "status": { "stringValue": "archived" }
        }
    })));
    assert!(matches!(unknown_status, Err(AppError::MalformedDocument(_))));
}

#[tokio::test]
async fn find_user_by_email_queries_email_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:runQuery")))
        .and(body_partial_json(json!({
            "structuredQuery": { "where": { "fieldFilter": {
                "field": { "fieldPath": "email" },
                "value": { "stringValue": "ana@sion.example" }
            } } }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "document": ana_document() }])),
        )
        .mount(&server)
        .await;

    let repository = repository_for(&server);
    let email = EmailAddress::new("ana@sion.example").unwrap_or_else(|_| unreachable!());
    let found = repository.find_user_by_email(&email).await;
    assert_eq!(
        found.ok().flatten().map(|user| user.id().as_str().to_owned()),
        Some("ana".to_owned())
    );
}

#[tokio::test]
async fn find_user_by_email_is_none_without_matches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "readTime": "2024-03-09T18:30:00Z" }])))
        .mount(&server)
        .await;

    let repository = repository_for(&server);
    let email = EmailAddress::new("nadie@sion.example").unwrap_or_else(|_| unreachable!());
    assert!(matches!(repository.find_user_by_email(&email).await, Ok(None)));
}

#[tokio::test]
async fn create_user_writes_role_references_at_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}/users")))
        .and(query_param("documentId", "ana"))
        .and(body_partial_json(json!({
            "fields": {
                "name": { "stringValue": "Ana" },
                "email": { "stringValue": "ana@sion.example" },
                "status": { "stringValue": "active" },
                "createdBy": { "stringValue": "admin" },
                "roles": { "arrayValue": { "values": [
                    { "referenceValue": "projects/sion-admin/databases/(default)/documents/roles/servidor" }
                ] } }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana_document()))
        .expect(1)
        .mount(&server)
        .await;

    let at = Utc
        .with_ymd_and_hms(2024, 3, 9, 18, 30, 0)
        .single()
        .unwrap_or_else(|| unreachable!());
    let user = UserRecord::new(
        UserId::new("ana").unwrap_or_else(|_| unreachable!()),
        UserProfile {
            name: NonEmptyString::new("Ana").unwrap_or_else(|_| unreachable!()),
            last_name: None,
            display_name: None,
            email: EmailAddress::new("ana@sion.example").unwrap_or_else(|_| unreachable!()),
            phone: None,
            avatar: None,
            address: None,
        },
        UserStatus::Active,
        vec![RoleId::new("servidor").unwrap_or_else(|_| unreachable!())],
        RecordStamps::created("admin", at),
    );

    let repository = repository_for(&server);
    assert!(repository.create_user(user).await.is_ok());
}

#[tokio::test]
async fn listing_tolerates_bytes_and_geo_point_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS_PATH}/users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{
                "name": "projects/sion-admin/databases/(default)/documents/users/carla",
                "fields": {
                    "name": { "stringValue": "Carla" },
                    "email": { "stringValue": "carla@sion.example" },
                    "avatar": { "bytesValue": "iVBORw0KGgo=" },
                    "homeLocation": {
                        "geoPointValue": { "latitude": 4.711, "longitude": -74.072 }
                    }
                }
            }]
        })))
        .mount(&server)
        .await;

    let users = repository_for(&server).list_users().await;
    assert!(users.is_ok());

    let ids: Vec<String> = users
        .unwrap_or_default()
        .iter()
        .map(|user| user.id().as_str().to_owned())
        .collect();
    assert_eq!(ids, vec!["carla".to_owned()]);
}
