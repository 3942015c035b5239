mod common;

use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use admin_infrastructure::backend::eq;
use admin_infrastructure::BackendError;

use common::{client_for, SERVICE_KEY};

#[tokio::test]
async fn select_sends_service_key_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/roles"))
        .and(header("apikey", SERVICE_KEY))
        .and(header("authorization", format!("Bearer {}", SERVICE_KEY).as_str()))
        .and(query_param("activo", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }, { "id": 2 }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rows: Vec<Value> = client.select("roles", &[eq("activo", true)]).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn insert_asks_for_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/roles"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({ "nombre": "Inspector" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "nombre": "Inspector" }])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rows: Vec<Value> = client.insert("roles", &json!({ "nombre": "Inspector" })).await.unwrap();
    assert_eq!(rows[0]["nombre"], "Inspector");
}

#[tokio::test]
async fn error_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/roles"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"roles_nombre_key\"",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.insert::<_, Value>("roles", &json!({})).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert!(err.is_conflict());
    match err {
        BackendError::Status { message, .. } => assert!(message.starts_with("duplicate key")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn rpc_posts_named_arguments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/obtener_actividades_recientes"))
        .and(body_partial_json(json!({ "limite": 10 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rows: Vec<Value> = client
        .rpc("obtener_actividades_recientes", &json!({ "limite": 10 }))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn auth_admin_endpoints() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/auth/v1/admin/users"))
        .and(body_partial_json(json!({ "email": "ana@example.com", "email_confirm": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": id, "email": "ana@example.com" })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/auth/v1/admin/users/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .create_auth_user("ana@example.com", "Qz7!tranquilo-Marea#91", json!({}))
        .await
        .unwrap();
    assert_eq!(created, id);
    client.delete_auth_user(&id).await.unwrap();
}

#[tokio::test]
async fn plain_text_errors_are_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.ping().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("upstream unavailable"));
}
