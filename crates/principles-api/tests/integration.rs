//! Integration tests for the principles API
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`,
//! backed by the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use principles_api::{create_router, AppState};
use principles_core::{
    IdCodec, InMemoryPrincipleStore, NewPrinciple, PrincipleStore, StoreError,
    StoreResult, StoredDocument,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_router() -> (Router, Arc<InMemoryPrincipleStore>) {
    let store = Arc::new(InMemoryPrincipleStore::new());
    (create_router(AppState::new(store.clone())), store)
}

fn unavailable_router() -> Router {
    create_router(AppState::<InMemoryPrincipleStore>::unavailable())
}

async fn send_raw(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(router, request).await;
    let body = serde_json::from_slice(&bytes).expect("response body is JSON");
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

async fn create(router: &Router, body: Value) -> String {
    let (status, response) = send(router, post_json("/principles", body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {response}");
    response["inserted_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_home_route() {
    let (router, _) = create_test_router();
    let (status, body) = send(&router, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["message"], "Welcome to the Ahourai Project API!");
}

#[tokio::test]
async fn test_create_then_get_by_id() {
    let (router, _) = create_test_router();

    let (status, body) = send(
        &router,
        post_json(
            "/principles",
            r#"{"title":"Honesty","description":"Be truthful","rank":1}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Principle added successfully.");

    let id = body["inserted_id"].as_str().unwrap();
    assert!(InMemoryPrincipleStore::parse_id(id).is_ok());

    let (status, body) = send(&router, get(&format!("/principles/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["_id"], id);
    assert_eq!(body["data"]["title"], "Honesty");
    assert_eq!(body["data"]["description"], "Be truthful");
    assert_eq!(body["data"]["rank"], 1);
}

#[tokio::test]
async fn test_create_missing_fields_persists_nothing() {
    let (router, store) = create_test_router();

    for payload in [
        r#"{"title":"Honesty"}"#,
        r#"{"description":"Be truthful"}"#,
        r#"{}"#,
        r#"[]"#,
        "",
    ] {
        let (status, body) = send(&router, post_json("/principles", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["message"],
            "Missing 'title' or 'description' in request body."
        );
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_create_malformed_json() {
    let (router, store) = create_test_router();
    let (status, body) = send(&router, post_json("/principles", "{\"title\": ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_get_invalid_id() {
    let (router, _) = create_test_router();
    let (status, body) = send(&router, get("/principles/not-a-valid-id")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid ID format.");
}

#[tokio::test]
async fn test_get_unknown_id() {
    let (router, _) = create_test_router();
    let id = uuid::Uuid::new_v4();
    let (status, body) = send(&router, get(&format!("/principles/{id}"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Principle not found.");
}

#[tokio::test]
async fn test_list_after_creations() {
    let (router, _) = create_test_router();

    let (status, body) = send(&router, get("/principles")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(create(&router, json!({"title": format!("t{i}"), "description": "d"})).await);
    }

    let (status, body) = send(&router, get("/principles")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 4);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    assert!(data.iter().all(|doc| doc["_id"].is_string()));
    for id in &ids {
        assert!(data.iter().any(|doc| doc["_id"] == json!(id)));
    }
}

#[tokio::test]
async fn test_extra_fields_are_kept() {
    let (router, _) = create_test_router();
    let id = create(
        &router,
        json!({
            "title": "Courage",
            "description": "Act despite fear",
            "tags": ["core"],
            "meta": {"source": "tradition"}
        }),
    )
    .await;

    let (_, body) = send(&router, get(&format!("/principles/{id}"))).await;
    assert_eq!(body["data"]["tags"], json!(["core"]));
    assert_eq!(body["data"]["meta"]["source"], "tradition");
}

#[tokio::test]
async fn test_client_supplied_id_is_replaced() {
    let (router, _) = create_test_router();
    let id = create(
        &router,
        json!({"_id": "chosen-by-client", "title": "a", "description": "b"}),
    )
    .await;

    assert_ne!(id, "chosen-by-client");
    let (_, body) = send(&router, get(&format!("/principles/{id}"))).await;
    assert_eq!(body["data"]["_id"], id);
}

#[tokio::test]
async fn test_non_ascii_is_not_escaped() {
    let (router, _) = create_test_router();
    let id = create(&router, json!({"title": "راستی", "description": "گفتار نیک"})).await;

    let (status, bytes) = send_raw(&router, get(&format!("/principles/{id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("راستی"));
    assert!(text.contains("گفتار نیک"));
    assert!(!text.contains("\\u"));
}

#[tokio::test]
async fn test_store_unavailable() {
    let router = unavailable_router();

    let (status, body) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    let requests = [
        post_json("/principles", r#"{"title":"a","description":"b"}"#),
        post_json("/principles", "not json"),
        get("/principles"),
        get("/principles/not-a-valid-id"),
        get(&format!("/principles/{}", uuid::Uuid::new_v4())),
    ];

    for request in requests {
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Database connection not available.");
    }
}

#[tokio::test]
async fn test_get_undecodable_id() {
    let (router, _) = create_test_router();
    let (status, body) = send(&router, get("/principles/%FF")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid ID format.");

    let (status, body) = send(&unavailable_router(), get("/principles/%FF")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Database connection not available.");
}

#[tokio::test]
async fn test_unsupported_method_is_json() {
    let (router, store) = create_test_router();

    for (method, uri) in [
        ("DELETE", "/principles"),
        ("PUT", "/principles/abc"),
        ("PATCH", "/"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Method not allowed.");
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unknown_route_is_json() {
    let (router, _) = create_test_router();
    let (status, body) = send(&router, get("/nothing/here")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

/// Store whose every operation fails
#[derive(Debug)]
struct BrokenStore;

impl IdCodec for BrokenStore {
    type Id = String;

    fn parse_id(raw: &str) -> StoreResult<String> {
        Ok(raw.to_string())
    }

    fn render_id(id: &String) -> String {
        id.clone()
    }
}

#[async_trait::async_trait]
impl PrincipleStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Connection("no route to host".into()))
    }

    async fn insert(&self, _principle: NewPrinciple) -> StoreResult<String> {
        Err(StoreError::Operation("write concern failed".into()))
    }

    async fn find_all(&self) -> StoreResult<Vec<StoredDocument<String>>> {
        Err(StoreError::Operation("cursor killed".into()))
    }

    async fn find_by_id(&self, _id: &String) -> StoreResult<Option<StoredDocument<String>>> {
        Err(StoreError::Operation("node is recovering".into()))
    }
}

#[tokio::test]
async fn test_store_failures_surface_message() {
    let router = create_router(AppState::new(Arc::new(BrokenStore)));

    let cases = [
        (
            post_json("/principles", r#"{"title":"a","description":"b"}"#),
            "write concern failed",
        ),
        (get("/principles"), "cursor killed"),
        (get("/principles/anything"), "node is recovering"),
    ];

    for (request, message) in cases {
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], message);
    }
}
