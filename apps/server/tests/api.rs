use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use billmock_kernel::domain::config::{ApiConfig, DataConfig};
use billmock_kernel::prelude::*;
use billmock_server::{router, spawn_data_load};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(store: RecordStore) -> Router {
    let state = AppState::builder().config(ApiConfig::default()).store(store).build().unwrap();
    router::init(state).unwrap()
}

fn records(values: impl IntoIterator<Item = Value>) -> Vec<Record> {
    values.into_iter().map(|v| Record::try_from(v).unwrap()).collect()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response =
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    (status, content_type, body)
}

async fn get_json(app: Router, uri: &str) -> Value {
    let (status, _, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    serde_json::from_slice(&body).unwrap()
}

fn billing_store() -> RecordStore {
    let store = RecordStore::new();
    store.publish(
        Entity::Subscriptions,
        records([
            json!({"id": 1, "status": "active", "quantity": 3}),
            json!({"id": 2, "status": "past_due", "quantity": 1}),
            json!({"id": 3, "status": "active", "quantity": 1, "metadata": {"seats": 5}}),
        ]),
    );
    store.publish(Entity::Customers, records((0..120).map(|i| json!({"idx": i}))));
    store
}

#[tokio::test]
async fn filters_by_text_field() {
    let body = get_json(app(billing_store()), "/subscriptions?status=active").await;
    assert_eq!(
        body,
        json!([
            {"id": 1, "status": "active", "quantity": 3},
            {"id": 3, "status": "active", "quantity": 1, "metadata": {"seats": 5}},
        ])
    );
}

#[tokio::test]
async fn filters_by_numeric_field_and_combines_criteria() {
    let body = get_json(app(billing_store()), "/subscriptions?quantity=1&status=active").await;
    assert_eq!(body, json!([{"id": 3, "status": "active", "quantity": 1, "metadata": {"seats": 5}}]));
}

#[tokio::test]
async fn nested_fields_are_not_compared() {
    let body = get_json(app(billing_store()), "/subscriptions?metadata=anything").await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unknown_filter_returns_everything() {
    let body = get_json(app(billing_store()), "/subscriptions?foo=bar").await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn paginates_with_page_and_limit() {
    let body = get_json(app(billing_store()), "/customers?page=2&limit=50").await;
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 50);
    assert_eq!(page[0], json!({"idx": 50}));
    assert_eq!(page[49], json!({"idx": 99}));
}

#[tokio::test]
async fn default_page_is_first_fifty() {
    let body = get_json(app(billing_store()), "/customers").await;
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 50);
    assert_eq!(page[0], json!({"idx": 0}));
}

#[tokio::test]
async fn malformed_pagination_falls_back_to_defaults() {
    let body = get_json(app(billing_store()), "/customers?page=abc&limit=").await;
    assert_eq!(body.as_array().map(Vec::len), Some(50));

    let body = get_json(app(billing_store()), "/customers?page=0&limit=-5").await;
    assert_eq!(body, json!([{"idx": 0}]));
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let body = get_json(app(billing_store()), "/customers?page=4&limit=50").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn collections_are_empty_before_loading() {
    let body = get_json(app(RecordStore::new()), "/plans").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn background_load_populates_collections() {
    let tmp = TempDir::new().unwrap();
    for entity in Entity::ALL {
        fs::write(
            tmp.path().join(entity.file_name()),
            format!("{{\"id\":\"{}_1\"}}\n\n{{\"id\":\"{}_2\"}}\n", entity.name(), entity.name()),
        )
        .unwrap();
    }

    let store = RecordStore::new();
    let data = DataConfig { dir: tmp.path().to_path_buf(), wait_for_load: false };
    spawn_data_load(store.clone(), data).await.unwrap().unwrap();

    let body = get_json(app(store), "/plans?id=plans_2").await;
    assert_eq!(body, json!([{"id": "plans_2"}]));
}

#[tokio::test]
async fn health_reports_readiness() {
    let store = billing_store();
    let health = get_json(app(store.clone()), "/health").await;
    assert_eq!(health["status"], "loading");
    assert_eq!(health["ready"], false);
    assert_eq!(health["collections"][0], json!({"name": "customers", "records": 120}));

    store.mark_ready();
    let health = get_json(app(store), "/health").await;
    assert_eq!(health["status"], "up");
    assert_eq!(health["ready"], true);
}

#[tokio::test]
async fn root_serves_plaintext_banner() {
    let (status, content_type, body) = get(app(RecordStore::new()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/plain"));
    assert!(String::from_utf8(body).unwrap().contains("/api-docs"));
}

#[tokio::test]
async fn serves_generated_openapi_yaml() {
    let (status, content_type, body) = get(app(RecordStore::new()), "/api-docs.yaml").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/yaml; charset=utf-8"));

    let yaml = String::from_utf8(body).unwrap();
    assert!(yaml.starts_with("openapi:"));
    for path in ["/customers:", "/subscriptions:", "/invoices:", "/plans:", "/health:"] {
        assert!(yaml.contains(path), "missing {path} in generated document");
    }
}

#[tokio::test]
async fn serves_interactive_docs() {
    let (status, content_type, _) = get(app(RecordStore::new()), "/api-docs").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/html"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _, _) = get(app(RecordStore::new()), "/refunds").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
