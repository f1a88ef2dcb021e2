use crate::store::RecordStore;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use billmock_domain::constants::SYSTEM_TAG;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Instant;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `up` once every collection is loaded, `loading` before that
    pub status: &'static str,
    /// Version
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    /// Whether startup loading has completed
    pub ready: bool,
    /// Records currently served per collection
    pub collections: Vec<CollectionStatus>,
}

/// Size of one published collection
#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionStatus {
    pub name: &'static str,
    pub records: usize,
}

pub(super) static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[utoipa::path(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(store): State<RecordStore>) -> impl IntoResponse {
    let ready = store.is_ready();
    let body = HealthResponse {
        status: if ready { "up" } else { "loading" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
        ready,
        collections: store
            .counts()
            .into_iter()
            .map(|(entity, records)| CollectionStatus { name: entity.name(), records })
            .collect(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
