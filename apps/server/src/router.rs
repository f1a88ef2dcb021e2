use anyhow::{Context, Result};
use axum::Router;
use axum::body::Bytes;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use billmock_kernel::domain::constants::BANNER;
use billmock_kernel::server::AppState;
use billmock_kernel::server::router::{records_router, system_router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

/// Interactive API reference.
pub const DOCS_PATH: &str = "/api-docs";
/// Generated `OpenAPI` document, YAML encoded.
pub const DOCS_YAML_PATH: &str = "/api-docs.yaml";

const YAML_CONTENT_TYPE: &str = "text/yaml; charset=utf-8";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subscription Mock API",
        description = "Read-only billing records (customers, subscriptions, invoices, plans) \
                       served from JSONL files, with field filters and pagination."
    ),
    tags(
        (name = "Billing", description = "Static billing collections"),
        (name = "System", description = "Service health"),
    )
)]
struct ApiDoc;

/// Builds the full application router: collections, health, docs, banner.
///
/// # Errors
/// Fails only if the generated `OpenAPI` document cannot be rendered as YAML.
pub fn init(state: AppState) -> Result<Router> {
    let (api_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(records_router())
        .merge(system_router())
        .with_state(state)
        .split_for_parts();

    let yaml = Bytes::from(
        api_doc.to_yaml().context("Failed to render the OpenAPI document as YAML")?,
    );

    let docs_routes = Router::new().route(
        DOCS_YAML_PATH,
        get(move || async move { ([(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], yaml) }),
    );

    Ok(Router::new()
        .route("/", get(banner))
        .merge(api_routes)
        .merge(docs_routes)
        .merge(Scalar::with_url(DOCS_PATH, api_doc))
        .layer(TraceLayer::new_for_http()))
}

async fn banner() -> impl IntoResponse {
    BANNER
}
