use super::{health, records};
use crate::store::RecordStore;
use axum::extract::FromRef;
use std::sync::LazyLock;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `/health` probe.
pub fn system_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
    RecordStore: FromRef<S>,
{
    LazyLock::force(&health::START_TIME);
    OpenApiRouter::<S>::new().routes(routes!(health::health_handler))
}

/// The four collection endpoints.
pub fn records_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
    RecordStore: FromRef<S>,
{
    OpenApiRouter::<S>::new()
        .routes(routes!(records::list_customers))
        .routes(routes!(records::list_subscriptions))
        .routes(routes!(records::list_invoices))
        .routes(routes!(records::list_plans))
}
