use crate::query::RecordQuery;
use crate::record::Record;
use crate::store::RecordStore;
use axum::Json;
use axum::extract::{Query, State};
use billmock_domain::constants::BILLING_TAG;
use billmock_domain::entity::Entity;
use tracing::debug;

type QueryParams = Query<Vec<(String, String)>>;

fn list(store: &RecordStore, entity: Entity, params: Vec<(String, String)>) -> Json<Vec<Record>> {
    let query = RecordQuery::from_params(params);
    let collection = store.get_all(entity);
    let page: Vec<Record> = query.apply(&collection).into_iter().cloned().collect();

    debug!(
        entity = %entity,
        total = collection.len(),
        returned = page.len(),
        page = query.page(),
        limit = query.limit(),
        criteria = query.criteria().len(),
        "Listed records"
    );

    Json(page)
}

/// List customers
///
/// Any query parameter other than `page` and `limit` filters on the field of the same
/// name. Text fields must match exactly, numeric fields by value; records lacking the
/// field are kept.
#[utoipa::path(
    get,
    path = "/customers",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number", example = 1),
        ("limit" = Option<u32>, Query, description = "Page size", example = 50),
    ),
    responses((status = OK, description = "Matching customers", body = [Record])),
    tag = BILLING_TAG,
)]
pub(super) async fn list_customers(
    State(store): State<RecordStore>,
    Query(params): QueryParams,
) -> Json<Vec<Record>> {
    list(&store, Entity::Customers, params)
}

/// List subscriptions
///
/// Filters and pages like `/customers`.
#[utoipa::path(
    get,
    path = "/subscriptions",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number", example = 1),
        ("limit" = Option<u32>, Query, description = "Page size", example = 50),
    ),
    responses((status = OK, description = "Matching subscriptions", body = [Record])),
    tag = BILLING_TAG,
)]
pub(super) async fn list_subscriptions(
    State(store): State<RecordStore>,
    Query(params): QueryParams,
) -> Json<Vec<Record>> {
    list(&store, Entity::Subscriptions, params)
}

/// List invoices
///
/// Filters and pages like `/customers`.
#[utoipa::path(
    get,
    path = "/invoices",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number", example = 1),
        ("limit" = Option<u32>, Query, description = "Page size", example = 50),
    ),
    responses((status = OK, description = "Matching invoices", body = [Record])),
    tag = BILLING_TAG,
)]
pub(super) async fn list_invoices(
    State(store): State<RecordStore>,
    Query(params): QueryParams,
) -> Json<Vec<Record>> {
    list(&store, Entity::Invoices, params)
}

/// List plans
///
/// Filters and pages like `/customers`.
#[utoipa::path(
    get,
    path = "/plans",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number", example = 1),
        ("limit" = Option<u32>, Query, description = "Page size", example = 50),
    ),
    responses((status = OK, description = "Matching plans", body = [Record])),
    tag = BILLING_TAG,
)]
pub(super) async fn list_plans(
    State(store): State<RecordStore>,
    Query(params): QueryParams,
) -> Json<Vec<Record>> {
    list(&store, Entity::Plans, params)
}
