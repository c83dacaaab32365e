use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::requests::{CreatePurchaseRequest, PurchaseRequestList, UpdatePurchaseRequestStatus},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    models::PurchaseRequest,
    response::ApiResponse,
    routes::params::RequestListQuery,
    services::purchase_request_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/{id}", get(get_request).put(update_request_status))
}

#[utoipa::path(
    get,
    path = "/api/requests",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "pending, accepted or declined"),
        ("buyer_id" = Option<Uuid>, Query, description = "Filter by buyer"),
        ("seller_id" = Option<Uuid>, Query, description = "Filter by seller")
    ),
    responses(
        (status = 200, description = "List purchase requests", body = ApiResponse<PurchaseRequestList>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Purchase Requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RequestListQuery>,
) -> AppResult<Json<ApiResponse<PurchaseRequestList>>> {
    let resp = purchase_request_service::list_purchase_requests(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Purchase request and its chat created", body = ApiResponse<PurchaseRequest>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Product, buyer or seller not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Purchase Requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePurchaseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PurchaseRequest>>)> {
    let resp = purchase_request_service::create_purchase_request(&state, payload).await?;
    Ok(resp.created())
}

#[utoipa::path(
    get,
    path = "/api/requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase request ID")
    ),
    responses(
        (status = 200, description = "Get purchase request", body = ApiResponse<PurchaseRequest>),
        (status = 404, description = "Purchase request not found")
    ),
    tag = "Purchase Requests"
)]
pub async fn get_request(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<PurchaseRequest>>> {
    let resp = purchase_request_service::get_purchase_request(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase request ID")
    ),
    request_body = UpdatePurchaseRequestStatus,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<PurchaseRequest>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Purchase request not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Purchase Requests"
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePurchaseRequestStatus>,
) -> AppResult<Json<ApiResponse<PurchaseRequest>>> {
    let resp = purchase_request_service::update_purchase_request_status(&state, id, payload).await?;
    Ok(Json(resp))
}
