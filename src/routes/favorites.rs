use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::favorites::{AddFavoriteRequest, FavoriteList},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    models::Favorite,
    response::ApiResponse,
    routes::params::UserIdQuery,
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/{product_id}", post(add_favorite).delete(remove_favorite))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    params(
        ("user_id" = String, Query, description = "User ID; non-UUID legacy ids return an empty list")
    ),
    responses(
        (status = 200, description = "List favorites with product and seller", body = ApiResponse<FavoriteList>),
        (status = 400, description = "user_id missing")
    ),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserIdQuery>,
) -> AppResult<Json<ApiResponse<FavoriteList>>> {
    let resp = favorite_service::list_favorites(&state, query.required()?).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/favorites/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Added to favorites", body = ApiResponse<Favorite>),
        (status = 404, description = "Product or user not found"),
        (status = 409, description = "Product already favorited")
    ),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<Uuid>,
    AppJson(payload): AppJson<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Favorite>>)> {
    let resp = favorite_service::add_favorite(&state, product_id, payload).await?;
    Ok(resp.created())
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("user_id" = String, Query, description = "User ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites"),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "Favorite not found")
    ),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<UserIdQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = favorite_service::remove_favorite(&state, query.required_uuid()?, product_id).await?;
    Ok(Json(resp))
}
