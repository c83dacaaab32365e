use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::favorites::{AddFavoriteRequest, FavoriteList},
    entity::{
        Favorites,
        favorites::{ActiveModel as FavoriteActive, Column as FavoriteCol},
    },
    error::{AppError, AppResult, conflict_on_unique},
    models::Favorite,
    response::{ApiResponse, Meta},
    services::relations::{find_product, find_user, load_products},
    state::AppState,
};

/// Favorites of `user_id`, newest first, each with its product and seller.
///
/// A `user_id` that is not a UUID comes from a legacy client and yields an empty list.
pub async fn list_favorites(
    state: &AppState,
    user_id: &str,
) -> AppResult<ApiResponse<FavoriteList>> {
    let Ok(user_id) = Uuid::parse_str(user_id.trim()) else {
        return Ok(ApiResponse::success(
            "OK",
            FavoriteList { items: Vec::new() },
            Some(Meta::empty()),
        ));
    };

    let models = Favorites::find()
        .filter(FavoriteCol::UserId.eq(user_id))
        .order_by_desc(FavoriteCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let products = load_products(&state.orm, models.iter().map(|f| f.product_id)).await?;

    let items = models
        .into_iter()
        .map(|model| {
            let product = products.get(&model.product_id).cloned();
            let mut favorite = Favorite::from(model);
            favorite.product = product;
            favorite
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        FavoriteList { items },
        Some(Meta::empty()),
    ))
}

pub async fn add_favorite(
    state: &AppState,
    product_id: Uuid,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<Favorite>> {
    let user_id = payload.user_id;
    find_product(&state.orm, product_id).await?;
    find_user(&state.orm, user_id).await?;

    let existing = Favorites::find()
        .filter(FavoriteCol::UserId.eq(user_id))
        .filter(FavoriteCol::ProductId.eq(product_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Product already favorited".into()));
    }

    // A concurrent insert can still slip past the check; the unique index catches it.
    let favorite = FavoriteActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        product_id: Set(product_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| conflict_on_unique(err, "Product already favorited"))?;

    audit::record(
        &state.orm,
        Some(user_id),
        "favorite_add",
        "favorites",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to favorites",
        Favorite::from(favorite),
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user_id: Uuid,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Favorites::delete_many()
        .filter(FavoriteCol::UserId.eq(user_id))
        .filter(FavoriteCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Favorite"));
    }

    audit::record(
        &state.orm,
        Some(user_id),
        "favorite_remove",
        "favorites",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
