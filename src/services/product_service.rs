use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, ProductCondition, ProductStatus},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::{Product, encode_string_list},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::relations::{find_product, find_user, products_with_sellers},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(Column::Title))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(Column::Description))).like(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = ProductStatus::parse(status).ok_or_else(|| {
            AppError::BadRequest("status must be one of: available, requested, sold".into())
        })?;
        condition = condition.add(Column::Status.eq(status));
    }

    if let Some(college_id) = query.college_id {
        condition = condition.add(Column::CollegeId.eq(college_id));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Title => Column::Title,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = products_with_sellers(&state.orm, models).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = detail(state, find_product(&state.orm, id).await?).await?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let title = required_text(&payload.title, "title")?;
    let category = required_text(&payload.category, "category")?;
    validate_price(payload.price)?;
    let condition = parse_condition(&payload.condition)?;

    let seller = find_user(&state.orm, user.user_id).await?;

    let now = Utc::now();
    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        price: Set(payload.price),
        description: Set(payload.description),
        images: Set(encode_string_list(&payload.images)),
        condition: Set(condition),
        category: Set(category),
        tags: Set(encode_string_list(&payload.tags)),
        status: Set(ProductStatus::Available),
        seller_id: Set(seller.id),
        college_id: Set(seller.college_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        detail(state, product).await?,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = find_product(&state.orm, id).await?;
    ensure_owner(user, existing.seller_id, "update your own products")?;

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(required_text(&title, "title")?);
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(images) = payload.images {
        active.images = Set(encode_string_list(&images));
    }
    if let Some(condition) = payload.condition {
        active.condition = Set(parse_condition(&condition)?);
    }
    if let Some(category) = payload.category {
        active.category = Set(required_text(&category, "category")?);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(encode_string_list(&tags));
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        detail(state, product).await?,
        Some(Meta::empty()),
    ))
}

/// Delete a listing; its requests, chats, messages and favorites cascade.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_product(&state.orm, id).await?;
    ensure_owner(user, existing.seller_id, "delete your own products")?;

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product"));
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn detail(
    state: &AppState,
    model: crate::entity::products::Model,
) -> AppResult<Product> {
    products_with_sellers(&state.orm, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Product"))
}

fn required_text(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }
    Ok(())
}

fn parse_condition(value: &str) -> AppResult<ProductCondition> {
    ProductCondition::parse(value).ok_or_else(|| {
        AppError::BadRequest(
            "condition must be one of: New, Like New, Good, Fair, For Parts".into(),
        )
    })
}
