//! Purchase-request lifecycle.
//!
//! This module is the only writer of `purchase_requests.status`, `chats.is_accepted`
//! and `products.status`. A request is created together with its chat in one
//! transaction, and accepting a request marks the product sold and opens the chat in
//! the same transaction as the status write.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::requests::{CreatePurchaseRequest, PurchaseRequestList, UpdatePurchaseRequestStatus},
    entity::{
        ChatParticipants, Chats, Products, PurchaseRequests,
        chat_participants::ActiveModel as ParticipantActive,
        chats::{self, ActiveModel as ChatActive, Column as ChatCol},
        products::{self, ActiveModel as ProductActive, ProductStatus},
        purchase_requests::{
            self, ActiveModel as RequestActive, Column as RequestCol, RequestStatus,
        },
    },
    error::{AppError, AppResult},
    models::PurchaseRequest,
    response::{ApiResponse, Meta},
    routes::params::RequestListQuery,
    services::relations::{find_product, find_user, requests_with_relations},
    state::AppState,
};

pub async fn create_purchase_request(
    state: &AppState,
    payload: CreatePurchaseRequest,
) -> AppResult<ApiResponse<PurchaseRequest>> {
    let CreatePurchaseRequest {
        product_id,
        buyer_id,
        seller_id,
    } = payload;

    if buyer_id == seller_id {
        return Err(AppError::BadRequest(
            "buyer and seller must be different users".into(),
        ));
    }

    let product = find_product(&state.orm, product_id).await?;
    find_user(&state.orm, buyer_id).await?;
    find_user(&state.orm, seller_id).await?;

    let txn = state.orm.begin().await?;
    let opened = open_request_with_chat(&txn, &product, buyer_id, seller_id).await;
    let (request, chat) = match opened {
        Ok(created) => created,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            return Err(err);
        }
    };
    txn.commit().await?;

    tracing::info!(
        request_id = %request.id,
        chat_id = %chat.id,
        product_id = %product.id,
        "purchase request opened"
    );

    audit::record(
        &state.orm,
        Some(buyer_id),
        "purchase_request_create",
        "purchase_requests",
        serde_json::json!({
            "request_id": request.id,
            "chat_id": chat.id,
            "product_id": product.id,
        }),
    )
    .await;

    let request = request_detail(state, request).await?;
    Ok(ApiResponse::success(
        "Purchase request created",
        request,
        Some(Meta::empty()),
    ))
}

/// Insert the pending request, its accepted chat and the buyer/seller participants.
async fn open_request_with_chat(
    txn: &DatabaseTransaction,
    product: &products::Model,
    buyer_id: Uuid,
    seller_id: Uuid,
) -> AppResult<(purchase_requests::Model, chats::Model)> {
    let now = Utc::now();

    let request = RequestActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product.id),
        buyer_id: Set(buyer_id),
        seller_id: Set(seller_id),
        status: Set(RequestStatus::Pending),
        college_id: Set(product.college_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    let chat = ChatActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product.id),
        purchase_request_id: Set(Some(request.id)),
        is_accepted: Set(true),
        college_id: Set(product.college_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    ChatParticipants::insert_many([buyer_id, seller_id].map(|user_id| ParticipantActive {
        chat_id: Set(chat.id),
        user_id: Set(user_id),
    }))
    .exec_without_returning(txn)
    .await?;

    Ok((request, chat))
}

pub async fn update_purchase_request_status(
    state: &AppState,
    id: Uuid,
    payload: UpdatePurchaseRequestStatus,
) -> AppResult<ApiResponse<PurchaseRequest>> {
    let status = RequestStatus::parse(&payload.status)
        .filter(|status| status.is_terminal())
        .ok_or_else(|| {
            AppError::BadRequest("status must be one of: accepted, declined".into())
        })?;

    let txn = state.orm.begin().await?;
    let request = match apply_status(&txn, id, status).await {
        Ok(request) => request,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            return Err(err);
        }
    };
    txn.commit().await?;

    tracing::info!(request_id = %request.id, status = ?status, "purchase request updated");

    audit::record(
        &state.orm,
        Some(request.seller_id),
        "purchase_request_status",
        "purchase_requests",
        serde_json::json!({ "request_id": request.id, "status": status }),
    )
    .await;

    let request = request_detail(state, request).await?;
    Ok(ApiResponse::success(
        "Purchase request updated",
        request,
        Some(Meta::empty()),
    ))
}

/// Status write plus the accept side effects, all on one transaction.
async fn apply_status(
    txn: &DatabaseTransaction,
    id: Uuid,
    status: RequestStatus,
) -> AppResult<purchase_requests::Model> {
    let existing = PurchaseRequests::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Purchase request"))?;

    // Leaving a terminal status is allowed; make it visible.
    if existing.status.is_terminal() && existing.status != status {
        tracing::warn!(
            request_id = %id,
            from = ?existing.status,
            to = ?status,
            "purchase request leaving a terminal status"
        );
    }

    let now = Utc::now();
    let product_id = existing.product_id;

    let mut active: RequestActive = existing.into();
    active.status = Set(status);
    active.updated_at = Set(now.into());
    let request = active.update(txn).await?;

    if status == RequestStatus::Accepted {
        let product = Products::find_by_id(product_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))?;
        let mut product: ProductActive = product.into();
        product.status = Set(ProductStatus::Sold);
        product.updated_at = Set(now.into());
        product.update(txn).await?;

        Chats::update_many()
            .col_expr(ChatCol::IsAccepted, Expr::value(true))
            .col_expr(ChatCol::UpdatedAt, Expr::value(now.fixed_offset()))
            .filter(ChatCol::PurchaseRequestId.eq(request.id))
            .exec(txn)
            .await?;
    }

    Ok(request)
}

pub async fn list_purchase_requests(
    state: &AppState,
    query: RequestListQuery,
) -> AppResult<ApiResponse<PurchaseRequestList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = RequestStatus::parse(status).ok_or_else(|| {
            AppError::BadRequest("status must be one of: pending, accepted, declined".into())
        })?;
        condition = condition.add(RequestCol::Status.eq(status));
    }
    if let Some(buyer_id) = query.buyer_id {
        condition = condition.add(RequestCol::BuyerId.eq(buyer_id));
    }
    if let Some(seller_id) = query.seller_id {
        condition = condition.add(RequestCol::SellerId.eq(seller_id));
    }

    let finder = PurchaseRequests::find()
        .filter(condition)
        .order_by_desc(RequestCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = requests_with_relations(&state.orm, models).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Purchase requests",
        PurchaseRequestList { items },
        Some(meta),
    ))
}

pub async fn get_purchase_request(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<PurchaseRequest>> {
    let request = PurchaseRequests::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Purchase request"))?;
    let request = request_detail(state, request).await?;
    Ok(ApiResponse::success("Purchase request", request, None))
}

async fn request_detail(
    state: &AppState,
    model: purchase_requests::Model,
) -> AppResult<PurchaseRequest> {
    requests_with_relations(&state.orm, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Purchase request"))
}
