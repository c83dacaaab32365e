//! Lookups and eager loading shared by the services.
//!
//! Every helper is generic over [`ConnectionTrait`] so it can run on the pooled
//! connection or inside an open transaction.

use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        ChatParticipants, Chats, Colleges, Products, Users, chat_participants, chats, messages,
        products, purchase_requests, users,
    },
    error::{AppError, AppResult},
    models::{Chat, Message, Product, PurchaseRequest, User},
};

pub async fn find_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<users::Model> {
    Users::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

pub async fn find_product<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<products::Model> {
    Products::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))
}

pub async fn find_chat<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<chats::Model> {
    Chats::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Chat"))
}

/// User with its college attached.
pub async fn user_with_college<C: ConnectionTrait>(
    conn: &C,
    model: users::Model,
) -> AppResult<User> {
    let college = Colleges::find_by_id(model.college_id).one(conn).await?;
    let mut user = User::from(model);
    user.college = college.map(Into::into);
    Ok(user)
}

pub async fn load_users<C, I>(conn: &C, ids: I) -> AppResult<HashMap<Uuid, User>>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Uuid>,
{
    let ids: Vec<Uuid> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = Users::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| (model.id, User::from(model)))
        .collect();
    Ok(users)
}

pub async fn products_with_sellers<C: ConnectionTrait>(
    conn: &C,
    models: Vec<products::Model>,
) -> AppResult<Vec<Product>> {
    let sellers = load_users(conn, models.iter().map(|p| p.seller_id)).await?;
    Ok(models
        .into_iter()
        .map(|model| {
            let seller = sellers.get(&model.seller_id).cloned();
            let mut product = Product::from(model);
            product.seller = seller;
            product
        })
        .collect())
}

pub async fn load_products<C, I>(conn: &C, ids: I) -> AppResult<HashMap<Uuid, Product>>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Uuid>,
{
    let ids: Vec<Uuid> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let models = Products::find()
        .filter(products::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(products_with_sellers(conn, models)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect())
}

/// Chats with their participants, ordered by name.
pub async fn chats_with_participants<C: ConnectionTrait>(
    conn: &C,
    models: Vec<chats::Model>,
) -> AppResult<Vec<Chat>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let chat_ids: Vec<Uuid> = models.iter().map(|c| c.id).collect();
    let rows = ChatParticipants::find()
        .filter(chat_participants::Column::ChatId.is_in(chat_ids))
        .all(conn)
        .await?;
    let users = load_users(conn, rows.iter().map(|r| r.user_id)).await?;

    let mut by_chat: HashMap<Uuid, Vec<User>> = HashMap::new();
    for row in rows {
        if let Some(user) = users.get(&row.user_id) {
            by_chat.entry(row.chat_id).or_default().push(user.clone());
        }
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let mut participants = by_chat.remove(&model.id).unwrap_or_default();
            participants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            let mut chat = Chat::from(model);
            chat.participants = participants;
            chat
        })
        .collect())
}

pub async fn messages_with_senders<C: ConnectionTrait>(
    conn: &C,
    models: Vec<messages::Model>,
) -> AppResult<Vec<Message>> {
    let senders = load_users(conn, models.iter().map(|m| m.from_id)).await?;
    Ok(models
        .into_iter()
        .map(|model| {
            let from = senders.get(&model.from_id).cloned();
            let mut message = Message::from(model);
            message.from = from;
            message
        })
        .collect())
}

/// Requests with product (and its seller), buyer, seller and linked chat id.
pub async fn requests_with_relations<C: ConnectionTrait>(
    conn: &C,
    models: Vec<purchase_requests::Model>,
) -> AppResult<Vec<PurchaseRequest>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let products = load_products(conn, models.iter().map(|r| r.product_id)).await?;
    let users = load_users(
        conn,
        models.iter().flat_map(|r| [r.buyer_id, r.seller_id]),
    )
    .await?;

    let request_ids: Vec<Uuid> = models.iter().map(|r| r.id).collect();
    let chat_ids: HashMap<Uuid, Uuid> = Chats::find()
        .filter(chats::Column::PurchaseRequestId.is_in(request_ids))
        .all(conn)
        .await?
        .into_iter()
        .filter_map(|chat| chat.purchase_request_id.map(|request_id| (request_id, chat.id)))
        .collect();

    Ok(models
        .into_iter()
        .map(|model| {
            let mut request = PurchaseRequest::from(model);
            request.chat_id = chat_ids.get(&request.id).copied();
            request.product = products.get(&request.product_id).cloned();
            request.buyer = users.get(&request.buyer_id).cloned();
            request.seller = users.get(&request.seller_id).cloned();
            request
        })
        .collect())
}
