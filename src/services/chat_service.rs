use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::chats::{ChatList, CreateChatRequest, MessageList, PostMessageRequest},
    entity::{
        ChatParticipants, Chats, Messages,
        chat_participants::{ActiveModel as ParticipantActive, Column as ParticipantCol},
        chats::{ActiveModel as ChatActive, Column as ChatCol},
        messages::{ActiveModel as MessageActive, Column as MessageCol},
    },
    error::{AppError, AppResult},
    models::{Chat, Message, User},
    response::{ApiResponse, Meta},
    routes::params::ChatListQuery,
    services::relations::{
        chats_with_participants, find_chat, find_product, find_user, load_products, load_users,
        messages_with_senders,
    },
    state::AppState,
};

/// Open a chat outside the purchase-request path. Such chats start closed to messages.
pub async fn create_chat(
    state: &AppState,
    payload: CreateChatRequest,
) -> AppResult<ApiResponse<Chat>> {
    let mut seen = HashSet::new();
    let participant_ids: Vec<Uuid> = payload
        .participants
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    if participant_ids.len() < 2 {
        return Err(AppError::BadRequest(
            "a chat needs at least two distinct participants".into(),
        ));
    }

    let product = find_product(&state.orm, payload.product_id).await?;
    let users = load_users(&state.orm, participant_ids.iter().copied()).await?;
    if users.len() != participant_ids.len() {
        return Err(AppError::not_found("Participant"));
    }

    let now = Utc::now();
    let txn = state.orm.begin().await?;
    let chat = ChatActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product.id),
        purchase_request_id: Set(None),
        is_accepted: Set(false),
        college_id: Set(product.college_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    ChatParticipants::insert_many(participant_ids.iter().map(|user_id| ParticipantActive {
        chat_id: Set(chat.id),
        user_id: Set(*user_id),
    }))
    .exec_without_returning(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(chat_id = %chat.id, product_id = %product.id, "direct chat opened");

    audit::record(
        &state.orm,
        None,
        "chat_create",
        "chats",
        serde_json::json!({ "chat_id": chat.id, "product_id": product.id }),
    )
    .await;

    let chat = chats_with_participants(&state.orm, vec![chat])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Chat"))?;
    Ok(ApiResponse::success("Chat created", chat, Some(Meta::empty())))
}

pub async fn get_chat(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Chat>> {
    let model = find_chat(&state.orm, id).await?;
    let product_id = model.product_id;

    let mut chat = chats_with_participants(&state.orm, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Chat"))?;
    chat.product = load_products(&state.orm, [product_id])
        .await?
        .remove(&product_id);
    chat.messages = Some(ordered_messages(state, id).await?);

    Ok(ApiResponse::success("Chat", chat, None))
}

pub async fn list_chats(
    state: &AppState,
    query: ChatListQuery,
) -> AppResult<ApiResponse<ChatList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Chats::find().order_by_desc(ChatCol::CreatedAt);
    if let Some(user_id) = query.user_id {
        let chat_ids: Vec<Uuid> = ChatParticipants::find()
            .filter(ParticipantCol::UserId.eq(user_id))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|row| row.chat_id)
            .collect();
        if chat_ids.is_empty() {
            let meta = Meta::new(page, limit, 0);
            return Ok(ApiResponse::success(
                "Chats",
                ChatList { items: Vec::new() },
                Some(meta),
            ));
        }
        finder = finder.filter(ChatCol::Id.is_in(chat_ids));
    }

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = chats_with_participants(&state.orm, models).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Chats", ChatList { items }, Some(meta)))
}

/// Append a message. Only chats flagged `is_accepted` take messages.
pub async fn post_message(
    state: &AppState,
    chat_id: Uuid,
    payload: PostMessageRequest,
) -> AppResult<ApiResponse<Message>> {
    let PostMessageRequest { text, from_id } = payload;
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("text is required".into()));
    }

    let chat = find_chat(&state.orm, chat_id).await?;
    if !chat.is_accepted {
        return Err(AppError::Forbidden("chat not accepted".into()));
    }

    let sender = find_user(&state.orm, from_id).await?;

    // Participation is not enforced; surface outsiders in the logs.
    let is_participant = ChatParticipants::find_by_id((chat.id, sender.id))
        .one(&state.orm)
        .await?
        .is_some();
    if !is_participant {
        tracing::warn!(chat_id = %chat.id, from_id = %sender.id, "message from non-participant");
    }

    let message = MessageActive {
        id: Set(Uuid::now_v7()),
        chat_id: Set(chat.id),
        from_id: Set(sender.id),
        text: Set(text),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::debug!(chat_id = %chat.id, message_id = %message.id, "message posted");

    audit::record(
        &state.orm,
        Some(sender.id),
        "message_post",
        "messages",
        serde_json::json!({ "chat_id": chat.id, "message_id": message.id }),
    )
    .await;

    let mut message = Message::from(message);
    message.from = Some(User::from(sender));
    Ok(ApiResponse::success("Message sent", message, Some(Meta::empty())))
}

pub async fn list_messages(state: &AppState, chat_id: Uuid) -> AppResult<ApiResponse<MessageList>> {
    find_chat(&state.orm, chat_id).await?;
    let items = ordered_messages(state, chat_id).await?;
    Ok(ApiResponse::success(
        "Messages",
        MessageList { items },
        Some(Meta::empty()),
    ))
}

/// Oldest first; ids are time-ordered and break timestamp ties.
async fn ordered_messages(state: &AppState, chat_id: Uuid) -> AppResult<Vec<Message>> {
    let models = Messages::find()
        .filter(MessageCol::ChatId.eq(chat_id))
        .order_by_asc(MessageCol::CreatedAt)
        .order_by_asc(MessageCol::Id)
        .all(&state.orm)
        .await?;
    messages_with_senders(&state.orm, models).await
}
