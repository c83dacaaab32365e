use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::chats::{ChatList, CreateChatRequest, MessageList, PostMessageRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    models::{Chat, Message},
    response::ApiResponse,
    routes::params::ChatListQuery,
    services::chat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_chats).post(create_chat))
        .route("/{id}", get(get_chat))
        .route("/{id}/messages", get(list_messages).post(post_message))
}

#[utoipa::path(
    get,
    path = "/api/chats",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("user_id" = Option<Uuid>, Query, description = "Only chats this user participates in")
    ),
    responses(
        (status = 200, description = "List chats", body = ApiResponse<ChatList>)
    ),
    tag = "Chats"
)]
pub async fn list_chats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ChatListQuery>,
) -> AppResult<Json<ApiResponse<ChatList>>> {
    let resp = chat_service::list_chats(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chats",
    request_body = CreateChatRequest,
    responses(
        (status = 201, description = "Chat created, closed to messages until accepted", body = ApiResponse<Chat>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Product or participant not found")
    ),
    tag = "Chats"
)]
pub async fn create_chat(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateChatRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Chat>>)> {
    let resp = chat_service::create_chat(&state, payload).await?;
    Ok(resp.created())
}

#[utoipa::path(
    get,
    path = "/api/chats/{id}",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    responses(
        (status = 200, description = "Chat with participants and messages", body = ApiResponse<Chat>),
        (status = 404, description = "Chat not found")
    ),
    tag = "Chats"
)]
pub async fn get_chat(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Chat>>> {
    let resp = chat_service::get_chat(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/chats/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    responses(
        (status = 200, description = "Messages, oldest first", body = ApiResponse<MessageList>),
        (status = 404, description = "Chat not found")
    ),
    tag = "Chats"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let resp = chat_service::list_messages(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chats/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    request_body = PostMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<Message>),
        (status = 400, description = "Empty text"),
        (status = 403, description = "chat not accepted"),
        (status = 404, description = "Chat or sender not found")
    ),
    tag = "Chats"
)]
pub async fn post_message(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<PostMessageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Message>>)> {
    let resp = chat_service::post_message(&state, id, payload).await?;
    Ok(resp.created())
}
