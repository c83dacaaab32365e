use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Chat, Message};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChatRequest {
    pub product_id: Uuid,
    pub participants: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostMessageRequest {
    pub text: String,
    pub from_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ChatList {
    #[schema(value_type = Vec<Chat>)]
    pub items: Vec<Chat>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MessageList {
    #[schema(value_type = Vec<Message>)]
    pub items: Vec<Message>,
}
