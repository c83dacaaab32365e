use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    chats, colleges, favorites, messages, products, purchase_requests, users,
};

pub use crate::entity::products::{ProductCondition, ProductStatus};
pub use crate::entity::purchase_requests::RequestStatus;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct College {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub year: String,
    pub department: String,
    pub college_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<College>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub images: Vec<String>,
    pub condition: ProductCondition,
    pub category: String,
    pub tags: Vec<String>,
    pub status: ProductStatus,
    pub seller_id: Uuid,
    pub college_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub status: RequestStatus,
    pub college_id: Uuid,
    /// Chat opened alongside the request, if any.
    pub chat_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Chat {
    pub id: Uuid,
    pub product_id: Uuid,
    pub purchase_request_id: Option<Uuid>,
    pub is_accepted: bool,
    pub college_id: Uuid,
    pub participants: Vec<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub from_id: Uuid,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    pub created_at: DateTime<Utc>,
}

/// Encode a string list for a `TEXT` column as a JSON array.
pub fn encode_string_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a `TEXT` column written by [`encode_string_list`].
///
/// Empty text decodes to an empty list. Rows written before lists were JSON-encoded
/// hold plain comma-separated text; those are split and trimmed.
pub fn decode_string_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Option<Vec<String>>>(raw) {
        Ok(items) => items.unwrap_or_default(),
        Err(_) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

impl From<colleges::Model> for College {
    fn from(model: colleges::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            domain: model.domain,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            avatar: model.avatar,
            year: model.year,
            department: model.department,
            college_id: model.college_id,
            college: None,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            price: model.price,
            description: model.description,
            images: decode_string_list(&model.images),
            condition: model.condition,
            category: model.category,
            tags: decode_string_list(&model.tags),
            status: model.status,
            seller_id: model.seller_id,
            college_id: model.college_id,
            seller: None,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<purchase_requests::Model> for PurchaseRequest {
    fn from(model: purchase_requests::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            buyer_id: model.buyer_id,
            seller_id: model.seller_id,
            status: model.status,
            college_id: model.college_id,
            chat_id: None,
            product: None,
            buyer: None,
            seller: None,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<chats::Model> for Chat {
    fn from(model: chats::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            purchase_request_id: model.purchase_request_id,
            is_accepted: model.is_accepted,
            college_id: model.college_id,
            participants: Vec::new(),
            product: None,
            messages: None,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<messages::Model> for Message {
    fn from(model: messages::Model) -> Self {
        Self {
            id: model.id,
            chat_id: model.chat_id,
            from_id: model.from_id,
            text: model.text,
            from: None,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<favorites::Model> for Favorite {
    fn from(model: favorites::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            product: None,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
