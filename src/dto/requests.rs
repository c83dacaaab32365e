use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::PurchaseRequest;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePurchaseRequest {
    pub product_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePurchaseRequestStatus {
    /// `accepted` or `declined`.
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PurchaseRequestList {
    #[schema(value_type = Vec<PurchaseRequest>)]
    pub items: Vec<PurchaseRequest>,
}
