use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: String,
    /// JSON array of image URLs.
    #[sea_orm(column_type = "Text")]
    pub images: String,
    pub condition: ProductCondition,
    pub category: String,
    /// JSON array of tags.
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    pub status: ProductStatus,
    pub seller_id: Uuid,
    pub college_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ProductCondition {
    #[sea_orm(string_value = "New")]
    #[serde(rename = "New")]
    New,
    #[sea_orm(string_value = "Like New")]
    #[serde(rename = "Like New")]
    LikeNew,
    #[sea_orm(string_value = "Good")]
    #[serde(rename = "Good")]
    Good,
    #[sea_orm(string_value = "Fair")]
    #[serde(rename = "Fair")]
    Fair,
    #[sea_orm(string_value = "For Parts")]
    #[serde(rename = "For Parts")]
    ForParts,
}

impl ProductCondition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "New" => Some(Self::New),
            "Like New" => Some(Self::LikeNew),
            "Good" => Some(Self::Good),
            "Fair" => Some(Self::Fair),
            "For Parts" => Some(Self::ForParts),
            _ => None,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "requested")]
    Requested,
    #[sea_orm(string_value = "sold")]
    Sold,
}

impl ProductStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "available" => Some(Self::Available),
            "requested" => Some(Self::Requested),
            "sold" => Some(Self::Sold),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SellerId",
        to = "super::users::Column::Id"
    )]
    Seller,
    #[sea_orm(
        belongs_to = "super::colleges::Entity",
        from = "Column::CollegeId",
        to = "super::colleges::Column::Id"
    )]
    Colleges,
    #[sea_orm(has_many = "super::purchase_requests::Entity")]
    PurchaseRequests,
    #[sea_orm(has_many = "super::chats::Entity")]
    Chats,
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::colleges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Colleges.def()
    }
}

impl Related<super::purchase_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRequests.def()
    }
}

impl Related<super::chats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chats.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
