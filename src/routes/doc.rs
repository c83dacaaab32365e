use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        chats::{ChatList, CreateChatRequest, MessageList, PostMessageRequest},
        favorites::{AddFavoriteRequest, FavoriteList},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        requests::{CreatePurchaseRequest, PurchaseRequestList, UpdatePurchaseRequestStatus},
        users::{CollegeList, CreateUserRequest, UpdateUserRequest},
    },
    models::{
        Chat, College, Favorite, Message, Product, ProductCondition, ProductStatus,
        PurchaseRequest, RequestStatus, User,
    },
    response::{ApiResponse, Meta},
    routes::{chats, favorites, health, products, requests, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_colleges,
        users::create_user,
        users::get_user,
        users::update_user,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        requests::list_requests,
        requests::create_request,
        requests::get_request,
        requests::update_request_status,
        chats::list_chats,
        chats::create_chat,
        chats::get_chat,
        chats::list_messages,
        chats::post_message,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite
    ),
    components(
        schemas(
            College,
            User,
            Product,
            ProductCondition,
            ProductStatus,
            PurchaseRequest,
            RequestStatus,
            Chat,
            Message,
            Favorite,
            CollegeList,
            CreateUserRequest,
            UpdateUserRequest,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreatePurchaseRequest,
            UpdatePurchaseRequestStatus,
            PurchaseRequestList,
            CreateChatRequest,
            PostMessageRequest,
            ChatList,
            MessageList,
            AddFavoriteRequest,
            FavoriteList,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<PurchaseRequest>,
            ApiResponse<Chat>,
            ApiResponse<Message>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "User and college endpoints"),
        (name = "Products", description = "Listing endpoints"),
        (name = "Purchase Requests", description = "Purchase request lifecycle"),
        (name = "Chats", description = "Chat and message endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
