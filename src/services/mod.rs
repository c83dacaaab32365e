pub mod chat_service;
pub mod favorite_service;
pub mod product_service;
pub mod purchase_request_service;
pub mod relations;
pub mod user_service;
