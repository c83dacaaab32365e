pub mod auth;
pub mod chats;
pub mod favorites;
pub mod products;
pub mod requests;
pub mod users;
