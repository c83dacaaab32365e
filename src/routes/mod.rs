use axum::Router;

use crate::state::AppState;

pub mod chats;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod params;
pub mod products;
pub mod requests;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/colleges", users::colleges_router())
        .nest("/users", users::router())
        .nest("/products", products::router())
        .nest("/requests", requests::router())
        .nest("/chats", chats::router())
        .nest("/favorites", favorites::router())
}
