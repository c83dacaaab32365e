#![allow(dead_code)]

use campus_marketplace::{
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::Claims, products::CreateProductRequest, requests::CreatePurchaseRequest,
        users::CreateUserRequest,
    },
    entity::colleges::{self, ActiveModel as CollegeActive},
    middleware::auth::AuthUser,
    models::{Product, PurchaseRequest, User},
    services::{product_service, purchase_request_service, user_service},
    state::AppState,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

/// Fresh state over a private in-memory SQLite store with the full schema applied.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:", 1).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, JWT_SECRET))
}

pub async fn create_college(state: &AppState, domain: &str) -> anyhow::Result<colleges::Model> {
    let college = CollegeActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("College of {domain}")),
        domain: Set(domain.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(college)
}

pub async fn create_user(state: &AppState, name: &str, email: &str) -> anyhow::Result<User> {
    let resp = user_service::create_user(
        state,
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            avatar: String::new(),
            year: "Junior".to_string(),
            department: "Physics".to_string(),
            college_id: None,
        },
    )
    .await?;
    Ok(resp.data.expect("user data"))
}

pub fn product_request(title: &str, price: f64) -> CreateProductRequest {
    CreateProductRequest {
        title: title.to_string(),
        price,
        description: format!("{title} in working order"),
        images: vec!["https://img.example/1.jpg".to_string()],
        condition: "Good".to_string(),
        category: "Books".to_string(),
        tags: vec!["textbook".to_string(), "math".to_string()],
    }
}

pub async fn create_product(
    state: &AppState,
    seller_id: Uuid,
    title: &str,
    price: f64,
) -> anyhow::Result<Product> {
    let resp = product_service::create_product(
        state,
        &AuthUser { user_id: seller_id },
        product_request(title, price),
    )
    .await?;
    Ok(resp.data.expect("product data"))
}

pub async fn open_request(
    state: &AppState,
    product_id: Uuid,
    buyer_id: Uuid,
    seller_id: Uuid,
) -> anyhow::Result<PurchaseRequest> {
    let resp = purchase_request_service::create_purchase_request(
        state,
        CreatePurchaseRequest {
            product_id,
            buyer_id,
            seller_id,
        },
    )
    .await?;
    Ok(resp.data.expect("request data"))
}

/// College, seller `S`, buyer `B` and one available product priced 45.00.
pub struct Marketplace {
    pub state: AppState,
    pub college: colleges::Model,
    pub seller: User,
    pub buyer: User,
    pub product: Product,
}

pub async fn marketplace() -> anyhow::Result<Marketplace> {
    let state = setup_state().await?;
    let college = create_college(&state, "campus.edu").await?;
    let seller = create_user(&state, "Sam Seller", "sam@campus.edu").await?;
    let buyer = create_user(&state, "Bea Buyer", "bea@campus.edu").await?;
    let product = create_product(&state, seller.id, "Linear Algebra Textbook", 45.00).await?;
    Ok(Marketplace {
        state,
        college,
        seller,
        buyer,
        product,
    })
}

pub fn bearer_for(user_id: Uuid) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )?;
    Ok(format!("Bearer {token}"))
}
