mod common;

use campus_marketplace::{
    dto::favorites::AddFavoriteRequest, error::AppError, services::favorite_service,
};
use uuid::Uuid;

use common::{create_product, marketplace};

#[tokio::test]
async fn favorite_pairs_are_unique() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let add = || AddFavoriteRequest { user_id: m.buyer.id };

    let favorite = favorite_service::add_favorite(&m.state, m.product.id, add())
        .await?
        .data
        .unwrap();
    assert_eq!(favorite.user_id, m.buyer.id);

    let err = favorite_service::add_favorite(&m.state, m.product.id, add())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    favorite_service::remove_favorite(&m.state, m.buyer.id, m.product.id).await?;
    favorite_service::add_favorite(&m.state, m.product.id, add()).await?;

    let err = favorite_service::remove_favorite(&m.state, m.seller.id, m.product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn list_favorites_carries_product_and_seller() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let lamp = create_product(&m.state, m.seller.id, "Desk Lamp", 12.5).await?;
    for product_id in [m.product.id, lamp.id] {
        favorite_service::add_favorite(
            &m.state,
            product_id,
            AddFavoriteRequest { user_id: m.buyer.id },
        )
        .await?;
    }

    let items = favorite_service::list_favorites(&m.state, &m.buyer.id.to_string())
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(items.len(), 2);
    for favorite in &items {
        let product = favorite.product.as_ref().expect("product loaded");
        assert_eq!(product.seller.as_ref().map(|s| s.id), Some(m.seller.id));
    }

    let others = favorite_service::list_favorites(&m.state, &m.seller.id.to_string())
        .await?
        .data
        .unwrap();
    assert!(others.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn legacy_user_id_lists_nothing() -> anyhow::Result<()> {
    let m = marketplace().await?;
    favorite_service::add_favorite(
        &m.state,
        m.product.id,
        AddFavoriteRequest { user_id: m.buyer.id },
    )
    .await?;

    let resp = favorite_service::list_favorites(&m.state, "user-42").await?;
    assert!(resp.data.unwrap().items.is_empty());
    Ok(())
}

#[tokio::test]
async fn add_favorite_requires_existing_rows() -> anyhow::Result<()> {
    let m = marketplace().await?;

    let err = favorite_service::add_favorite(
        &m.state,
        Uuid::new_v4(),
        AddFavoriteRequest { user_id: m.buyer.id },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = favorite_service::add_favorite(
        &m.state,
        m.product.id,
        AddFavoriteRequest {
            user_id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}
