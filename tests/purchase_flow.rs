mod common;

use campus_marketplace::{
    dto::{chats::PostMessageRequest, requests::UpdatePurchaseRequestStatus},
    entity::{ChatParticipants, Chats, Products, PurchaseRequests, chat_participants, chats},
    error::AppError,
    models::{ProductStatus, RequestStatus},
    routes::params::RequestListQuery,
    services::{chat_service, purchase_request_service},
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::{create_user, marketplace, open_request};

#[tokio::test]
async fn request_chat_message_accept_scenario() -> anyhow::Result<()> {
    let m = marketplace().await?;
    assert_eq!(m.product.status, ProductStatus::Available);

    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.college_id, m.product.college_id);
    assert_eq!(request.buyer.as_ref().map(|u| u.id), Some(m.buyer.id));
    assert_eq!(request.seller.as_ref().map(|u| u.id), Some(m.seller.id));
    assert_eq!(request.product.as_ref().map(|p| p.id), Some(m.product.id));

    let chat_id = request.chat_id.expect("request opens a chat");
    let chat = chat_service::get_chat(&m.state, chat_id).await?.data.unwrap();
    assert!(chat.is_accepted);
    assert_eq!(chat.purchase_request_id, Some(request.id));
    assert_eq!(chat.college_id, m.product.college_id);
    let mut participant_ids: Vec<Uuid> = chat.participants.iter().map(|u| u.id).collect();
    participant_ids.sort();
    let mut expected = vec![m.buyer.id, m.seller.id];
    expected.sort();
    assert_eq!(participant_ids, expected);

    let message = chat_service::post_message(
        &m.state,
        chat_id,
        PostMessageRequest {
            text: "still available?".into(),
            from_id: m.buyer.id,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(message.text, "still available?");
    assert_eq!(message.from.as_ref().map(|u| u.id), Some(m.buyer.id));

    let accepted = purchase_request_service::update_purchase_request_status(
        &m.state,
        request.id,
        UpdatePurchaseRequestStatus {
            status: "accepted".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(accepted.status, RequestStatus::Accepted);
    assert_eq!(accepted.chat_id, Some(chat_id));

    let product = Products::find_by_id(m.product.id).one(&m.state.orm).await?.unwrap();
    assert_eq!(product.status, ProductStatus::Sold);
    let chat = Chats::find_by_id(chat_id).one(&m.state.orm).await?.unwrap();
    assert!(chat.is_accepted);

    Ok(())
}

#[tokio::test]
async fn decline_leaves_product_available() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;

    let declined = purchase_request_service::update_purchase_request_status(
        &m.state,
        request.id,
        UpdatePurchaseRequestStatus {
            status: "declined".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(declined.status, RequestStatus::Declined);

    let product = Products::find_by_id(m.product.id).one(&m.state.orm).await?.unwrap();
    assert_eq!(product.status, ProductStatus::Available);
    Ok(())
}

#[tokio::test]
async fn status_update_validates_target_and_request() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;

    for status in ["pending", "sold", ""] {
        let err = purchase_request_service::update_purchase_request_status(
            &m.state,
            request.id,
            UpdatePurchaseRequestStatus {
                status: status.into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{status}: {err:?}");
    }

    let err = purchase_request_service::update_purchase_request_status(
        &m.state,
        Uuid::new_v4(),
        UpdatePurchaseRequestStatus {
            status: "accepted".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn terminal_status_can_be_retargeted() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;

    for status in ["declined", "accepted"] {
        purchase_request_service::update_purchase_request_status(
            &m.state,
            request.id,
            UpdatePurchaseRequestStatus {
                status: status.into(),
            },
        )
        .await?;
    }

    let stored = PurchaseRequests::find_by_id(request.id).one(&m.state.orm).await?.unwrap();
    assert_eq!(stored.status, RequestStatus::Accepted);
    let product = Products::find_by_id(m.product.id).one(&m.state.orm).await?.unwrap();
    assert_eq!(product.status, ProductStatus::Sold);
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_parties_before_writing() -> anyhow::Result<()> {
    let m = marketplace().await?;

    let missing = [
        (Uuid::new_v4(), m.buyer.id, m.seller.id),
        (m.product.id, Uuid::new_v4(), m.seller.id),
        (m.product.id, m.buyer.id, Uuid::new_v4()),
    ];
    for (product_id, buyer_id, seller_id) in missing {
        let err = open_request(&m.state, product_id, buyer_id, seller_id)
            .await
            .unwrap_err();
        let err = err.downcast::<AppError>()?;
        assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
    }

    let err = open_request(&m.state, m.product.id, m.seller.id, m.seller.id)
        .await
        .unwrap_err()
        .downcast::<AppError>()?;
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(PurchaseRequests::find().count(&m.state.orm).await?, 0);
    assert_eq!(Chats::find().count(&m.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn failed_chat_insert_leaves_no_request_behind() -> anyhow::Result<()> {
    let m = marketplace().await?;
    m.state
        .orm
        .execute_unprepared("ALTER TABLE chat_participants RENAME TO chat_participants_offline")
        .await?;

    let err = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id)
        .await
        .unwrap_err()
        .downcast::<AppError>()?;
    assert!(matches!(err, AppError::OrmError(_)), "{err:?}");

    assert_eq!(PurchaseRequests::find().count(&m.state.orm).await?, 0);
    assert_eq!(Chats::find().count(&m.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn failed_accept_side_effect_rolls_back_status() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    m.state
        .orm
        .execute_unprepared("ALTER TABLE chats RENAME TO chats_offline")
        .await?;

    let err = purchase_request_service::update_purchase_request_status(
        &m.state,
        request.id,
        UpdatePurchaseRequestStatus {
            status: "accepted".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::OrmError(_)), "{err:?}");

    let stored = PurchaseRequests::find_by_id(request.id).one(&m.state.orm).await?.unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
    let product = Products::find_by_id(m.product.id).one(&m.state.orm).await?.unwrap();
    assert_eq!(product.status, ProductStatus::Available);
    Ok(())
}

#[tokio::test]
async fn duplicate_requests_between_same_parties_coexist() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let first = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    let second = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    assert_ne!(first.id, second.id);
    assert_ne!(first.chat_id, second.chat_id);

    let chats_for_product = Chats::find()
        .filter(chats::Column::ProductId.eq(m.product.id))
        .count(&m.state.orm)
        .await?;
    assert_eq!(chats_for_product, 2);

    let participants = ChatParticipants::find()
        .filter(chat_participants::Column::UserId.eq(m.buyer.id))
        .count(&m.state.orm)
        .await?;
    assert_eq!(participants, 2);
    Ok(())
}

#[tokio::test]
async fn list_requests_filters_by_party_and_status() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let other_buyer = create_user(&m.state, "Otto Other", "otto@campus.edu").await?;

    let mine = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    let theirs = open_request(&m.state, m.product.id, other_buyer.id, m.seller.id).await?;
    purchase_request_service::update_purchase_request_status(
        &m.state,
        theirs.id,
        UpdatePurchaseRequestStatus {
            status: "declined".into(),
        },
    )
    .await?;

    let by_buyer = purchase_request_service::list_purchase_requests(
        &m.state,
        RequestListQuery {
            buyer_id: Some(m.buyer.id),
            ..Default::default()
        },
    )
    .await?;
    let items = by_buyer.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, mine.id);

    let by_seller = purchase_request_service::list_purchase_requests(
        &m.state,
        RequestListQuery {
            seller_id: Some(m.seller.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_seller.meta.and_then(|meta| meta.total), Some(2));

    let declined = purchase_request_service::list_purchase_requests(
        &m.state,
        RequestListQuery {
            status: Some("declined".into()),
            ..Default::default()
        },
    )
    .await?;
    let items = declined.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, theirs.id);

    let fetched = purchase_request_service::get_purchase_request(&m.state, mine.id)
        .await?
        .data
        .unwrap();
    assert_eq!(fetched.chat_id, mine.chat_id);
    Ok(())
}

#[tokio::test]
async fn seller_is_taken_from_the_request() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let broker = create_user(&m.state, "Bo Broker", "bo@campus.edu").await?;

    let request = open_request(&m.state, m.product.id, m.buyer.id, broker.id).await?;
    assert_eq!(request.seller_id, broker.id);
    assert_ne!(request.seller_id, m.product.seller_id);

    let chat = chat_service::get_chat(&m.state, request.chat_id.unwrap())
        .await?
        .data
        .unwrap();
    assert!(chat.participants.iter().any(|u| u.id == broker.id));
    assert!(chat.participants.iter().all(|u| u.id != m.seller.id));
    Ok(())
}
