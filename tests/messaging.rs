mod common;

use campus_marketplace::{
    dto::{
        chats::{CreateChatRequest, PostMessageRequest},
        requests::UpdatePurchaseRequestStatus,
    },
    entity::{
        Chats, Messages, chats::ActiveModel as ChatActive, messages::ActiveModel as MessageActive,
    },
    error::AppError,
    routes::params::ChatListQuery,
    services::{chat_service, purchase_request_service},
};
use chrono::{SubsecRound, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use common::{create_user, marketplace, open_request};

fn say(from_id: Uuid, text: &str) -> PostMessageRequest {
    PostMessageRequest {
        text: text.to_string(),
        from_id,
    }
}

#[tokio::test]
async fn direct_chat_is_closed_to_messages() -> anyhow::Result<()> {
    let m = marketplace().await?;

    let chat = chat_service::create_chat(
        &m.state,
        CreateChatRequest {
            product_id: m.product.id,
            participants: vec![m.buyer.id, m.seller.id, m.buyer.id],
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!chat.is_accepted);
    assert_eq!(chat.purchase_request_id, None);
    assert_eq!(chat.participants.len(), 2);

    for _ in 0..2 {
        let err = chat_service::post_message(&m.state, chat.id, say(m.buyer.id, "hello?"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref msg) if msg == "chat not accepted"));
    }

    let messages = chat_service::list_messages(&m.state, chat.id).await?.data.unwrap();
    assert!(messages.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn accepting_the_linked_request_opens_the_chat() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    let chat_id = request.chat_id.unwrap();

    let mut closed: ChatActive = Chats::find_by_id(chat_id)
        .one(&m.state.orm)
        .await?
        .unwrap()
        .into();
    closed.is_accepted = Set(false);
    closed.update(&m.state.orm).await?;

    let err = chat_service::post_message(&m.state, chat_id, say(m.buyer.id, "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    purchase_request_service::update_purchase_request_status(
        &m.state,
        request.id,
        UpdatePurchaseRequestStatus {
            status: "accepted".into(),
        },
    )
    .await?;

    let message = chat_service::post_message(&m.state, chat_id, say(m.buyer.id, "hi"))
        .await?
        .data
        .unwrap();
    assert_eq!(message.chat_id, chat_id);
    Ok(())
}

#[tokio::test]
async fn messages_come_back_oldest_first() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    let chat_id = request.chat_id.unwrap();

    let texts: Vec<String> = (0..12).map(|i| format!("message {i}")).collect();
    for (i, text) in texts.iter().enumerate() {
        let from = if i % 2 == 0 { m.buyer.id } else { m.seller.id };
        chat_service::post_message(&m.state, chat_id, say(from, text)).await?;
    }

    let listed = chat_service::list_messages(&m.state, chat_id).await?.data.unwrap().items;
    assert_eq!(listed.len(), texts.len());
    assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    let listed_texts: Vec<&str> = listed.iter().map(|msg| msg.text.as_str()).collect();
    assert_eq!(listed_texts, texts.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(listed.iter().all(|msg| msg.from.is_some()));

    let chat = chat_service::get_chat(&m.state, chat_id).await?.data.unwrap();
    let embedded = chat.messages.unwrap();
    assert_eq!(embedded.len(), texts.len());
    assert_eq!(embedded[0].text, "message 0");
    assert_eq!(chat.product.map(|p| p.id), Some(m.product.id));
    Ok(())
}

#[tokio::test]
async fn ids_break_timestamp_ties() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    let chat_id = request.chat_id.unwrap();

    let sent_at = Utc::now().trunc_subsecs(3);
    let ids: Vec<Uuid> = (0..5).map(|_| Uuid::now_v7()).collect();
    // Stored out of order so the row order cannot stand in for the id order.
    for (i, id) in ids.iter().enumerate().rev() {
        Messages::insert(MessageActive {
            id: Set(*id),
            chat_id: Set(chat_id),
            from_id: Set(m.buyer.id),
            text: Set(format!("burst {i}")),
            created_at: Set(sent_at.into()),
        })
        .exec_without_returning(&m.state.orm)
        .await?;
    }

    let listed = chat_service::list_messages(&m.state, chat_id).await?.data.unwrap().items;
    assert!(listed.iter().all(|msg| msg.created_at == sent_at));
    assert_eq!(listed.iter().map(|msg| msg.id).collect::<Vec<_>>(), ids);
    let texts: Vec<&str> = listed.iter().map(|msg| msg.text.as_str()).collect();
    assert_eq!(texts, ["burst 0", "burst 1", "burst 2", "burst 3", "burst 4"]);
    Ok(())
}

#[tokio::test]
async fn post_message_validation() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;
    let chat_id = request.chat_id.unwrap();

    let err = chat_service::post_message(&m.state, chat_id, say(m.buyer.id, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = chat_service::post_message(&m.state, Uuid::new_v4(), say(m.buyer.id, "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = chat_service::post_message(&m.state, chat_id, say(Uuid::new_v4(), "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = chat_service::list_messages(&m.state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Outsiders are logged, not rejected.
    let outsider = create_user(&m.state, "Ola Outsider", "ola@campus.edu").await?;
    chat_service::post_message(&m.state, chat_id, say(outsider.id, "me too")).await?;
    Ok(())
}

#[tokio::test]
async fn create_chat_needs_two_existing_participants() -> anyhow::Result<()> {
    let m = marketplace().await?;

    let err = chat_service::create_chat(
        &m.state,
        CreateChatRequest {
            product_id: m.product.id,
            participants: vec![m.buyer.id, m.buyer.id],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = chat_service::create_chat(
        &m.state,
        CreateChatRequest {
            product_id: m.product.id,
            participants: vec![m.buyer.id, Uuid::new_v4()],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = chat_service::create_chat(
        &m.state,
        CreateChatRequest {
            product_id: Uuid::new_v4(),
            participants: vec![m.buyer.id, m.seller.id],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn list_chats_by_participant() -> anyhow::Result<()> {
    let m = marketplace().await?;
    let outsider = create_user(&m.state, "Ola Outsider", "ola@campus.edu").await?;
    let request = open_request(&m.state, m.product.id, m.buyer.id, m.seller.id).await?;

    let mine = chat_service::list_chats(
        &m.state,
        ChatListQuery {
            user_id: Some(m.buyer.id),
            ..Default::default()
        },
    )
    .await?;
    let items = mine.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(Some(items[0].id), request.chat_id);

    let none = chat_service::list_chats(
        &m.state,
        ChatListQuery {
            user_id: Some(outsider.id),
            ..Default::default()
        },
    )
    .await?;
    assert!(none.data.unwrap().items.is_empty());
    assert_eq!(none.meta.and_then(|meta| meta.total), Some(0));
    Ok(())
}
