use sea_orm::Schema;
use sea_orm_migration::prelude::*;

use crate::entity::{
    AuditLogs, ChatParticipants, Chats, Colleges, Favorites, Messages, Products,
    PurchaseRequests, Users, favorites, messages,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Parents before children so foreign keys resolve on PostgreSQL.
        manager
            .create_table(schema.create_table_from_entity(Colleges).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Users).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Products).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(PurchaseRequests)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Chats).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(ChatParticipants)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Messages).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Favorites).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(AuditLogs).if_not_exists().to_owned())
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_user_product")
                    .table(Favorites)
                    .col(favorites::Column::UserId)
                    .col(favorites::Column::ProductId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_chat_created")
                    .table(Messages)
                    .col(messages::Column::ChatId)
                    .col(messages::Column::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Favorites).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChatParticipants).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Chats).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseRequests).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Colleges).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
