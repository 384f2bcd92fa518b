//! Create `identity` table.
//!
//! Authenticated accounts; email-confirmation state lives here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Identity::Table)
                    .if_not_exists()
                    .col(uuid(Identity::Id).primary_key())
                    .col(string_len(Identity::Email, 255).unique_key().not_null())
                    .col(uuid(Identity::ConfirmationToken).not_null())
                    .col(
                        ColumnDef::new(Identity::ConfirmedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Identity::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Identity::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Identity { Table, Id, Email, ConfirmationToken, ConfirmedAt, CreatedAt }
