//! Create `rating` table. Append-only client reviews of providers.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(uuid(Rating::Id).primary_key())
                    .col(uuid(Rating::ProviderId).not_null())
                    .col(uuid(Rating::ClientId).not_null())
                    .col(integer(Rating::Rating).not_null())
                    .col(text(Rating::Review).not_null())
                    .col(timestamp_with_time_zone(Rating::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_provider")
                            .from(Rating::Table, Rating::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_client")
                            .from(Rating::Table, Rating::ClientId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rating::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Rating { Table, Id, ProviderId, ClientId, Rating, Review, CreatedAt }

#[derive(DeriveIden)]
enum Provider { Table, Id }

#[derive(DeriveIden)]
enum Profile { Table, Id }
