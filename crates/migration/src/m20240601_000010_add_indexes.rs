//! Secondary indexes, applied after all tables exist.
//!
//! `uidx_provider_user_id` is load-bearing: it turns the at-most-one
//! listing per identity rule into a schema guarantee, and makes the
//! reconciliation flow's duplicate-create race surface as a unique
//! violation instead of a second row.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("uidx_provider_user_id")
                    .table(Provider::Table)
                    .col(Provider::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_provider_location")
                    .table(Provider::Table)
                    .col(Provider::Location)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_offering_provider_id")
                    .table(Offering::Table)
                    .col(Offering::ProviderId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_provider_created")
                    .table(Rating::Table)
                    .col(Rating::ProviderId)
                    .col(Rating::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_rating_provider_created").table(Rating::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_offering_provider_id").table(Offering::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_provider_location").table(Provider::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uidx_provider_user_id").table(Provider::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Provider { Table, UserId, Location }

#[derive(DeriveIden)]
enum Offering { Table, ProviderId }

#[derive(DeriveIden)]
enum Rating { Table, ProviderId, CreatedAt }
