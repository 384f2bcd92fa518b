//! Create `provider` table.
//!
//! Business listings. `id` is generated and distinct from the owning
//! identity id; `user_id` carries the FK and gets a unique index (see
//! the indexes migration) so an identity can own at most one listing.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Provider::Table)
                    .if_not_exists()
                    .col(uuid(Provider::Id).primary_key())
                    .col(uuid(Provider::UserId).not_null())
                    .col(string_len(Provider::BusinessName, 255).not_null())
                    .col(string_len(Provider::Location, 255).not_null())
                    .col(string_len(Provider::ServiceType, 255).not_null())
                    .col(string_len(Provider::ProfileImage, 512).not_null())
                    .col(string_len(Provider::BusinessEmail, 255).not_null())
                    .col(string_len(Provider::PhoneNumber, 64).not_null())
                    .col(ColumnDef::new(Provider::Description).text().null())
                    .col(ColumnDef::new(Provider::Keywords).text().null())
                    .col(timestamp_with_time_zone(Provider::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Provider::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_profile")
                            .from(Provider::Table, Provider::UserId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Provider::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Provider {
    Table,
    Id,
    UserId,
    BusinessName,
    Location,
    ServiceType,
    ProfileImage,
    BusinessEmail,
    PhoneNumber,
    Description,
    Keywords,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Profile { Table, Id }
