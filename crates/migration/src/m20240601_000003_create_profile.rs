//! Create `profile` table.
//!
//! One row per identity (shared primary key), created by the
//! reconciliation flow at first successful login.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(uuid(Profile::Id).primary_key())
                    .col(string_len(Profile::Email, 255).not_null())
                    .col(string_len(Profile::Role, 16).not_null())
                    .col(ColumnDef::new(Profile::Name).string_len(128).null())
                    .col(ColumnDef::new(Profile::Surname).string_len(128).null())
                    .col(timestamp_with_time_zone(Profile::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_identity")
                            .from(Profile::Table, Profile::Id)
                            .to(Identity::Table, Identity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profile { Table, Id, Email, Role, Name, Surname, CreatedAt }

#[derive(DeriveIden)]
enum Identity { Table, Id }
