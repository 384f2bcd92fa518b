//! Create `offering` table (services a provider sells).
//!
//! Rows are replaced wholesale on each provider save, so cascade delete
//! with the provider.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offering::Table)
                    .if_not_exists()
                    .col(uuid(Offering::Id).primary_key())
                    .col(uuid(Offering::ProviderId).not_null())
                    .col(string_len(Offering::ServiceType, 255).not_null())
                    .col(decimal_len(Offering::Price, 12, 2).not_null())
                    .col(ColumnDef::new(Offering::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offering_provider")
                            .from(Offering::Table, Offering::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Offering::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Offering { Table, Id, ProviderId, ServiceType, Price, Description }

#[derive(DeriveIden)]
enum Provider { Table, Id }
