//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_identity;
mod m20240601_000002_create_credentials;
mod m20240601_000003_create_profile;
mod m20240601_000004_create_provider;
mod m20240601_000005_create_offering;
mod m20240601_000006_create_rating;
mod m20240601_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_identity::Migration),
            Box::new(m20240601_000002_create_credentials::Migration),
            Box::new(m20240601_000003_create_profile::Migration),
            Box::new(m20240601_000004_create_provider::Migration),
            Box::new(m20240601_000005_create_offering::Migration),
            Box::new(m20240601_000006_create_rating::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000010_add_indexes::Migration),
        ]
    }
}
