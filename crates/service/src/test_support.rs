#![cfg(test)]
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::sync::OnceCell;
use uuid::Uuid;

use models::db::{config_from_env, config_from_file, connect_with_config};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let mut cfg = config_from_file().unwrap_or_else(|_| config_from_env());
            cfg.max_connections = cfg.max_connections.max(10);
            cfg.min_connections = cfg.min_connections.min(1);
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let mut cfg = config_from_file().unwrap_or_else(|_| config_from_env());
    cfg.max_connections = cfg.max_connections.max(20);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout_secs = 10;
    let db = connect_with_config(&cfg).await?;
    Ok(db)
}

/// Identity plus a client profile, ready to own listings or ratings.
pub async fn seed_account(db: &DatabaseConnection) -> Result<Uuid, anyhow::Error> {
    let email = format!("t_{}@example.com", Uuid::new_v4());
    let identity = models::identity::create(db, &email).await?;
    let profile = models::profile::ActiveModel {
        id: Set(identity.id),
        email: Set(email),
        role: Set(models::profile::ROLE_CLIENT.to_string()),
        name: Set(None),
        surname: Set(None),
        created_at: Set(Utc::now().into()),
    };
    profile.insert(db).await?;
    Ok(identity.id)
}

pub async fn seed_listing(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<models::provider::Model, anyhow::Error> {
    let now = Utc::now();
    let row = models::provider::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        business_name: Set(" ".into()),
        location: Set(" ".into()),
        service_type: Set(" ".into()),
        profile_image: Set(" ".into()),
        business_email: Set(format!("biz_{user_id}@example.com")),
        phone_number: Set(String::new()),
        description: Set(None),
        keywords: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    Ok(row.insert(db).await?)
}

/// Remove everything hanging off a seeded account, child rows first.
pub async fn cleanup_account(db: &DatabaseConnection, user_id: Uuid) -> Result<(), anyhow::Error> {
    models::rating::Entity::delete_many()
        .filter(models::rating::Column::ClientId.eq(user_id))
        .exec(db)
        .await?;
    if let Some(listing) = models::provider::Entity::find()
        .filter(models::provider::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        models::rating::Entity::delete_many()
            .filter(models::rating::Column::ProviderId.eq(listing.id))
            .exec(db)
            .await?;
        models::offering::Entity::delete_many()
            .filter(models::offering::Column::ProviderId.eq(listing.id))
            .exec(db)
            .await?;
        models::provider::Entity::delete_by_id(listing.id).exec(db).await?;
    }
    models::profile::Entity::delete_by_id(user_id).exec(db).await?;
    models::credentials::Entity::delete_by_id(user_id).exec(db).await?;
    models::identity::Entity::delete_by_id(user_id).exec(db).await?;
    Ok(())
}
