//! Provider listing self-service and search.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use tracing::instrument;
use uuid::Uuid;

use models::{offering, provider};

use crate::errors::ServiceError;

/// Get a listing by its generated id.
pub async fn get_provider(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<provider::Model>, ServiceError> {
    let found = provider::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Get the listing owned by an identity, if any.
pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<provider::Model>, ServiceError> {
    let found = provider::Entity::find()
        .filter(provider::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Business fields a provider may edit on their own listing.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProviderUpdate {
    pub business_name: String,
    pub location: String,
    pub service_type: String,
    pub business_email: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

/// Update the business fields of a listing. Ownership is the caller's
/// responsibility; this function only touches the row.
#[instrument(skip(db, update))]
pub async fn update_provider(
    db: &DatabaseConnection,
    id: Uuid,
    update: ProviderUpdate,
) -> Result<provider::Model, ServiceError> {
    if update.business_name.trim().is_empty() {
        return Err(ServiceError::Validation("business name must not be empty".into()));
    }
    let mut am: provider::ActiveModel = provider::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("provider"))?
        .into();
    am.business_name = Set(update.business_name);
    am.location = Set(update.location);
    am.service_type = Set(update.service_type);
    am.business_email = Set(update.business_email);
    am.phone_number = Set(update.phone_number);
    am.description = Set(update.description);
    am.keywords = Set(update.keywords);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Store the public URL of an uploaded logo on the listing.
pub async fn set_profile_image(
    db: &DatabaseConnection,
    id: Uuid,
    url: &str,
) -> Result<provider::Model, ServiceError> {
    let mut am: provider::ActiveModel = provider::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("provider"))?
        .into();
    am.profile_image = Set(url.to_string());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// One offering row as submitted from the edit form. Prices arrive as
/// strings and are validated here.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OfferingDraft {
    pub service_type: String,
    pub price: String,
    pub description: Option<String>,
}

/// Keep only drafts with a non-blank type and a parseable, non-negative
/// price. Invalid rows are dropped silently; half-filled form rows are
/// expected and not an error.
pub fn valid_drafts(drafts: Vec<OfferingDraft>) -> Vec<(String, Decimal, Option<String>)> {
    drafts
        .into_iter()
        .filter_map(|d| {
            if d.service_type.trim().is_empty() {
                return None;
            }
            let price: Decimal = d.price.trim().parse().ok()?;
            if price.is_sign_negative() {
                return None;
            }
            Some((d.service_type, price, d.description))
        })
        .collect()
}

/// Replace a listing's offerings with the submitted set.
///
/// Delete-all-then-insert; a reader between the two statements sees an
/// empty set, which the discovery screen tolerates.
#[instrument(skip(db, drafts), fields(count = drafts.len()))]
pub async fn replace_offerings(
    db: &DatabaseConnection,
    provider_id: Uuid,
    drafts: Vec<OfferingDraft>,
) -> Result<Vec<offering::Model>, ServiceError> {
    offering::Entity::delete_many()
        .filter(offering::Column::ProviderId.eq(provider_id))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut inserted = Vec::new();
    for (service_type, price, description) in valid_drafts(drafts) {
        let row = offering::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider_id: Set(provider_id),
            service_type: Set(service_type),
            price: Set(price),
            description: Set(description),
        };
        let created = row.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        inserted.push(created);
    }
    Ok(inserted)
}

pub async fn list_offerings(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<offering::Model>, ServiceError> {
    let rows = offering::Entity::find()
        .filter(offering::Column::ProviderId.eq(provider_id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Case-insensitive substring search over listings.
///
/// The service term matches `service_type` or `keywords`; the location
/// term matches `location`. With both terms blank nothing is searched and
/// the result is empty.
#[instrument(skip(db))]
pub async fn search(
    db: &DatabaseConnection,
    service_term: &str,
    location_term: &str,
) -> Result<Vec<provider::Model>, ServiceError> {
    let service_term = service_term.trim();
    let location_term = location_term.trim();
    if service_term.is_empty() && location_term.is_empty() {
        return Ok(Vec::new());
    }

    let mut cond = Condition::all();
    if !service_term.is_empty() {
        let pattern = format!("%{service_term}%");
        cond = cond.add(
            Condition::any()
                .add(Expr::col(provider::Column::ServiceType).ilike(pattern.clone()))
                .add(Expr::col(provider::Column::Keywords).ilike(pattern)),
        );
    }
    if !location_term.is_empty() {
        cond = cond.add(Expr::col(provider::Column::Location).ilike(format!("%{location_term}%")));
    }

    let rows = provider::Entity::find()
        .filter(cond)
        .order_by_asc(provider::Column::BusinessName)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn draft(service_type: &str, price: &str) -> OfferingDraft {
        OfferingDraft {
            service_type: service_type.into(),
            price: price.into(),
            description: None,
        }
    }

    #[test]
    fn blank_and_unpriced_drafts_are_filtered() {
        let kept = valid_drafts(vec![
            draft("Plumbing", "49.99"),
            draft("  ", "10"),
            draft("Wiring", ""),
            draft("Painting", "abc"),
            draft("Tiling", "-5"),
            draft("Cleaning", " 25 "),
        ]);
        let names: Vec<_> = kept.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(names, vec!["Plumbing", "Cleaning"]);
        assert_eq!(kept[1].1, Decimal::new(25, 0));
    }

    #[tokio::test]
    async fn listing_crud_and_search() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let user_id = crate::test_support::seed_account(&db).await?;
        let listing = crate::test_support::seed_listing(&db, user_id).await?;

        let updated = update_provider(
            &db,
            listing.id,
            ProviderUpdate {
                business_name: "Ada's Plumbing".into(),
                location: "Rotterdam".into(),
                service_type: "Plumbing".into(),
                business_email: "ada@example.com".into(),
                phone_number: "+3110000000".into(),
                description: Some("24/7 emergency service".into()),
                keywords: Some("pipes, leaks, boilers".into()),
            },
        )
        .await?;
        assert_eq!(updated.business_name, "Ada's Plumbing");

        let offerings = replace_offerings(
            &db,
            listing.id,
            vec![draft("Leak repair", "79.50"), draft("", "10"), draft("Boiler check", "120")],
        )
        .await?;
        assert_eq!(offerings.len(), 2);
        assert_eq!(list_offerings(&db, listing.id).await?.len(), 2);

        // Search matches by type, keywords and location, ignoring case.
        let by_type = search(&db, "plumb", "").await?;
        assert!(by_type.iter().any(|p| p.id == listing.id));
        let by_keyword = search(&db, "BOILER", "rotter").await?;
        assert!(by_keyword.iter().any(|p| p.id == listing.id));
        let wrong_location = search(&db, "plumb", "utrecht").await?;
        assert!(!wrong_location.iter().any(|p| p.id == listing.id));
        assert!(search(&db, "", "").await?.is_empty());

        crate::test_support::cleanup_account(&db, user_id).await?;
        Ok(())
    }
}
