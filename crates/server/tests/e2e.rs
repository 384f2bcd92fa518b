use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use common::mailer::Mailer;
use server::auth::{ServerAuthConfig, ServerState};
use server::routes;
use service::blob::BlobStore;

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
    db: DatabaseConnection,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    let storage = configs::StorageConfig {
        uploads_dir: format!("target/test-data/{}/uploads", Uuid::new_v4()),
        public_prefix: "/uploads".into(),
    };
    tokio::fs::create_dir_all(&storage.uploads_dir).await?;
    let state = ServerState {
        db: db.clone(),
        auth: ServerAuthConfig {
            jwt_secret: "test-secret".into(),
            public_base_url: "http://localhost:8080".into(),
        },
        blob: BlobStore::new(&storage),
        mailer: Mailer::new(configs::EmailConfig::default()),
    };

    let app: Router = routes::build_router(cors(), state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, db })
}

/// Signup, confirm through the emailed token and login, returning the
/// bearer token and the redirect target.
async fn register_account(
    app: &TestApp,
    client: &reqwest::Client,
    email: &str,
    role: &str,
) -> anyhow::Result<(String, String)> {
    let res = client
        .post(format!("{}/auth/signup", app.base_url))
        .json(&json!({"email": email, "password": "S3curePass!", "role": role}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let ident = models::identity::Entity::find()
        .filter(models::identity::Column::Email.eq(email))
        .one(&app.db)
        .await?
        .expect("identity created");
    let res = client
        .get(format!("{}/auth/confirm/{}", app.base_url, ident.confirmation_token))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = client
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": email, "password": "S3curePass!", "role": role}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let token = body["token"].as_str().unwrap().to_string();
    let redirect = body["redirect"].as_str().unwrap().to_string();
    Ok((token, redirect))
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn provider_journey_edit_search_rate_contact() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = start_server().await?;
    let client = reqwest::Client::new();

    // Provider registers; login seeds the listing and returns its route.
    let prov_email = format!("e2e_prov_{}@example.com", Uuid::new_v4());
    let (prov_token, redirect) = register_account(&app, &client, &prov_email, "provider").await?;
    let listing_id = redirect.strip_prefix("/provider/").unwrap().to_string();

    // A distinctive location so search assertions cannot collide with
    // leftovers from other runs.
    let location = format!("Testville-{}", Uuid::new_v4());
    let res = client
        .put(format!("{}/providers/{}", app.base_url, listing_id))
        .bearer_auth(&prov_token)
        .json(&json!({
            "business_name": "E2E Plumbing",
            "location": location,
            "service_type": "Plumbing",
            "business_email": prov_email,
            "phone_number": "+31100000",
            "description": "Pipes and boilers",
            "keywords": "leaks, boilers"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // Replace offerings; the blank row must be filtered out.
    let res = client
        .put(format!("{}/providers/{}/offerings", app.base_url, listing_id))
        .bearer_auth(&prov_token)
        .json(&json!([
            {"service_type": "Leak repair", "price": "79.50", "description": null},
            {"service_type": "  ", "price": "10", "description": null},
            {"service_type": "Boiler check", "price": "120", "description": "Annual"}
        ]))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let offerings = res.json::<serde_json::Value>().await?;
    assert_eq!(offerings.as_array().unwrap().len(), 2);

    // Public search finds the listing by term and location.
    let res = client
        .get(format!("{}/providers", app.base_url))
        .query(&[("service", "plumb"), ("location", location.as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let found = res.json::<serde_json::Value>().await?;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"].as_str().unwrap(), listing_id);

    // Writes on someone else's listing are forbidden.
    let other_email = format!("e2e_other_{}@example.com", Uuid::new_v4());
    let (other_token, _) = register_account(&app, &client, &other_email, "client").await?;
    let res = client
        .put(format!("{}/providers/{}", app.base_url, listing_id))
        .bearer_auth(&other_token)
        .json(&json!({
            "business_name": "Hijacked",
            "location": "x",
            "service_type": "x",
            "business_email": "x@example.com",
            "phone_number": ""
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);

    // The client rates the provider; bad submissions bounce first.
    let res = client
        .post(format!("{}/providers/{}/ratings", app.base_url, listing_id))
        .bearer_auth(&other_token)
        .json(&json!({"rating": 0, "review": "bad stars"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/providers/{}/ratings", app.base_url, listing_id))
        .bearer_auth(&other_token)
        .json(&json!({"rating": 5, "review": "Fixed the leak in an hour"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = client
        .get(format!("{}/providers/{}/ratings", app.base_url, listing_id))
        .send()
        .await?;
    let ratings = res.json::<serde_json::Value>().await?;
    assert_eq!(ratings.as_array().unwrap().len(), 1);
    assert_eq!(ratings[0]["reviewer_email"].as_str().unwrap(), other_email);

    // Contact relay is disabled in tests and reports success.
    let res = client
        .post(format!("{}/contact", app.base_url))
        .bearer_auth(&other_token)
        .json(&json!({
            "provider_id": listing_id,
            "from_name": "Interested client",
            "message": "Are you available on Monday?"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // Profile screen: the provider sees their listing summary.
    let res = client
        .get(format!("{}/profile", app.base_url))
        .bearer_auth(&prov_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let profile = res.json::<serde_json::Value>().await?;
    assert_eq!(profile["role"], "provider");
    assert_eq!(profile["provider"]["id"].as_str().unwrap(), listing_id);

    Ok(())
}

#[tokio::test]
async fn logo_upload_stores_file_and_updates_listing() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let email = format!("e2e_logo_{}@example.com", Uuid::new_v4());
    let (token, redirect) = register_account(&app, &client, &email, "provider").await?;
    let listing_id = redirect.strip_prefix("/provider/").unwrap().to_string();

    let part = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("logo.png")
        .mime_str("image/png")?;
    let form = reqwest::multipart::Form::new().part("file", part);
    let res = client
        .post(format!("{}/providers/{}/logo", app.base_url, listing_id))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let listing = res.json::<serde_json::Value>().await?;
    let image_url = listing["profile_image"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/logos/"));

    // The stored file is served back through the static route.
    let res = client.get(format!("{}{}", app.base_url, image_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.bytes().await?.as_ref(), [0x89, b'P', b'N', b'G']);
    Ok(())
}
