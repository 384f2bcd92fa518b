use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct SignupRequestDoc {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(ToSchema)]
pub struct LoginRequestDoc {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(ToSchema)]
pub struct ProviderUpdateDoc {
    pub business_name: String,
    pub location: String,
    pub service_type: String,
    pub business_email: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

#[derive(ToSchema)]
pub struct RatingRequestDoc {
    pub rating: i32,
    pub review: String,
}

#[derive(ToSchema)]
pub struct ContactRequestDoc {
    pub provider_id: Uuid,
    pub from_name: String,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::signup,
        crate::routes::auth::confirm,
        crate::routes::auth::login,
        crate::routes::providers::search,
        crate::routes::providers::get_provider,
        crate::routes::providers::update,
        crate::routes::providers::list_offerings,
        crate::routes::providers::replace_offerings,
        crate::routes::providers::upload_logo,
        crate::routes::ratings::list,
        crate::routes::ratings::create,
        crate::routes::profile::show,
        crate::routes::contact::send,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequestDoc,
            LoginRequestDoc,
            ProviderUpdateDoc,
            RatingRequestDoc,
            ContactRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "providers"),
        (name = "ratings"),
        (name = "profile"),
        (name = "contact")
    )
)]
pub struct ApiDoc;
