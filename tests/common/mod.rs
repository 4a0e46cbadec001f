#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database};
use storefront_api::{
    config::AppConfig,
    db::run_migrations,
    dto::{auth::RegisterInput, delivery_methods::DeliveryMethodInput, products::ProductInput},
    error::AppResult,
    middleware::auth::{AuthUser, resolve_user},
    models::{AuthPayload, DeliveryMethod, Product},
    services::{auth_service, delivery_method_service, product_service},
    state::AppState,
};
use uuid::Uuid;

pub const PASSWORD: &str = "correct horse";

/// Fresh in-memory database with every migration applied.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // one connection keeps the in-memory database alive and shared
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        token_ttl_days: 1,
    };
    Ok(AppState::new(orm, &config))
}

pub fn registration(email: &str, slug: &str) -> RegisterInput {
    RegisterInput {
        name: "Owner".into(),
        email: email.into(),
        password: PASSWORD.into(),
        shop_name: format!("Shop {slug}"),
        shop_slug: slug.into(),
        phone_number: None,
        instagram: None,
        tiktok: None,
        facebook: None,
    }
}

pub async fn register(state: &AppState, email: &str, slug: &str) -> anyhow::Result<AuthPayload> {
    Ok(auth_service::register_user(state, registration(email, slug)).await?)
}

/// Register an owner and resolve them the way an incoming request would.
pub async fn owner(state: &AppState, email: &str, slug: &str) -> anyhow::Result<AuthUser> {
    let payload = register(state, email, slug).await?;
    let header = format!("Bearer {}", payload.token);
    resolve_user(state, Some(&header))
        .await?
        .ok_or_else(|| anyhow::anyhow!("token did not resolve to an owner"))
}

/// Upsert a batch whose every item is expected to go through.
pub async fn upsert_products(
    state: &AppState,
    shop_id: Uuid,
    records: Vec<ProductInput>,
) -> anyhow::Result<Vec<Product>> {
    let items = product_service::upsert_products(state, shop_id, records).await?;
    Ok(items.into_iter().collect::<AppResult<Vec<_>>>()?)
}

pub async fn upsert_delivery_methods(
    state: &AppState,
    shop_id: Uuid,
    records: Vec<DeliveryMethodInput>,
) -> anyhow::Result<Vec<DeliveryMethod>> {
    let items = delivery_method_service::upsert_delivery_methods(state, shop_id, records).await?;
    Ok(items.into_iter().collect::<AppResult<Vec<_>>>()?)
}
