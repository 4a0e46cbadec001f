use chrono::Utc;
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_shop_status,
    dto::{
        products::ImageAttachmentInput,
        users::{UpdateShopInput, UpdateUserInput},
    },
    entity::{Accounts, Shops, accounts, image_attachments, shops, users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    repository::{
        includes::{find_logo, find_user},
        unique_violation,
    },
    services::{
        auth_service::hash_password,
        upsert::{ensure_not_blank, patch, patch_nullable},
    },
    state::AppState,
};

fn update_error(err: DbErr) -> AppError {
    match unique_violation(&err).as_deref() {
        Some("email") => AppError::DuplicateEmail,
        Some(field) => AppError::UniqueConstraintViolation(field.to_string()),
        None => AppError::OrmError(err),
    }
}

fn validate_update(input: &UpdateUserInput) -> AppResult<()> {
    ensure_not_blank("name", input.name.as_deref())?;
    ensure_not_blank("email", input.email.as_deref())?;
    if let Some(email) = &input.email {
        if !email.contains('@') {
            return Err(AppError::validation("email is invalid"));
        }
    }
    if matches!(input.password.as_deref(), Some("")) {
        return Err(AppError::validation("password must not be empty"));
    }
    if let Some(shop) = &input.shop {
        ensure_not_blank("name", shop.name.as_deref())?;
        ensure_not_blank("slug", shop.slug.as_deref())?;
    }
    Ok(())
}

/// Patch the caller's profile, credential and shop in one transaction. A status
/// that differs from the stored one is written separately and logged.
pub async fn update_user(
    state: &AppState,
    auth: &AuthUser,
    input: UpdateUserInput,
) -> AppResult<User> {
    validate_update(&input)?;
    let user_id = auth.user.id;
    let shop_id = match (&input.shop, &auth.shop) {
        (Some(_), Some(shop)) => Some(shop.id),
        (Some(_), None) => return Err(AppError::NotFound),
        (None, _) => None,
    };
    let password_hash = input.password.as_deref().map(hash_password).transpose()?;

    let txn = state.orm.begin().await?;
    apply_update(&txn, user_id, shop_id, input, password_hash)
        .await
        .map_err(update_error)?;
    txn.commit().await.map_err(update_error)?;

    tracing::info!(%user_id, "user updated");

    find_user(&state.orm, user_id)
        .await?
        .ok_or(AppError::NotFound)
}

async fn apply_update(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    shop_id: Option<Uuid>,
    input: UpdateUserInput,
    password_hash: Option<String>,
) -> Result<(), DbErr> {
    let now = Utc::now();
    users::ActiveModel {
        id: Unchanged(user_id),
        name: patch(input.name.map(|name| name.trim().to_string())),
        email: patch(input.email.map(|email| email.trim().to_lowercase())),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .update(txn)
    .await?;

    if let Some(password_hash) = password_hash {
        Accounts::update_many()
            .set(accounts::ActiveModel {
                password_hash: Set(password_hash),
                ..Default::default()
            })
            .filter(accounts::Column::UserId.eq(user_id))
            .exec(txn)
            .await?;
    }

    if let (Some(shop_id), Some(shop)) = (shop_id, input.shop) {
        update_shop(txn, shop_id, shop).await?;
    }
    Ok(())
}

async fn update_shop(
    txn: &DatabaseTransaction,
    shop_id: Uuid,
    input: UpdateShopInput,
) -> Result<(), DbErr> {
    let prior_status = Shops::find_by_id(shop_id)
        .one(txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("shop {shop_id}")))?
        .status;

    shops::ActiveModel {
        id: Unchanged(shop_id),
        name: patch(input.name.map(|name| name.trim().to_string())),
        slug: patch(input.slug.map(|slug| slug.trim().to_string())),
        description: patch_nullable(input.description),
        country: patch_nullable(input.country),
        city: patch_nullable(input.city),
        category: patch_nullable(input.category),
        instagram: patch_nullable(input.instagram),
        facebook: patch_nullable(input.facebook),
        tiktok: patch_nullable(input.tiktok),
        phone_number: patch_nullable(input.phone_number),
        has_whatsapp: patch(input.has_whatsapp),
        payment_methods: patch(
            input
                .payment_methods
                .map(|methods| methods.into_iter().collect()),
        ),
        payment_methods_metadata: patch(input.payment_methods_metadata.map(|json| json.0)),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .update(txn)
    .await?;

    if let Some(logo) = input.logo {
        upsert_logo(txn, shop_id, logo).await?;
    }

    if let Some(status) = input.status.filter(|status| *status != prior_status) {
        shops::ActiveModel {
            id: Unchanged(shop_id),
            status: Set(status),
            ..Default::default()
        }
        .update(txn)
        .await?;
        log_shop_status(txn, shop_id, status).await?;
    }
    Ok(())
}

async fn upsert_logo(
    txn: &DatabaseTransaction,
    shop_id: Uuid,
    logo: ImageAttachmentInput,
) -> Result<(), DbErr> {
    match find_logo(txn, shop_id).await? {
        Some(_) if logo.original.is_none() && logo.normal.is_none() && logo.thumbnail.is_none() => {}
        Some(existing) => {
            image_attachments::ActiveModel {
                id: Unchanged(existing.id),
                original: patch(logo.original),
                normal: patch(logo.normal),
                thumbnail: patch(logo.thumbnail),
                ..Default::default()
            }
            .update(txn)
            .await?;
        }
        None => {
            image_attachments::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(None),
                shop_id: Set(Some(shop_id)),
                original: Set(logo.original.unwrap_or_default()),
                normal: Set(logo.normal.unwrap_or_default()),
                thumbnail: Set(logo.thumbnail.unwrap_or_default()),
                created_at: Set(Utc::now().into()),
            }
            .insert(txn)
            .await?;
        }
    }
    Ok(())
}
