use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_shop_status,
    dto::auth::{LoginInput, RegisterInput},
    entity::{
        Accounts, Shops, Users, accounts,
        enums::{PaymentMethod, PaymentMethodSet, ShopStatus, UserRole},
        shops, users,
    },
    error::{AppError, AppResult},
    middleware::auth::issue_user_token,
    models::AuthPayload,
    repository::{includes::find_user, unique_violation},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn validate_registration(input: &RegisterInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    if !input.email.contains('@') {
        return Err(AppError::validation("email is invalid"));
    }
    if input.password.is_empty() {
        return Err(AppError::validation("password must not be empty"));
    }
    if input.shop_slug.trim().is_empty() {
        return Err(AppError::validation("shop slug must not be empty"));
    }
    Ok(())
}

fn registration_error(err: DbErr) -> AppError {
    match unique_violation(&err).as_deref() {
        Some("email") => AppError::DuplicateEmail,
        Some(field) => AppError::UniqueConstraintViolation(field.to_string()),
        None => AppError::RegistrationFailed(err.to_string()),
    }
}

/// Anything but a known constraint or validation error is a failed registration.
fn registration_failed(err: AppError) -> AppError {
    match err {
        AppError::OrmError(err) => registration_error(err),
        AppError::Internal(err) => AppError::RegistrationFailed(err.to_string()),
        other => other,
    }
}

/// Create the owner, their credential and their shop, log the shop's initial
/// status, and sign them in.
pub async fn register_user(state: &AppState, input: RegisterInput) -> AppResult<AuthPayload> {
    validate_registration(&input)?;
    let email = input.email.trim().to_lowercase();
    let slug = input.shop_slug.trim().to_string();

    let email_taken = Users::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await
        .map_err(registration_error)?
        .is_some();
    if email_taken {
        return Err(AppError::DuplicateEmail);
    }
    let slug_taken = Shops::find()
        .filter(shops::Column::Slug.eq(slug.as_str()))
        .one(&state.orm)
        .await
        .map_err(registration_error)?
        .is_some();
    if slug_taken {
        return Err(AppError::UniqueConstraintViolation("slug".into()));
    }

    let password_hash = hash_password(&input.password).map_err(registration_failed)?;

    let txn = state.orm.begin().await.map_err(registration_error)?;
    let user = write_registration(&txn, &input, email, slug, password_hash)
        .await
        .map_err(registration_error)?;
    txn.commit().await.map_err(registration_error)?;

    tracing::info!(user_id = %user.id, email = %user.email, "user registered");

    let token = issue_user_token(&state.auth, &user).map_err(registration_failed)?;
    let user = find_user(&state.orm, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(AuthPayload { token, user })
}

async fn write_registration(
    txn: &DatabaseTransaction,
    input: &RegisterInput,
    email: String,
    slug: String,
    password_hash: String,
) -> Result<users::Model, DbErr> {
    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        email: Set(email),
        role: Set(UserRole::User),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        password_hash: Set(password_hash),
        created_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    let shop = shops::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        slug: Set(slug),
        name: Set(input.shop_name.trim().to_string()),
        description: Set(None),
        country: Set(None),
        city: Set(None),
        category: Set(None),
        instagram: Set(input.instagram.clone()),
        facebook: Set(input.facebook.clone()),
        tiktok: Set(input.tiktok.clone()),
        phone_number: Set(input.phone_number.clone()),
        has_whatsapp: Set(false),
        status: Set(ShopStatus::default()),
        payment_methods: Set(PaymentMethodSet::default()),
        payment_methods_metadata: Set(PaymentMethod::empty_metadata()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    log_shop_status(txn, shop.id, shop.status).await?;
    Ok(user)
}

/// Both an unknown email and a wrong password fail with the same error.
pub async fn login_user(state: &AppState, input: LoginInput) -> AppResult<AuthPayload> {
    let email = input.email.trim().to_lowercase();
    let found = Users::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .find_also_related(Accounts)
        .one(&state.orm)
        .await?;

    let (user, account) = match found {
        Some((user, Some(account))) => (user, account),
        _ => {
            tracing::warn!("login rejected");
            return Err(AppError::InvalidCredentials);
        }
    };
    if !verify_password(&input.password, &account.password_hash)? {
        tracing::warn!(user_id = %user.id, "login rejected");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "user logged in");

    let token = issue_user_token(&state.auth, &user)?;
    let user = find_user(&state.orm, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(AuthPayload { token, user })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RegisterInput {
        RegisterInput {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "secret".into(),
            shop_name: "Ana's".into(),
            shop_slug: "anas".into(),
            phone_number: None,
            instagram: None,
            tiktok: None,
            facebook: None,
        }
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn non_constraint_failures_become_registration_failed() {
        let err = registration_failed(AppError::Internal(anyhow::anyhow!("salt exhausted")));
        assert!(matches!(err, AppError::RegistrationFailed(ref msg) if msg == "salt exhausted"));

        let err = registration_failed(AppError::from(DbErr::Custom("pool closed".into())));
        assert!(matches!(err, AppError::RegistrationFailed(_)));

        assert!(matches!(
            registration_failed(AppError::DuplicateEmail),
            AppError::DuplicateEmail
        ));
    }

    #[test]
    fn registration_requires_email_password_and_slug() {
        assert!(validate_registration(&input()).is_ok());
        for broken in [
            RegisterInput {
                email: "nope".into(),
                ..input()
            },
            RegisterInput {
                password: String::new(),
                ..input()
            },
            RegisterInput {
                shop_slug: " ".into(),
                ..input()
            },
        ] {
            assert!(matches!(
                validate_registration(&broken),
                Err(AppError::ValidationFailed(_))
            ));
        }
    }
}
