use axum::http::{HeaderMap, header};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    dto::auth::{CustomerClaims, TokenSubject, UserClaims},
    entity::{Customers, Shops, Users, customers, shops, users},
    error::{AppError, AppResult},
    state::{AppState, AuthSettings},
};

/// Header carrying a customer token.
pub const CUSTOMER_HEADER: &str = "x-customer";
pub const USER_SCOPE: &str = "user";

/// Shop owner behind an `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: users::Model,
    pub shop: Option<shops::Model>,
}

impl AuthUser {
    /// The owner's shop; an owner without one cannot act on catalog data.
    pub fn shop_id(&self) -> AppResult<Uuid> {
        self.shop
            .as_ref()
            .map(|shop| shop.id)
            .ok_or(AppError::Unauthorized)
    }
}

#[derive(Debug, Clone)]
pub struct AuthCustomer {
    pub customer: customers::Model,
    pub shop: Option<shops::Model>,
}

/// Principals resolved once per request and shared by every resolver in it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<AuthUser>,
    pub customer: Option<AuthCustomer>,
}

impl RequestContext {
    pub async fn from_headers(state: &AppState, headers: &HeaderMap) -> AppResult<Self> {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let customer = headers
            .get(CUSTOMER_HEADER)
            .and_then(|value| value.to_str().ok());

        Ok(Self {
            user: resolve_user(state, authorization).await?,
            customer: resolve_customer(state, customer).await?,
        })
    }

    pub fn require_user(&self) -> AppResult<&AuthUser> {
        self.user.as_ref().ok_or(AppError::Unauthorized)
    }
}

fn bearer_token(value: Option<&str>) -> Option<&str> {
    let token = value?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn customer_token(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

fn decode_claims<T: DeserializeOwned>(token: &str, secret: &str) -> AppResult<T> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        tracing::warn!(error = %err, "rejected bearer token");
        AppError::InvalidCredentials
    })
}

pub async fn resolve_user(
    state: &AppState,
    authorization: Option<&str>,
) -> AppResult<Option<AuthUser>> {
    let Some(token) = bearer_token(authorization) else {
        return Ok(None);
    };
    let claims: UserClaims = decode_claims(token, &state.auth.jwt_secret)?;
    if claims.scope != USER_SCOPE {
        return Ok(None);
    }

    let Some(user) = Users::find_by_id(claims.user.id).one(&state.orm).await? else {
        return Ok(None);
    };
    let shop = Shops::find()
        .filter(shops::Column::UserId.eq(user.id))
        .one(&state.orm)
        .await?;

    Ok(Some(AuthUser { user, shop }))
}

pub async fn resolve_customer(
    state: &AppState,
    value: Option<&str>,
) -> AppResult<Option<AuthCustomer>> {
    let Some(token) = customer_token(value) else {
        return Ok(None);
    };
    let claims: CustomerClaims = decode_claims(token, &state.auth.jwt_secret)?;
    let Ok(customer_id) = Uuid::parse_str(&claims.sub) else {
        return Ok(None);
    };

    let Some(customer) = Customers::find_by_id(customer_id).one(&state.orm).await? else {
        return Ok(None);
    };
    let shop = Shops::find_by_id(customer.shop_id).one(&state.orm).await?;

    Ok(Some(AuthCustomer { customer, shop }))
}

fn token_window(settings: &AuthSettings) -> AppResult<(usize, usize)> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(settings.token_ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;
    Ok((now.timestamp() as usize, expiration.timestamp() as usize))
}

fn encode_claims<T: Serialize>(claims: &T, settings: &AuthSettings) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Signed owner token, returned without the `Bearer ` prefix.
pub fn issue_user_token(settings: &AuthSettings, user: &users::Model) -> AppResult<String> {
    let (iat, exp) = token_window(settings)?;
    let claims = UserClaims {
        scope: USER_SCOPE.to_string(),
        user: TokenSubject {
            id: user.id,
            email: user.email.clone(),
        },
        iat,
        exp,
    };
    encode_claims(&claims, settings)
}

pub fn issue_customer_token(
    settings: &AuthSettings,
    customer: &customers::Model,
) -> AppResult<String> {
    let (iat, exp) = token_window(settings)?;
    let claims = CustomerClaims {
        sub: customer.id.to_string(),
        iat,
        exp,
    };
    encode_claims(&claims, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret".into(),
            token_ttl: Duration::days(1),
        }
    }

    fn owner() -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Default::default(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(Some("Bearer   ")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn customer_header_accepts_raw_or_bearer_tokens() {
        assert_eq!(customer_token(Some("abc")), Some("abc"));
        assert_eq!(customer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(customer_token(Some("  ")), None);
    }

    #[test]
    fn issued_owner_token_carries_scope_and_subject() {
        let settings = settings();
        let user = owner();
        let token = issue_user_token(&settings, &user).expect("token");
        assert!(!token.starts_with("Bearer "));

        let claims: UserClaims = decode_claims(&token, &settings.jwt_secret).expect("claims");
        assert_eq!(claims.scope, USER_SCOPE);
        assert_eq!(claims.user.id, user.id);
        assert_eq!(claims.user.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let token = issue_user_token(&settings(), &owner()).expect("token");
        let err = decode_claims::<UserClaims>(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
