use async_graphql::InputObject;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, InputObject)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub shop_name: String,
    pub shop_slug: String,
    pub phone_number: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub facebook: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Identity embedded in owner tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenSubject {
    pub id: Uuid,
    pub email: String,
}

/// Claims of an owner token. `scope` is always `"user"` for tokens we issue.
#[derive(Debug, Deserialize, Serialize)]
pub struct UserClaims {
    pub scope: String,
    pub user: TokenSubject,
    pub iat: usize,
    pub exp: usize,
}

/// Claims of a customer token; `sub` is the customer id.
#[derive(Debug, Deserialize, Serialize)]
pub struct CustomerClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}
