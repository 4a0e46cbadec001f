use async_graphql::{InputObject, Json, MaybeUndefined};
use serde_json::Value;

use crate::dto::products::ImageAttachmentInput;
use crate::entity::enums::{PaymentMethod, ShopStatus};

/// Partial update of the caller's user, account and shop. Absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub shop: Option<UpdateShopInput>,
}

/// Optional profile texts accept `null` to clear them.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateShopInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: MaybeUndefined<String>,
    pub country: MaybeUndefined<String>,
    pub city: MaybeUndefined<String>,
    pub category: MaybeUndefined<String>,
    pub instagram: MaybeUndefined<String>,
    pub facebook: MaybeUndefined<String>,
    pub tiktok: MaybeUndefined<String>,
    pub phone_number: MaybeUndefined<String>,
    pub has_whatsapp: Option<bool>,
    pub payment_methods: Option<Vec<PaymentMethod>>,
    pub payment_methods_metadata: Option<Json<Value>>,
    pub status: Option<ShopStatus>,
    pub logo: Option<ImageAttachmentInput>,
}
