pub mod auth_service;
pub mod category_service;
pub mod delivery_method_service;
pub mod product_service;
pub mod upsert;
pub mod user_service;

use uuid::Uuid;

use crate::{error::AppResult, middleware::auth::AuthUser, repository::filters::ShopScope};

/// Scope of a list query: the explicit shop when one is named, else the caller's
/// own shop, else `None`.
pub fn shop_scope(
    shop_id: Option<Uuid>,
    shop_slug: Option<String>,
    user: Option<&AuthUser>,
) -> AppResult<Option<ShopScope>> {
    let scope = ShopScope::new(shop_id, shop_slug);
    if !scope.is_empty() {
        return Ok(Some(scope));
    }
    match user {
        Some(user) => Ok(Some(ShopScope::shop(user.shop_id()?))),
        None => Ok(None),
    }
}
