use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    dto::{
        auth::{LoginInput, RegisterInput},
        delivery_methods::DeliveryMethodInput,
        products::ProductInput,
        users::UpdateUserInput,
    },
    error::AppResult,
    models::{AuthPayload, DeliveryMethod, Product, User},
    services::{auth_service, delivery_method_service, product_service, user_service},
};

use super::{app_state, batch_items, require_caller};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn register_user(&self, ctx: &Context<'_>, data: RegisterInput) -> Result<AuthPayload> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        auth_service::register_user(state, data)
            .await
            .map_err(|e| e.extend())
    }

    async fn login_user(&self, ctx: &Context<'_>, data: LoginInput) -> Result<AuthPayload> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        auth_service::login_user(state, data)
            .await
            .map_err(|e| e.extend())
    }

    async fn update_user(&self, ctx: &Context<'_>, data: UpdateUserInput) -> Result<User> {
        let result: AppResult<User> = async {
            let state = app_state(ctx)?;
            let caller = require_caller(ctx)?;
            user_service::update_user(state, caller, data).await
        }
        .await;
        result.map_err(|e| e.extend())
    }

    /// Records without `id` are created; the rest patch the caller's products.
    /// An update that fails leaves a null at its position.
    async fn upsert_products(
        &self,
        ctx: &Context<'_>,
        data: Vec<ProductInput>,
    ) -> Result<Vec<Option<Result<Product>>>> {
        let result: AppResult<Vec<AppResult<Product>>> = async {
            let state = app_state(ctx)?;
            let shop_id = require_caller(ctx)?.shop_id()?;
            product_service::upsert_products(state, shop_id, data).await
        }
        .await;
        result.map(batch_items).map_err(|e| e.extend())
    }

    async fn upsert_delivery_methods(
        &self,
        ctx: &Context<'_>,
        data: Vec<DeliveryMethodInput>,
    ) -> Result<Vec<Option<Result<DeliveryMethod>>>> {
        let result: AppResult<Vec<AppResult<DeliveryMethod>>> = async {
            let state = app_state(ctx)?;
            let shop_id = require_caller(ctx)?.shop_id()?;
            delivery_method_service::upsert_delivery_methods(state, shop_id, data).await
        }
        .await;
        result.map(batch_items).map_err(|e| e.extend())
    }
}
