use async_graphql::{Context, ErrorExtensions, Object, Result};
use uuid::Uuid;

use crate::{
    models::{Category, DeliveryMethod, Product},
    response::Page,
    routes::params::{CategoryQuery, DeliveryMethodQuery, Pagination, ProductQuery, SortOrder},
    services::{category_service, delivery_method_service, product_service},
};

use super::{app_state, caller};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Products of one shop: `shopId`/`shopSlug`, or the caller's own shop.
    #[allow(clippy::too_many_arguments)]
    async fn get_products(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] skip: i64,
        #[graphql(default = 10)] take: i64,
        shop_id: Option<Uuid>,
        shop_slug: Option<String>,
        visible: Option<bool>,
        deleted: Option<bool>,
        category_id: Option<i32>,
        category_slug: Option<String>,
        #[graphql(default)] order: SortOrder,
    ) -> Result<Page<Product>> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        let query = ProductQuery {
            pagination: Pagination::new(skip, take),
            shop_id,
            shop_slug,
            visible,
            deleted,
            category_id,
            category_slug,
            order,
        };
        product_service::list_products(state, caller(ctx), query)
            .await
            .map_err(|e| e.extend())
    }

    async fn get_product(&self, ctx: &Context<'_>, id: Uuid) -> Result<Product> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        product_service::get_product(state, id)
            .await
            .map_err(|e| e.extend())
    }

    /// Categories that hold at least one product of the shop.
    async fn get_categories(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] skip: i64,
        #[graphql(default = 10)] take: i64,
        shop_id: Option<Uuid>,
        shop_slug: Option<String>,
        #[graphql(default)] order: SortOrder,
    ) -> Result<Page<Category>> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        let query = CategoryQuery {
            pagination: Pagination::new(skip, take),
            shop_id,
            shop_slug,
            order,
        };
        category_service::list_categories(state, caller(ctx), query)
            .await
            .map_err(|e| e.extend())
    }

    async fn get_category(&self, ctx: &Context<'_>, slug: String) -> Result<Category> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        category_service::get_category(state, &slug)
            .await
            .map_err(|e| e.extend())
    }

    #[allow(clippy::too_many_arguments)]
    async fn get_delivery_methods(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] skip: i64,
        #[graphql(default = 10)] take: i64,
        shop_id: Option<Uuid>,
        shop_slug: Option<String>,
        active: Option<bool>,
        deleted: Option<bool>,
        #[graphql(default)] order: SortOrder,
    ) -> Result<Page<DeliveryMethod>> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        let query = DeliveryMethodQuery {
            pagination: Pagination::new(skip, take),
            shop_id,
            shop_slug,
            active,
            deleted,
            order,
        };
        delivery_method_service::list_delivery_methods(state, caller(ctx), query)
            .await
            .map_err(|e| e.extend())
    }

    async fn get_delivery_method(&self, ctx: &Context<'_>, id: Uuid) -> Result<DeliveryMethod> {
        let state = app_state(ctx).map_err(|e| e.extend())?;
        delivery_method_service::get_delivery_method(state, id)
            .await
            .map_err(|e| e.extend())
    }
}
