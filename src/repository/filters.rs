use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::{
    entity::{categories, delivery_methods, product_categories, products, shops},
    routes::params::{DeliveryMethodQuery, ProductQuery},
};

/// Which shop a list query is restricted to. Both parts apply when both are set;
/// an empty scope matches every shop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopScope {
    pub id: Option<Uuid>,
    pub slug: Option<String>,
}

impl ShopScope {
    pub fn new(id: Option<Uuid>, slug: Option<String>) -> Self {
        Self { id, slug }
    }

    pub fn shop(id: Uuid) -> Self {
        Self {
            id: Some(id),
            slug: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.slug.is_none()
    }

    /// Restrict `column`, which holds a shop id, to this scope.
    pub fn condition<C: ColumnTrait>(&self, column: C) -> Condition {
        let mut condition = Condition::all();
        if let Some(id) = self.id {
            condition = condition.add(column.eq(id));
        }
        if let Some(slug) = &self.slug {
            condition = condition.add(column.in_subquery(shop_ids_by_slug(slug)));
        }
        condition
    }
}

fn shop_ids_by_slug(slug: &str) -> SelectStatement {
    Query::select()
        .column(shops::Column::Id)
        .from(shops::Entity)
        .and_where(shops::Column::Slug.eq(slug))
        .to_owned()
}

pub fn product_condition(query: &ProductQuery, scope: &ShopScope) -> Condition {
    let mut condition = scope.condition(products::Column::ShopId);

    if let Some(visible) = query.visible {
        condition = condition.add(products::Column::Visible.eq(visible));
    }
    if let Some(deleted) = query.deleted {
        condition = condition.add(products::Column::Deleted.eq(deleted));
    }

    if query.category_id.is_some() || query.category_slug.is_some() {
        let mut category = Condition::all();
        if let Some(id) = query.category_id {
            category = category.add(categories::Column::Id.eq(id));
        }
        if let Some(slug) = &query.category_slug {
            category = category.add(categories::Column::Slug.eq(slug.as_str()));
        }
        let category_ids = Query::select()
            .column(categories::Column::Id)
            .from(categories::Entity)
            .cond_where(category)
            .to_owned();
        let product_ids = Query::select()
            .column(product_categories::Column::ProductId)
            .from(product_categories::Entity)
            .and_where(product_categories::Column::CategoryId.in_subquery(category_ids))
            .to_owned();
        condition = condition.add(products::Column::Id.in_subquery(product_ids));
    }

    condition
}

/// Categories holding at least one product inside `scope`.
pub fn category_condition(scope: &ShopScope) -> Condition {
    let product_ids = Query::select()
        .column(products::Column::Id)
        .from(products::Entity)
        .cond_where(scope.condition(products::Column::ShopId))
        .to_owned();
    let category_ids = Query::select()
        .column(product_categories::Column::CategoryId)
        .from(product_categories::Entity)
        .and_where(product_categories::Column::ProductId.in_subquery(product_ids))
        .to_owned();
    Condition::all().add(categories::Column::Id.in_subquery(category_ids))
}

pub fn delivery_method_condition(query: &DeliveryMethodQuery, scope: &ShopScope) -> Condition {
    let mut condition = scope.condition(delivery_methods::Column::ShopId);
    if let Some(active) = query.active {
        condition = condition.add(delivery_methods::Column::Active.eq(active));
    }
    if let Some(deleted) = query.deleted {
        condition = condition.add(delivery_methods::Column::Deleted.eq(deleted));
    }
    condition
}
