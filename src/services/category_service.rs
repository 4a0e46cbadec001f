use chrono::Utc;
use futures::future::join_all;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    dto::products::CategoryInput,
    entity::{Categories, ProductCategories, categories, product_categories},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Category,
    repository::{
        filters::{ShopScope, category_condition},
        includes::load_categories,
    },
    response::Page,
    routes::params::CategoryQuery,
    services::shop_scope,
    state::AppState,
};

/// How one category reference of a product is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLink {
    Connect { id: i32, slug: String },
    Create { name: String, slug: String },
}

/// Every reference must name a slug; the name falls back to it.
pub fn validate_inputs(inputs: &[CategoryInput]) -> AppResult<()> {
    for input in inputs {
        match input.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => {}
            _ => return Err(AppError::validation("category slug is required")),
        }
    }
    Ok(())
}

/// Look every slug up concurrently and decide connect or create per reference.
pub async fn resolve_links(
    conn: &DatabaseConnection,
    inputs: &[CategoryInput],
) -> AppResult<Vec<CategoryLink>> {
    validate_inputs(inputs)?;
    let lookups = inputs.iter().map(|input| async move {
        let slug = input.slug.as_deref().unwrap_or_default().trim().to_string();
        let existing = Categories::find()
            .filter(categories::Column::Slug.eq(slug.as_str()))
            .one(conn)
            .await?;
        Ok::<_, DbErr>(match existing {
            Some(category) => CategoryLink::Connect {
                id: category.id,
                slug: category.slug,
            },
            None => CategoryLink::Create {
                name: input
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(&slug)
                    .to_string(),
                slug,
            },
        })
    });

    let links = join_all(lookups)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(links)
}

/// Link `product_id` to every category, creating missing ones. Both inserts
/// tolerate a concurrent writer: a slug created by another transaction since
/// the lookup is connected, and an existing link is kept.
pub async fn apply_links(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    links: Vec<CategoryLink>,
) -> Result<(), DbErr> {
    for link in links {
        let category_id = match link {
            CategoryLink::Connect { id, .. } => id,
            CategoryLink::Create { name, slug } => create_or_find(txn, name, slug).await?,
        };

        ProductCategories::insert(product_categories::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(category_id),
        })
        .on_conflict(
            OnConflict::columns([
                product_categories::Column::ProductId,
                product_categories::Column::CategoryId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .do_nothing()
        .exec_without_returning(txn)
        .await?;
    }
    Ok(())
}

/// Insert the category unless its slug exists, then read it back by slug.
async fn create_or_find(
    txn: &DatabaseTransaction,
    name: String,
    slug: String,
) -> Result<i32, DbErr> {
    Categories::insert(categories::ActiveModel {
        name: Set(name),
        slug: Set(slug.clone()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(categories::Column::Slug)
            .do_nothing()
            .to_owned(),
    )
    .do_nothing()
    .exec_without_returning(txn)
    .await?;

    Categories::find()
        .filter(categories::Column::Slug.eq(slug.as_str()))
        .one(txn)
        .await?
        .map(|category| category.id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("category {slug}")))
}

pub async fn get_category(state: &AppState, slug: &str) -> AppResult<Category> {
    let model = Categories::find()
        .filter(categories::Column::Slug.eq(slug))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    load_categories(&state.orm, vec![model], &ShopScope::default())
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

/// Categories holding products of the requested shop, or of the caller's shop.
pub async fn list_categories(
    state: &AppState,
    user: Option<&AuthUser>,
    query: CategoryQuery,
) -> AppResult<Page<Category>> {
    let scope = shop_scope(query.shop_id, query.shop_slug.clone(), user)?
        .ok_or(AppError::Unauthorized)?;
    let (offset, limit) = query.pagination.normalize();

    let txn = state.orm.begin().await?;
    let finder = Categories::find()
        .filter(category_condition(&scope))
        .order_by(categories::Column::CreatedAt, query.order.as_order())
        .order_by(categories::Column::Id, query.order.as_order());
    let total = finder.clone().count(&txn).await?;
    let rows = finder.offset(offset).limit(limit).all(&txn).await?;
    let items = load_categories(&txn, rows, &scope).await?;
    txn.commit().await?;

    Ok(Page::new(total, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_without_slug_are_rejected() {
        let inputs = vec![
            CategoryInput {
                name: Some("Shoes".into()),
                slug: Some("shoes".into()),
            },
            CategoryInput {
                name: Some("Hats".into()),
                slug: None,
            },
        ];
        assert!(matches!(
            validate_inputs(&inputs),
            Err(AppError::ValidationFailed(_))
        ));
    }
}
