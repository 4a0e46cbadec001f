use async_graphql::Json;
use chrono::{Duration, Utc};
use futures::future::{join_all, try_join_all};
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::products::{ImageAttachmentInput, ProductInput},
    entity::{ImageAttachments, Products, image_attachments, products},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    repository::{
        constraint_error,
        filters::product_condition,
        includes::{ProductIncludes, find_product, find_products_by_ids, load_products},
    },
    response::Page,
    routes::params::ProductQuery,
    services::{
        category_service::{CategoryLink, apply_links, resolve_links, validate_inputs},
        shop_scope,
        upsert::{
            Partitioned, assemble, ensure_not_blank, log_failures, nullable_value, partition,
            patch, patch_nullable, written_ids,
        },
    },
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    user: Option<&AuthUser>,
    query: ProductQuery,
) -> AppResult<Page<Product>> {
    let scope = shop_scope(query.shop_id, query.shop_slug.clone(), user)?
        .ok_or(AppError::Unauthorized)?;
    let (offset, limit) = query.pagination.normalize();
    let order = query.order.as_order();

    // count and page read the same snapshot
    let txn = state.orm.begin().await?;
    let finder = Products::find()
        .filter(product_condition(&query, &scope))
        .order_by(products::Column::Position, order.clone())
        .order_by(products::Column::CreatedAt, order);
    let total = finder.clone().count(&txn).await?;
    let rows = finder.offset(offset).limit(limit).all(&txn).await?;
    let items = load_products(&txn, rows, ProductIncludes::LIST).await?;
    txn.commit().await?;

    Ok(Page::new(total, items))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    find_product(&state.orm, id, ProductIncludes::DETAIL)
        .await?
        .ok_or(AppError::NotFound)
}

/// Create records without an id in one transaction, patch the others one
/// transaction each, and return creates followed by updates. Invalid input or
/// a failed create fails the batch; a failed update fails only its own item.
pub async fn upsert_products(
    state: &AppState,
    shop_id: Uuid,
    records: Vec<ProductInput>,
) -> AppResult<Vec<AppResult<Product>>> {
    for record in &records {
        validate_record(record)?;
    }
    let Partitioned { creates, updates } = partition(records);
    tracing::debug!(
        %shop_id,
        creates = creates.len(),
        updates = updates.len(),
        "upserting products"
    );

    let created = create_products(state, shop_id, creates).await?;
    let updated = join_all(
        updates
            .into_iter()
            .map(|(id, record)| update_product(state, shop_id, id, record)),
    )
    .await;
    log_failures("product", &updated);

    let outcomes: Vec<AppResult<Uuid>> = created.into_iter().map(Ok).chain(updated).collect();
    let loaded =
        find_products_by_ids(&state.orm, &written_ids(&outcomes), ProductIncludes::DETAIL).await?;
    Ok(assemble(outcomes, loaded, |product| product.id))
}

fn validate_record(record: &ProductInput) -> AppResult<()> {
    ensure_not_blank("name", record.name.as_deref())?;
    if let Some(categories) = &record.categories {
        validate_inputs(categories)?;
    }
    Ok(())
}

async fn create_products(
    state: &AppState,
    shop_id: Uuid,
    records: Vec<ProductInput>,
) -> AppResult<Vec<Uuid>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let links = try_join_all(
        records
            .iter()
            .map(|record| resolve_links(&state.orm, record.categories.as_deref().unwrap_or_default())),
    )
    .await?;

    let txn = state.orm.begin().await?;
    let mut ids = Vec::with_capacity(records.len());
    for (record, links) in records.into_iter().zip(links) {
        let id = insert_product(&txn, shop_id, record, links)
            .await
            .map_err(constraint_error)?;
        ids.push(id);
    }
    txn.commit().await?;

    Ok(ids)
}

async fn insert_product(
    txn: &DatabaseTransaction,
    shop_id: Uuid,
    record: ProductInput,
    links: Vec<CategoryLink>,
) -> Result<Uuid, DbErr> {
    let now = Utc::now();
    let (variants, has_variants) = variants_value(record.variants.unwrap_or_default());
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        name: Set(record.name.unwrap_or_default()),
        description: Set(nullable_value(record.description)),
        price: Set(record.price.unwrap_or_default()),
        promotional_price: Set(nullable_value(record.promotional_price)),
        stock: Set(record.stock.unwrap_or_default()),
        min: Set(record.min.unwrap_or_default()),
        priority: Set(record.priority.unwrap_or_default()),
        position: Set(record.position.unwrap_or_default()),
        visible: Set(record.visible.unwrap_or(true)),
        deleted: Set(record.deleted.unwrap_or(false)),
        has_variants: Set(has_variants),
        variants: Set(variants),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    insert_images(txn, product.id, record.images.unwrap_or_default()).await?;
    apply_links(txn, product.id, links).await?;
    Ok(product.id)
}

async fn update_product(
    state: &AppState,
    shop_id: Uuid,
    id: Uuid,
    record: ProductInput,
) -> AppResult<Uuid> {
    let links = match record.categories.as_deref() {
        Some(categories) => resolve_links(&state.orm, categories).await?,
        None => Vec::new(),
    };

    let txn = state.orm.begin().await?;
    let owned = Products::find_by_id(id)
        .filter(products::Column::ShopId.eq(shop_id))
        .one(&txn)
        .await?
        .is_some();
    if !owned {
        return Err(AppError::NotFound);
    }
    patch_product(&txn, id, record, links)
        .await
        .map_err(constraint_error)?;
    txn.commit().await?;

    Ok(id)
}

async fn patch_product(
    txn: &DatabaseTransaction,
    id: Uuid,
    record: ProductInput,
    links: Vec<CategoryLink>,
) -> Result<(), DbErr> {
    let ProductInput {
        name,
        description,
        images,
        variants,
        price,
        promotional_price,
        stock,
        min,
        priority,
        position,
        visible,
        deleted,
        ..
    } = record;

    let mut product = products::ActiveModel {
        id: Unchanged(id),
        name: patch(name),
        description: patch_nullable(description),
        price: patch(price),
        promotional_price: patch_nullable(promotional_price),
        stock: patch(stock),
        min: patch(min),
        priority: patch(priority),
        position: patch(position),
        visible: patch(visible),
        deleted: patch(deleted),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };
    if let Some(variants) = variants {
        let (variants, has_variants) = variants_value(variants);
        product.variants = Set(variants);
        product.has_variants = Set(has_variants);
    }
    product.update(txn).await?;

    if let Some(images) = images {
        ImageAttachments::delete_many()
            .filter(image_attachments::Column::ProductId.eq(id))
            .exec(txn)
            .await?;
        insert_images(txn, id, images).await?;
    }
    apply_links(txn, id, links).await?;
    Ok(())
}

/// Stored variant list and the `has_variants` flag derived from it.
fn variants_value(variants: Vec<Json<Value>>) -> (Value, bool) {
    let has_variants = !variants.is_empty();
    let list = variants.into_iter().map(|Json(value)| value).collect();
    (Value::Array(list), has_variants)
}

async fn insert_images(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    images: Vec<ImageAttachmentInput>,
) -> Result<(), DbErr> {
    if images.is_empty() {
        return Ok(());
    }
    let now = Utc::now();
    let rows = images
        .into_iter()
        .enumerate()
        .map(|(index, image)| image_attachments::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(Some(product_id)),
            shop_id: Set(None),
            original: Set(image.original.unwrap_or_default()),
            normal: Set(image.normal.unwrap_or_default()),
            thumbnail: Set(image.thumbnail.unwrap_or_default()),
            // images are listed by creation time; keep input order
            created_at: Set((now + Duration::microseconds(index as i64)).into()),
        });
    ImageAttachments::insert_many(rows)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}
