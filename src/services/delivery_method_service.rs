use chrono::Utc;
use futures::future::join_all;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::delivery_methods::DeliveryMethodInput,
    entity::{DeliveryMethods, delivery_methods, enums::PaymentMethodSet},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeliveryMethod, delivery_method_from_entity},
    repository::{constraint_error, filters::delivery_method_condition},
    response::Page,
    routes::params::DeliveryMethodQuery,
    services::{
        shop_scope,
        upsert::{
            Partitioned, assemble, ensure_not_blank, log_failures, nullable_value, partition,
            patch, patch_nullable, written_ids,
        },
    },
    state::AppState,
};

/// Without a named shop, anonymous callers see every shop's methods.
pub async fn list_delivery_methods(
    state: &AppState,
    user: Option<&AuthUser>,
    query: DeliveryMethodQuery,
) -> AppResult<Page<DeliveryMethod>> {
    let scope = shop_scope(query.shop_id, query.shop_slug.clone(), user)?.unwrap_or_default();
    let (offset, limit) = query.pagination.normalize();

    let txn = state.orm.begin().await?;
    let finder = DeliveryMethods::find()
        .filter(delivery_method_condition(&query, &scope))
        .order_by(delivery_methods::Column::CreatedAt, query.order.as_order());
    let total = finder.clone().count(&txn).await?;
    let items = finder
        .offset(offset)
        .limit(limit)
        .all(&txn)
        .await?
        .into_iter()
        .map(delivery_method_from_entity)
        .collect();
    txn.commit().await?;

    Ok(Page::new(total, items))
}

pub async fn get_delivery_method(state: &AppState, id: Uuid) -> AppResult<DeliveryMethod> {
    DeliveryMethods::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(delivery_method_from_entity)
        .ok_or(AppError::NotFound)
}

/// Creates share one transaction; each update stands alone and fails only its
/// own item.
pub async fn upsert_delivery_methods(
    state: &AppState,
    shop_id: Uuid,
    records: Vec<DeliveryMethodInput>,
) -> AppResult<Vec<AppResult<DeliveryMethod>>> {
    for record in &records {
        ensure_not_blank("name", record.name.as_deref())?;
    }
    let Partitioned { creates, updates } = partition(records);
    tracing::debug!(
        %shop_id,
        creates = creates.len(),
        updates = updates.len(),
        "upserting delivery methods"
    );

    let mut outcomes: Vec<AppResult<Uuid>> =
        Vec::with_capacity(creates.len() + updates.len());
    if !creates.is_empty() {
        let txn = state.orm.begin().await?;
        for record in creates {
            let created = new_delivery_method(shop_id, record)
                .insert(&txn)
                .await
                .map_err(constraint_error)?;
            outcomes.push(Ok(created.id));
        }
        txn.commit().await?;
    }

    let updated = join_all(
        updates
            .into_iter()
            .map(|(id, record)| update_delivery_method(state, shop_id, id, record)),
    )
    .await;
    log_failures("delivery_method", &updated);
    outcomes.extend(updated);

    let loaded = DeliveryMethods::find()
        .filter(delivery_methods::Column::Id.is_in(written_ids(&outcomes)))
        .all(&state.orm)
        .await?;
    Ok(assemble(outcomes, loaded, |model| model.id)
        .into_iter()
        .map(|item| item.map(delivery_method_from_entity))
        .collect())
}

fn new_delivery_method(shop_id: Uuid, record: DeliveryMethodInput) -> delivery_methods::ActiveModel {
    let now = Utc::now();
    delivery_methods::ActiveModel {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        name: Set(record.name.unwrap_or_default()),
        description: Set(nullable_value(record.description)),
        price: Set(record.price.unwrap_or_default()),
        kind: Set(record.kind.unwrap_or_default()),
        specific_payment_methods: Set(record
            .specific_payment_methods
            .unwrap_or_default()
            .into_iter()
            .collect()),
        admit_cash: Set(record.admit_cash.unwrap_or(false)),
        request_direction: Set(record.request_direction.unwrap_or(false)),
        active: Set(record.active.unwrap_or(true)),
        deleted: Set(record.deleted.unwrap_or(false)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}

/// One statement scoped to the caller's shop; no matching row is `NotFound`.
async fn update_delivery_method(
    state: &AppState,
    shop_id: Uuid,
    id: Uuid,
    record: DeliveryMethodInput,
) -> AppResult<Uuid> {
    let changes = delivery_methods::ActiveModel {
        name: patch(record.name),
        description: patch_nullable(record.description),
        price: patch(record.price),
        kind: patch(record.kind),
        specific_payment_methods: patch(
            record
                .specific_payment_methods
                .map(|methods| methods.into_iter().collect::<PaymentMethodSet>()),
        ),
        admit_cash: patch(record.admit_cash),
        request_direction: patch(record.request_direction),
        active: patch(record.active),
        deleted: patch(record.deleted),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };

    let result = DeliveryMethods::update_many()
        .set(changes)
        .filter(delivery_methods::Column::Id.eq(id))
        .filter(delivery_methods::Column::ShopId.eq(shop_id))
        .exec(&state.orm)
        .await
        .map_err(constraint_error)?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(id)
}
