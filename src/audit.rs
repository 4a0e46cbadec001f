use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};
use uuid::Uuid;

use crate::entity::{enums::ShopStatus, shop_status_logs};

/// Append one row to the shop status trail. Callers pass the transaction that
/// changed the status so the row commits or rolls back with it.
pub async fn log_shop_status<C: ConnectionTrait>(
    conn: &C,
    shop_id: Uuid,
    status: ShopStatus,
) -> Result<(), DbErr> {
    shop_status_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        status: Set(status),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    tracing::info!(%shop_id, ?status, "shop status recorded");
    Ok(())
}
