use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity::{
    Accounts, Categories, Customers, DeliveryMethods, ImageAttachments, ProductCategories,
    Products, ShopStatusLogs, Shops, Users,
};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240601_000001_create_storefront_tables"
    }
}

async fn create_from_entity<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let schema = Schema::new(manager.get_database_backend());
    manager
        .create_table(schema.create_table_from_entity(entity))
        .await?;
    for create_index in schema.create_index_from_entity(entity) {
        manager.create_index(create_index).await?;
    }
    Ok(())
}

async fn drop_for_entity<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // Foreign-key order: every table is created after the tables it references.
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_from_entity(manager, Users).await?;
        create_from_entity(manager, Accounts).await?;
        create_from_entity(manager, Shops).await?;
        create_from_entity(manager, Customers).await?;
        create_from_entity(manager, Products).await?;
        create_from_entity(manager, Categories).await?;
        create_from_entity(manager, ProductCategories).await?;
        create_from_entity(manager, DeliveryMethods).await?;
        create_from_entity(manager, ImageAttachments).await?;
        create_from_entity(manager, ShopStatusLogs).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_for_entity(manager, ShopStatusLogs).await?;
        drop_for_entity(manager, ImageAttachments).await?;
        drop_for_entity(manager, DeliveryMethods).await?;
        drop_for_entity(manager, ProductCategories).await?;
        drop_for_entity(manager, Categories).await?;
        drop_for_entity(manager, Products).await?;
        drop_for_entity(manager, Customers).await?;
        drop_for_entity(manager, Shops).await?;
        drop_for_entity(manager, Accounts).await?;
        drop_for_entity(manager, Users).await?;
        Ok(())
    }
}
