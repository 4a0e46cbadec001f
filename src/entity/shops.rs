use sea_orm::entity::prelude::*;

use super::enums::{PaymentMethodSet, ShopStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub tiktok: Option<String>,
    pub phone_number: Option<String>,
    pub has_whatsapp: bool,
    pub status: ShopStatus,
    #[sea_orm(column_type = "JsonBinary")]
    pub payment_methods: PaymentMethodSet,
    #[sea_orm(column_type = "JsonBinary")]
    pub payment_methods_metadata: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::delivery_methods::Entity")]
    DeliveryMethods,
    #[sea_orm(has_many = "super::shop_status_logs::Entity")]
    ShopStatusLogs,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::delivery_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryMethods.def()
    }
}

impl Related<super::shop_status_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShopStatusLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
