use async_graphql::Enum;
use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Iterable};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "ZELLE")]
    Zelle,
    #[sea_orm(string_value = "PAGOMOVIL")]
    Pagomovil,
    #[sea_orm(string_value = "PAYPAL")]
    Paypal,
    #[sea_orm(string_value = "POS")]
    Pos,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Zelle => "ZELLE",
            PaymentMethod::Pagomovil => "PAGOMOVIL",
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::Pos => "POS",
        }
    }

    /// `{ "CASH": null, "ZELLE": null, ... }`, the metadata a new shop starts with.
    pub fn empty_metadata() -> serde_json::Value {
        let map = Self::iter()
            .map(|method| (method.as_str().to_string(), serde_json::Value::Null))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// Payment methods stored with set semantics; first occurrence wins the position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PaymentMethodSet(pub Vec<PaymentMethod>);

impl FromIterator<PaymentMethod> for PaymentMethodSet {
    fn from_iter<I: IntoIterator<Item = PaymentMethod>>(iter: I) -> Self {
        let mut methods = Vec::new();
        for method in iter {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        Self(methods)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[graphql(rename_items = "PascalCase")]
pub enum DeliveryMethodType {
    #[default]
    #[sea_orm(string_value = "Delivery")]
    Delivery,
    #[sea_orm(string_value = "Pickup")]
    Pickup,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopStatus {
    #[default]
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "SUSPENDED")]
    Suspended,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}
