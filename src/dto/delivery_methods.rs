use async_graphql::{InputObject, MaybeUndefined};
use uuid::Uuid;

use crate::entity::enums::{DeliveryMethodType, PaymentMethod};

/// One record of `upsertDeliveryMethods`: creates when `id` is absent, patches otherwise.
#[derive(Debug, Clone, Default, InputObject)]
pub struct DeliveryMethodInput {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
    pub price: Option<f64>,
    pub admit_cash: Option<bool>,
    pub request_direction: Option<bool>,
    pub specific_payment_methods: Option<Vec<PaymentMethod>>,
    #[graphql(name = "type")]
    pub kind: Option<DeliveryMethodType>,
    pub active: Option<bool>,
    pub deleted: Option<bool>,
}
