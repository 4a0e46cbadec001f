use async_graphql::{Json, SimpleObject};
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::entity::{
    categories, delivery_methods,
    enums::{DeliveryMethodType, PaymentMethod, ShopStatus, UserRole},
    image_attachments, products, shops, users,
};

#[derive(Debug, Clone, SimpleObject)]
pub struct ImageAttachment {
    pub id: Uuid,
    pub original: String,
    pub normal: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Shop {
    pub id: Uuid,
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
    pub payment_methods: Vec<PaymentMethod>,
    pub payment_methods_metadata: Json<Value>,
    pub logo: Option<ImageAttachment>,
    /// Only loaded by single-product lookups and upsert results.
    pub delivery_methods: Option<Vec<DeliveryMethod>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub shop: Option<Shop>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub categories: Vec<Category>,
    pub shop: Option<Shop>,
    pub images: Vec<ImageAttachment>,
    pub has_variants: bool,
    pub visible: bool,
    pub deleted: bool,
    pub variants: Vec<Json<Value>>,
    pub price: f64,
    pub priority: i32,
    pub position: i32,
    pub promotional_price: Option<f64>,
    pub stock: i32,
    pub min: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    /// Loaded by category queries; empty when the category is nested in a product.
    pub products: Vec<Product>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct DeliveryMethod {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub admit_cash: bool,
    pub request_direction: bool,
    pub specific_payment_methods: Vec<PaymentMethod>,
    #[graphql(name = "type")]
    pub kind: DeliveryMethodType,
    pub active: bool,
    pub deleted: bool,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

pub fn image_from_entity(model: image_attachments::Model) -> ImageAttachment {
    ImageAttachment {
        id: model.id,
        original: model.original,
        normal: model.normal,
        thumbnail: model.thumbnail,
    }
}

pub fn shop_from_entity(model: shops::Model, logo: Option<image_attachments::Model>) -> Shop {
    Shop {
        id: model.id,
        slug: model.slug,
        name: model.name,
        description: model.description,
        country: model.country,
        city: model.city,
        category: model.category,
        instagram: model.instagram,
        facebook: model.facebook,
        tiktok: model.tiktok,
        phone_number: model.phone_number,
        has_whatsapp: model.has_whatsapp,
        status: model.status,
        payment_methods: model.payment_methods.0,
        payment_methods_metadata: Json(model.payment_methods_metadata),
        logo: logo.map(image_from_entity),
        delivery_methods: None,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn user_from_entity(model: users::Model, shop: Option<Shop>) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        role: model.role,
        shop,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn product_from_entity(model: products::Model) -> Product {
    let variants = match model.variants {
        Value::Array(items) => items.into_iter().map(Json).collect(),
        Value::Null => Vec::new(),
        other => vec![Json(other)],
    };
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        categories: Vec::new(),
        shop: None,
        images: Vec::new(),
        has_variants: model.has_variants,
        visible: model.visible,
        deleted: model.deleted,
        variants,
        price: model.price,
        priority: model.priority,
        position: model.position,
        promotional_price: model.promotional_price,
        stock: model.stock,
        min: model.min,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn category_from_entity(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
        products: Vec::new(),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn delivery_method_from_entity(model: delivery_methods::Model) -> DeliveryMethod {
    DeliveryMethod {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        admit_cash: model.admit_cash,
        request_direction: model.request_direction,
        specific_payment_methods: model.specific_payment_methods.0,
        kind: model.kind,
        active: model.active,
        deleted: model.deleted,
    }
}
