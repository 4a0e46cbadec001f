use async_graphql::{InputObject, Json, MaybeUndefined};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Default, InputObject)]
pub struct ImageAttachmentInput {
    pub original: Option<String>,
    pub normal: Option<String>,
    pub thumbnail: Option<String>,
}

/// Reference to a category by slug; an unknown slug creates the category.
#[derive(Debug, Clone, Default, InputObject)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// One record of `upsertProducts`: creates when `id` is absent, patches otherwise.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductInput {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
    pub images: Option<Vec<ImageAttachmentInput>>,
    pub categories: Option<Vec<CategoryInput>>,
    pub variants: Option<Vec<Json<Value>>>,
    pub price: Option<f64>,
    pub promotional_price: MaybeUndefined<f64>,
    pub stock: Option<i32>,
    pub min: Option<i32>,
    pub priority: Option<i32>,
    pub position: Option<i32>,
    pub visible: Option<bool>,
    pub deleted: Option<bool>,
}
