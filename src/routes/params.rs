use async_graphql::Enum;
use sea_orm::Order;
use uuid::Uuid;

pub const DEFAULT_TAKE: i64 = 10;
pub const MAX_TAKE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub take: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            take: DEFAULT_TAKE,
        }
    }
}

impl Pagination {
    pub fn new(skip: i64, take: i64) -> Self {
        Self { skip, take }
    }

    /// `(offset, limit)` clamped to sane bounds.
    pub fn normalize(&self) -> (u64, u64) {
        let skip = self.skip.max(0);
        let take = self.take.clamp(0, MAX_TAKE);
        (skip as u64, take as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Enum)]
#[graphql(name = "OrderEnum", rename_items = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_order(&self) -> Order {
        match self {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub pagination: Pagination,
    pub shop_id: Option<Uuid>,
    pub shop_slug: Option<String>,
    pub visible: Option<bool>,
    pub deleted: Option<bool>,
    pub category_id: Option<i32>,
    pub category_slug: Option<String>,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    pub pagination: Pagination,
    pub shop_id: Option<Uuid>,
    pub shop_slug: Option<String>,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryMethodQuery {
    pub pagination: Pagination,
    pub shop_id: Option<Uuid>,
    pub shop_slug: Option<String>,
    pub active: Option<bool>,
    pub deleted: Option<bool>,
    pub order: SortOrder,
}
