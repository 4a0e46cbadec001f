use async_graphql::{OutputType, SimpleObject};
use axum::http::HeaderMap;
use serde::Serialize;

use crate::models::{Category, DeliveryMethod, Product};

/// Page envelope for list queries. `total` counts every row matching the
/// filter, independent of `skip`/`take`.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(concrete(name = "ProductPage", params(Product)))]
#[graphql(concrete(name = "CategoryPage", params(Category)))]
#[graphql(concrete(name = "DeliveryMethodPage", params(DeliveryMethod)))]
pub struct Page<T: OutputType> {
    pub total: i64,
    pub items: Vec<T>,
}

impl<T: OutputType> Page<T> {
    pub fn new(total: u64, items: Vec<T>) -> Self {
        Self {
            total: total as i64,
            items,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct Meta {
    pub request_id: Option<String>,
}

impl Meta {
    /// Echo the `x-request-id` assigned by the request-id layer.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            request_id: headers
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
        }
    }
}

/// JSON body of the plain HTTP endpoints (health, fallback).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
