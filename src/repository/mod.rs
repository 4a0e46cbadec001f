//! Storage access shared by the services: filter composition for list
//! queries, eager loading of relations, and translation of constraint errors.

pub mod filters;
pub mod includes;

use sea_orm::{DbErr, SqlErr};

use crate::error::AppError;

/// Unique fields whose violations are reported by name.
const KNOWN_UNIQUE_FIELDS: [&str; 2] = ["email", "slug"];

/// Field name behind a unique-constraint violation, or `None` for any other error.
pub fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(violated_field(&message)),
        _ => None,
    }
}

/// Unique violations become `UniqueConstraintViolation(field)`; anything else
/// stays a database error.
pub fn constraint_error(err: DbErr) -> AppError {
    match unique_violation(&err) {
        Some(field) => AppError::UniqueConstraintViolation(field),
        None => AppError::OrmError(err),
    }
}

fn violated_field(message: &str) -> String {
    let lower = message.to_lowercase();
    KNOWN_UNIQUE_FIELDS
        .iter()
        .find(|field| lower.contains(*field))
        .map(|field| field.to_string())
        .unwrap_or_else(|| message.to_string())
}
