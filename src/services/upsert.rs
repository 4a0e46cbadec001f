//! Shared plumbing of the `upsert*` mutations: dropping no-op records,
//! splitting a batch into creates and updates, patch values, and assembling the
//! per-item results.

use std::collections::HashMap;

use async_graphql::MaybeUndefined;
use sea_orm::ActiveValue::{self, NotSet, Set};
use uuid::Uuid;

use crate::{
    dto::{delivery_methods::DeliveryMethodInput, products::ProductInput},
    error::{AppError, AppResult},
};

/// A batch record that creates when it has no identifier and patches otherwise.
pub trait UpsertRecord {
    fn record_id(&self) -> Option<Uuid>;

    /// True when no field at all was supplied.
    fn is_blank(&self) -> bool;
}

impl UpsertRecord for ProductInput {
    fn record_id(&self) -> Option<Uuid> {
        self.id
    }

    fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.description.is_undefined()
            && self.images.is_none()
            && self.categories.is_none()
            && self.variants.is_none()
            && self.price.is_none()
            && self.promotional_price.is_undefined()
            && self.stock.is_none()
            && self.min.is_none()
            && self.priority.is_none()
            && self.position.is_none()
            && self.visible.is_none()
            && self.deleted.is_none()
    }
}

impl UpsertRecord for DeliveryMethodInput {
    fn record_id(&self) -> Option<Uuid> {
        self.id
    }

    fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.description.is_undefined()
            && self.price.is_none()
            && self.admit_cash.is_none()
            && self.request_direction.is_none()
            && self.specific_payment_methods.is_none()
            && self.kind.is_none()
            && self.active.is_none()
            && self.deleted.is_none()
    }
}

#[derive(Debug)]
pub struct Partitioned<T> {
    pub creates: Vec<T>,
    pub updates: Vec<(Uuid, T)>,
}

/// Drop blank records, then split the rest by identifier presence. Input order
/// is kept within each group.
pub fn partition<T: UpsertRecord>(records: Vec<T>) -> Partitioned<T> {
    let mut creates = Vec::new();
    let mut updates = Vec::new();
    for record in records.into_iter().filter(|record| !record.is_blank()) {
        match record.record_id() {
            Some(id) => updates.push((id, record)),
            None => creates.push(record),
        }
    }
    Partitioned { creates, updates }
}

/// `Some` writes the value, `None` leaves the column alone.
pub fn patch<T>(value: Option<T>) -> ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    match value {
        Some(value) => Set(value),
        None => NotSet,
    }
}

/// Three-state patch for nullable columns: undefined is untouched, null clears.
pub fn patch_nullable<T>(value: MaybeUndefined<T>) -> ActiveValue<Option<T>>
where
    Option<T>: Into<sea_orm::Value>,
{
    match value {
        MaybeUndefined::Undefined => NotSet,
        MaybeUndefined::Null => Set(None),
        MaybeUndefined::Value(value) => Set(Some(value)),
    }
}

/// Value to store on create for a nullable column.
pub fn nullable_value<T>(value: MaybeUndefined<T>) -> Option<T> {
    match value {
        MaybeUndefined::Value(value) => Some(value),
        _ => None,
    }
}

/// Reject an explicitly supplied empty string.
pub fn ensure_not_blank(field: &str, value: Option<&str>) -> AppResult<()> {
    match value {
        Some(value) if value.trim().is_empty() => {
            Err(AppError::validation(format!("{field} must not be empty")))
        }
        _ => Ok(()),
    }
}

/// Log every failed item of an update fan-out. Results keep their position.
pub fn log_failures(kind: &str, results: &[AppResult<Uuid>]) {
    for err in results.iter().filter_map(|result| result.as_ref().err()) {
        tracing::warn!(kind, error = %err, "upsert item failed");
    }
}

/// Ids of the items that were written, in order and with repeats.
pub fn written_ids(outcomes: &[AppResult<Uuid>]) -> Vec<Uuid> {
    outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().ok().copied())
        .collect()
}

/// One result per batch item: the re-read entity, or the error that item hit.
/// An id repeated in the batch yields the entity at every position.
pub fn assemble<T: Clone>(
    outcomes: Vec<AppResult<Uuid>>,
    loaded: Vec<T>,
    id_of: impl Fn(&T) -> Uuid,
) -> Vec<AppResult<T>> {
    let by_id: HashMap<Uuid, T> = loaded.into_iter().map(|item| (id_of(&item), item)).collect();
    outcomes
        .into_iter()
        .map(|outcome| outcome.and_then(|id| by_id.get(&id).cloned().ok_or(AppError::NotFound)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keeps_relative_order_and_drops_blank_records() {
        let existing = Uuid::new_v4();
        let records = vec![
            ProductInput {
                id: Some(existing),
                name: Some("B".into()),
                ..Default::default()
            },
            ProductInput::default(),
            ProductInput {
                name: Some("A".into()),
                ..Default::default()
            },
            ProductInput {
                name: Some("C".into()),
                ..Default::default()
            },
        ];

        let Partitioned { creates, updates } = partition(records);
        let names: Vec<_> = creates.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, existing);
    }

    #[test]
    fn explicit_false_is_not_blank() {
        let record = DeliveryMethodInput {
            active: Some(false),
            ..Default::default()
        };
        assert!(!record.is_blank());
        assert!(DeliveryMethodInput::default().is_blank());
    }

    #[test]
    fn patch_distinguishes_null_from_undefined() {
        assert!(matches!(patch_nullable::<String>(MaybeUndefined::Undefined), NotSet));
        assert!(matches!(patch_nullable::<String>(MaybeUndefined::Null), ActiveValue::Set(None)));
        assert!(matches!(patch(Some(0_i32)), ActiveValue::Set(0)));
    }

    #[test]
    fn failed_items_keep_their_position() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let outcomes = vec![Ok(a), Err(AppError::NotFound), Ok(b), Ok(a)];
        assert_eq!(written_ids(&outcomes), vec![a, b, a]);

        let items = assemble(outcomes, vec![(b, "b"), (a, "a")], |item| item.0);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_ref().ok().map(|item| item.1), Some("a"));
        assert!(matches!(items[1], Err(AppError::NotFound)));
        assert_eq!(items[2].as_ref().ok().map(|item| item.1), Some("b"));
        assert_eq!(items[3].as_ref().ok().map(|item| item.1), Some("a"));
    }

    #[test]
    fn rows_gone_before_the_reread_are_not_found() {
        let loaded: Vec<(Uuid, &str)> = Vec::new();
        let items = assemble(vec![Ok(Uuid::new_v4())], loaded, |item| item.0);
        assert!(matches!(items[0], Err(AppError::NotFound)));
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(ensure_not_blank("name", Some("  ")).is_err());
        assert!(ensure_not_blank("name", None).is_ok());
    }
}
