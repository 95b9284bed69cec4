//! Key-value store primitives.
//!
//! Items live in named tables and are addressed by a partition key plus a sort
//! key. Queries walk one partition in ascending sort-key order. Conditional
//! writes and atomic counters are the only cross-request coordination Atrium
//! relies on.

use std::fmt::Debug;

use async_trait::async_trait;
use atrium_core::AppError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt item in {table}: {reason}")]
    Corrupt { table: String, reason: String },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        AppError::internal(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub partition: String,
    pub sort: String,
}

impl ItemKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }

    /// Key for tables without a sort dimension.
    pub fn partition_only(partition: impl Into<String>) -> Self {
        Self::new(partition, "")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub key: ItemKey,
    pub attributes: Map<String, Value>,
}

impl Item {
    pub fn new(key: ItemKey, attributes: Map<String, Value>) -> Self {
        Self { key, attributes }
    }

    /// Serializes a record into the item's attributes.
    pub fn from_record<T: Serialize>(key: ItemKey, record: &T) -> Result<Self, StoreError> {
        match serde_json::to_value(record)? {
            Value::Object(attributes) => Ok(Self { key, attributes }),
            other => Err(StoreError::Corrupt {
                table: String::new(),
                reason: format!("record serialized to non-object: {}", other),
            }),
        }
    }

    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(self.attributes))?)
    }
}

/// Range query over a single partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Exclusive lower bound on the sort key.
    pub after: Option<String>,
    pub limit: Option<usize>,
    /// String attribute equalities, all applied before the limit.
    pub filters: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, sort: Option<String>) -> Self {
        self.after = sort;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter_eq(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((attribute.into(), value.into()));
        self
    }

    pub(crate) fn matches(&self, item: &Item) -> bool {
        let after_ok = self
            .after
            .as_ref()
            .is_none_or(|after| item.key.sort.as_str() > after.as_str());

        let filter_ok = self.filters.iter().all(|(attribute, expected)| {
            item.attributes.get(attribute).and_then(Value::as_str) == Some(expected.as_str())
        });

        after_ok && filter_ok
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    async fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError>;

    /// Unconditional upsert.
    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError>;

    /// Inserts only when the key is free. Returns `false` if an item already exists.
    async fn put_if_absent(&self, table: &str, item: Item) -> Result<bool, StoreError>;

    /// Merges `changes` into an existing item. Returns `None` if the item is absent.
    async fn update(
        &self,
        table: &str,
        key: &ItemKey,
        changes: Map<String, Value>,
    ) -> Result<Option<Item>, StoreError>;

    /// Returns whether an item was removed.
    async fn delete(&self, table: &str, key: &ItemKey) -> Result<bool, StoreError>;

    async fn query(
        &self,
        table: &str,
        partition: &str,
        query: &Query,
    ) -> Result<Vec<Item>, StoreError>;

    async fn scan(&self, table: &str) -> Result<Vec<Item>, StoreError>;

    /// Atomically adds one to a numeric attribute, creating it at 1. Returns the new value.
    async fn increment(&self, table: &str, key: &ItemKey, attribute: &str)
    -> Result<i64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(sort: &str, owner: &str) -> Item {
        let attributes = json!({ "owner": owner }).as_object().cloned().unwrap();
        Item::new(ItemKey::new("p", sort), attributes)
    }

    #[test]
    fn test_query_after_is_exclusive() {
        let query = Query::new().after(Some("b".into()));
        assert!(!query.matches(&item("a", "x")));
        assert!(!query.matches(&item("b", "x")));
        assert!(query.matches(&item("c", "x")));
    }

    #[test]
    fn test_query_filter_on_string_attribute() {
        let query = Query::new().filter_eq("owner", "x");
        assert!(query.matches(&item("a", "x")));
        assert!(!query.matches(&item("a", "y")));
    }

    #[test]
    fn test_query_filters_must_all_match() {
        let query = Query::new().filter_eq("owner", "x").filter_eq("state", "open");
        assert!(!query.matches(&item("a", "x")));

        let mut open = item("a", "x");
        open.attributes.insert("state".into(), json!("open"));
        assert!(query.matches(&open));
    }

    #[test]
    fn test_record_round_trip_through_item() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Record {
            name: String,
        }

        let record = Record { name: "acme".into() };
        let item = Item::from_record(ItemKey::partition_only("acme"), &record).unwrap();
        assert_eq!(item.attributes["name"], "acme");
        assert_eq!(item.into_record::<Record>().unwrap(), record);
    }
}
