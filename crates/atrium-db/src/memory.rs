use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::store::{Item, ItemKey, KeyValueStore, Query, StoreError};

type Table = BTreeMap<ItemKey, Map<String, Value>>;

/// In-process store used for local runs and tests.
///
/// Every operation holds the table lock for its whole duration, so conditional
/// puts and increments are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|t| t.get(key))
            .map(|attributes| Item::new(key.clone(), attributes.clone())))
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(item.key, item.attributes);
        Ok(())
    }

    #[instrument(skip(self, item), fields(db.table = %table, db.partition = %item.key.partition))]
    async fn put_if_absent(&self, table: &str, item: Item) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();

        if table.contains_key(&item.key) {
            debug!("Conditional put rejected, key exists");
            return Ok(false);
        }

        table.insert(item.key, item.attributes);
        Ok(true)
    }

    async fn update(
        &self,
        table: &str,
        key: &ItemKey,
        changes: Map<String, Value>,
    ) -> Result<Option<Item>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(attributes) = tables.get_mut(table).and_then(|t| t.get_mut(key)) else {
            return Ok(None);
        };

        attributes.extend(changes);
        Ok(Some(Item::new(key.clone(), attributes.clone())))
    }

    async fn delete(&self, table: &str, key: &ItemKey) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(table)
            .and_then(|t| t.remove(key))
            .is_some())
    }

    async fn query(
        &self,
        table: &str,
        partition: &str,
        query: &Query,
    ) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let start = ItemKey::partition_only(partition);
        let items = table
            .range(start..)
            .take_while(|(key, _)| key.partition == partition)
            .map(|(key, attributes)| Item::new(key.clone(), attributes.clone()))
            .filter(|item| query.matches(item))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(items)
    }

    async fn scan(&self, table: &str) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|t| {
                t.iter()
                    .map(|(key, attributes)| Item::new(key.clone(), attributes.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn increment(
        &self,
        table: &str,
        key: &ItemKey,
        attribute: &str,
    ) -> Result<i64, StoreError> {
        let mut tables = self.tables.write().await;
        let attributes = tables
            .entry(table.to_string())
            .or_default()
            .entry(key.clone())
            .or_default();

        let current = match attributes.get(attribute) {
            None => 0,
            Some(value) => value.as_i64().ok_or_else(|| StoreError::Corrupt {
                table: table.to_string(),
                reason: format!("counter {} is not an integer", attribute),
            })?,
        };

        let next = current + 1;
        attributes.insert(attribute.to_string(), Value::from(next));
        Ok(next)
    }
}
