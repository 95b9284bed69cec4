//! PostgreSQL backend.
//!
//! All logical tables share the `kv_items` relation; attributes are stored as
//! JSONB. Conditional puts map to `ON CONFLICT DO NOTHING` and counters to an
//! upsert that increments inside a single statement.

use std::env;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{debug, instrument};

use crate::store::{Item, ItemKey, KeyValueStore, Query, StoreError};

type Row = (String, String, Json<Map<String, Value>>);

fn into_item((partition, sort, Json(attributes)): Row) -> Item {
    Item::new(ItemKey::new(partition, sort), attributes)
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the bundled migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Connects to `DATABASE_URL` (or the given URL) and returns a pool.
///
/// # Errors
///
/// Returns `StoreError::Database` if no URL is configured or the connection fails.
pub async fn init_db_pool(database_url: Option<&str>) -> Result<PgPool, StoreError> {
    let url = match database_url {
        Some(url) => url.to_string(),
        None => env::var("DATABASE_URL").map_err(|_| {
            StoreError::Database(sqlx::Error::Configuration(
                "DATABASE_URL must be set".into(),
            ))
        })?,
    };

    Ok(sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await?)
}

#[async_trait]
impl KeyValueStore for PgStore {
    #[instrument(skip(self), fields(db.table = %table))]
    async fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query_as::<_, Row>(
            r#"SELECT partition_key, sort_key, attributes
               FROM kv_items
               WHERE table_name = $1 AND partition_key = $2 AND sort_key = $3"#,
        )
        .bind(table)
        .bind(&key.partition)
        .bind(&key.sort)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_item))
    }

    #[instrument(skip(self, item), fields(db.table = %table))]
    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO kv_items (table_name, partition_key, sort_key, attributes)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (table_name, partition_key, sort_key)
               DO UPDATE SET attributes = EXCLUDED.attributes"#,
        )
        .bind(table)
        .bind(&item.key.partition)
        .bind(&item.key.sort)
        .bind(Json(&item.attributes))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, item), fields(db.table = %table))]
    async fn put_if_absent(&self, table: &str, item: Item) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"INSERT INTO kv_items (table_name, partition_key, sort_key, attributes)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (table_name, partition_key, sort_key) DO NOTHING"#,
        )
        .bind(table)
        .bind(&item.key.partition)
        .bind(&item.key.sort)
        .bind(Json(&item.attributes))
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() == 1;
        if !inserted {
            debug!(db.partition = %item.key.partition, "Conditional put rejected, key exists");
        }
        Ok(inserted)
    }

    #[instrument(skip(self, changes), fields(db.table = %table))]
    async fn update(
        &self,
        table: &str,
        key: &ItemKey,
        changes: Map<String, Value>,
    ) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query_as::<_, Row>(
            r#"UPDATE kv_items
               SET attributes = attributes || $4
               WHERE table_name = $1 AND partition_key = $2 AND sort_key = $3
               RETURNING partition_key, sort_key, attributes"#,
        )
        .bind(table)
        .bind(&key.partition)
        .bind(&key.sort)
        .bind(Json(&changes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_item))
    }

    #[instrument(skip(self), fields(db.table = %table))]
    async fn delete(&self, table: &str, key: &ItemKey) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"DELETE FROM kv_items
               WHERE table_name = $1 AND partition_key = $2 AND sort_key = $3"#,
        )
        .bind(table)
        .bind(&key.partition)
        .bind(&key.sort)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(db.table = %table))]
    async fn query(
        &self,
        table: &str,
        partition: &str,
        query: &Query,
    ) -> Result<Vec<Item>, StoreError> {
        // `@>` with an empty object matches every row.
        let filters: Map<String, Value> = query
            .filters
            .iter()
            .map(|(attribute, value)| (attribute.clone(), Value::String(value.clone())))
            .collect();
        let limit = query
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, Row>(
            r#"SELECT partition_key, sort_key, attributes
               FROM kv_items
               WHERE table_name = $1
                 AND partition_key = $2
                 AND ($3::text IS NULL OR sort_key > $3)
                 AND attributes @> $4
               ORDER BY sort_key
               LIMIT $5"#,
        )
        .bind(table)
        .bind(partition)
        .bind(&query.after)
        .bind(Json(filters))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_item).collect())
    }

    #[instrument(skip(self), fields(db.table = %table))]
    async fn scan(&self, table: &str) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query_as::<_, Row>(
            r#"SELECT partition_key, sort_key, attributes
               FROM kv_items
               WHERE table_name = $1
               ORDER BY partition_key, sort_key"#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_item).collect())
    }

    #[instrument(skip(self), fields(db.table = %table))]
    async fn increment(
        &self,
        table: &str,
        key: &ItemKey,
        attribute: &str,
    ) -> Result<i64, StoreError> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO kv_items (table_name, partition_key, sort_key, attributes)
               VALUES ($1, $2, $3, jsonb_build_object($4::text, 1))
               ON CONFLICT (table_name, partition_key, sort_key)
               DO UPDATE SET attributes = kv_items.attributes || jsonb_build_object(
                   $4::text,
                   COALESCE((kv_items.attributes ->> $4)::bigint, 0) + 1
               )
               RETURNING (attributes ->> $4)::bigint"#,
        )
        .bind(table)
        .bind(&key.partition)
        .bind(&key.sort)
        .bind(attribute)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
