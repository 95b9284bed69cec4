//! Cursor pagination helpers.
//!
//! Listings walk a partition in ascending sort-key order. A page is fetched with
//! `limit + 1` items; the extra item only signals that more records remain, and
//! the cursor returned to the client is the sort key of the last item on the page.
//!
//! ```ignore
//! let limit = clamp_limit(params.limit, DEFAULT_LIMIT);
//! let items = store.query(table, partition, &Query::after(cursor).limit(limit + 1)).await?;
//! let page = CursorPage::from_overfetch(items, limit, |item| item.dni.clone());
//! ```

/// Default page size for user listings.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page a client may request.
pub const MAX_LIMIT: i64 = 100;

/// Clamps a requested page size to `[1, MAX_LIMIT]`, using `default` when absent.
#[must_use]
pub fn clamp_limit(limit: Option<i64>, default: i64) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Sort key to resume after; `None` on the last page.
    pub next: Option<String>,
}

impl<T> CursorPage<T> {
    /// Builds a page from a query that asked for `limit + 1` items.
    pub fn from_overfetch<F>(mut items: Vec<T>, limit: usize, cursor_of: F) -> Self
    where
        F: Fn(&T) -> String,
    {
        let has_more = items.len() > limit;
        items.truncate(limit);

        let next = if has_more {
            items.last().map(cursor_of)
        } else {
            None
        };

        Self { items, next }
    }
}
