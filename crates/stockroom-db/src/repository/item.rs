//! # Item Repository
//!
//! Database operations for inventory items.
//!
//! ## Key Operations
//! - CRUD with explicit not-found signalling
//! - Substring search over the name column
//!
//! ## Substring Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Name Search Works                                │
//! │                                                                         │
//! │  User types: "lap"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE '%lap%' against the name column only                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ items                                   │                           │
//! │  │                                         │                           │
//! │  │ 1 | Laptop        | 10                  │ ← MATCH                   │
//! │  │ 2 | Laptop stand  |  4                  │ ← MATCH                   │
//! │  │ 3 | Monitor       |  7                  │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  Empty query skips the filter and returns every item.                  │
//! │  No matches returns an empty list, not an error.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::Item;

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let stored = repo.insert("Laptop", 10).await?;
/// let hits = repo.filter_by_name("lap").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts a new item and returns it with its assigned id.
    pub async fn insert(&self, name: &str, quantity: i64) -> DbResult<Item> {
        debug!(name = %name, quantity = %quantity, "Inserting item");

        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, quantity)
            VALUES (?1, ?2)
            RETURNING id, name, quantity
            "#,
        )
        .bind(name)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all items, ordered by id (insertion order).
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity
            FROM items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an item by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found (never an out-of-bounds fault)
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Returns items whose name contains `query` as a substring.
    ///
    /// ## Behavior
    /// - Wildcard on both sides: `LIKE '%query%'` against the name only
    /// - Case-insensitive for ASCII (SQLite LIKE default)
    /// - Empty query returns the unfiltered full list
    /// - No matches returns an empty list, not an error
    pub async fn filter_by_name(&self, query: &str) -> DbResult<Vec<Item>> {
        let query = query.trim();

        debug!(query = %query, "Filtering items by name");

        if query.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{}%", query);

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity
            FROM items
            WHERE name LIKE ?1
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Filter returned items");
        Ok(items)
    }

    /// Updates an item's name and quantity.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: i64, name: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?2,
                quantity = ?3,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Deletes an item by id.
    ///
    /// ## Returns
    /// * `Ok(())` - Delete successful
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Counts total items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
