//! # Local Item Source
//!
//! SQLite-backed item source for the offline revision: search queries go
//! straight to the embedded database instead of the remote API. No session
//! or token is involved.

use std::sync::Arc;

use crate::error::ClientResult;
use crate::search::ItemSource;
use stockroom_core::Item;
use stockroom_db::Database;

/// Item source backed by the local database.
///
/// The same pipeline drives this and the remote client; swapping sources is
/// how the app moves between the offline and networked revisions.
#[derive(Debug, Clone)]
pub struct LocalSource {
    db: Arc<Database>,
}

impl LocalSource {
    /// Creates a local source over an open database.
    pub fn new(db: Arc<Database>) -> Self {
        LocalSource { db }
    }
}

#[async_trait::async_trait]
impl ItemSource for LocalSource {
    /// Substring filter over the items table; empty query lists everything.
    async fn fetch(&self, query: &str) -> ClientResult<Vec<Item>> {
        Ok(self.db.items().filter_by_name(query).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_db::DbConfig;

    #[tokio::test]
    async fn test_local_fetch_filters_by_substring() {
        let db = Arc::new(Database::new(DbConfig::in_memory()).await.unwrap());
        db.items().insert("Laptop", 10).await.unwrap();
        db.items().insert("Monitor", 7).await.unwrap();

        let source = LocalSource::new(db);

        let hits = source.fetch("lap").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Laptop");

        let all = source.fetch("").await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
