//! # Item List View Model
//!
//! The visible item buffer and its selection dispatch. This is the consumer
//! of the search pipeline: completions replace the buffer wholesale, and a
//! selection hands a transient copy of the chosen item upward.
//!
//! Rendering is not this crate's concern; a frontend reads [`ItemList::items`]
//! snapshots and calls [`ItemList::select`] on taps.

use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use stockroom_core::Item;

/// Cloneable handle to the current visible item collection.
///
/// All clones share the same buffer. The buffer holds disposable copies;
/// the store (local or remote) owns the canonical records.
#[derive(Debug, Clone, Default)]
pub struct ItemList {
    items: Arc<RwLock<Vec<Item>>>,
    selection_tx: Option<mpsc::UnboundedSender<Item>>,
}

impl ItemList {
    /// Creates an empty list with no selection channel.
    pub fn new() -> Self {
        ItemList::default()
    }

    /// Creates an empty list plus a receiver for selection events.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let (list, mut selections) = ItemList::with_selection();
    /// // elsewhere: list.select(0).await dispatches the item copy
    /// let chosen = selections.recv().await;
    /// ```
    pub fn with_selection() -> (Self, mpsc::UnboundedReceiver<Item>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let list = ItemList {
            items: Arc::new(RwLock::new(Vec::new())),
            selection_tx: Some(tx),
        };
        (list, rx)
    }

    /// Replaces the entire collection with a fetch result.
    pub async fn replace(&self, items: Vec<Item>) {
        *self.items.write().await = items;
    }

    /// Returns a snapshot copy of the current collection.
    pub async fn items(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    /// Returns the number of visible items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if no items are visible.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Selects the item at `index`, dispatching a copy upward.
    ///
    /// Returns the copy, or `None` if the index is out of range. The copy is
    /// transient: editing it does not touch the buffer or the store.
    pub async fn select(&self, index: usize) -> Option<Item> {
        let item = self.items.read().await.get(index).cloned()?;

        if let Some(tx) = &self.selection_tx {
            let _ = tx.send(item.clone());
        }

        Some(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_and_snapshot() {
        let list = ItemList::new();
        assert!(list.is_empty().await);

        list.replace(vec![Item::with_id(1, "Laptop", 10)]).await;
        assert_eq!(list.len().await, 1);
        assert_eq!(list.items().await[0].name, "Laptop");

        list.replace(vec![]).await;
        assert!(list.is_empty().await);
    }

    #[tokio::test]
    async fn test_select_dispatches_copy() {
        let (list, mut selections) = ItemList::with_selection();
        list.replace(vec![
            Item::with_id(1, "Laptop", 10),
            Item::with_id(2, "Monitor", 7),
        ])
        .await;

        let chosen = list.select(1).await.unwrap();
        assert_eq!(chosen.name, "Monitor");

        let dispatched = selections.recv().await.unwrap();
        assert_eq!(dispatched, chosen);
    }

    #[tokio::test]
    async fn test_select_out_of_range_is_none() {
        let list = ItemList::new();
        assert_eq!(list.select(0).await, None);
    }

    #[tokio::test]
    async fn test_selected_copy_is_disposable() {
        let list = ItemList::new();
        list.replace(vec![Item::with_id(1, "Laptop", 10)]).await;

        let mut copy = list.select(0).await.unwrap();
        copy.adjust_quantity(-10);

        // Buffer is untouched by edits to the copy
        assert_eq!(list.items().await[0].quantity, 10);
    }

    #[tokio::test]
    async fn test_clones_share_buffer() {
        let list = ItemList::new();
        let other = list.clone();

        list.replace(vec![Item::with_id(1, "Laptop", 10)]).await;
        assert_eq!(other.len().await, 1);
    }
}
