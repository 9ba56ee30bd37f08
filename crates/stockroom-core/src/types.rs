//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      Item       │   │      User       │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id (assigned)  │   │  username       │                             │
//! │  │  name           │   │  password_hash  │                             │
//! │  │  quantity (≥0)  │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Item ids are assigned by the store (database row id or server id) and are
//! immutable once set. A freshly created item has `id: None` until stored.

use serde::{Deserialize, Serialize};

use crate::auth::PasswordHash;

// =============================================================================
// Item
// =============================================================================

/// An inventory item.
///
/// Wire shape (JSON): `{ "item_id": 1, "name": "Laptop", "quantity": 10 }`.
/// The presentation layer holds transient, disposable copies; the store owns
/// the canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Store-assigned identifier; `None` until the item is persisted.
    #[serde(rename = "item_id")]
    pub id: Option<i64>,

    /// Display name shown in the inventory list.
    pub name: String,

    /// Units on hand. Never negative after any adjustment.
    pub quantity: i64,
}

impl Item {
    /// Creates a new, not-yet-stored item.
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Item {
            id: None,
            name: name.into(),
            quantity: quantity.max(0),
        }
    }

    /// Creates an item with a known id (e.g. parsed from a server response).
    pub fn with_id(id: i64, name: impl Into<String>, quantity: i64) -> Self {
        Item {
            id: Some(id),
            name: name.into(),
            quantity,
        }
    }

    /// Returns true once the item has been assigned an id by a store.
    #[inline]
    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }

    /// Applies a quantity delta, clamping the result at zero.
    ///
    /// Stepper buttons send `+1`/`-1`; a decrement at zero stays at zero
    /// rather than going negative.
    pub fn adjust_quantity(&mut self, delta: i64) {
        self.quantity = adjust_quantity(self.quantity, delta);
    }
}

/// Applies `delta` to `current`, clamping the result at zero.
#[inline]
pub fn adjust_quantity(current: i64, delta: i64) -> i64 {
    current.saturating_add(delta).max(0)
}

// =============================================================================
// User
// =============================================================================

/// A registered user credential.
///
/// The plaintext password never appears here; only its digest is kept.
/// Credentials are created at registration and never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique login name.
    pub username: String,

    /// SHA-256 digest of the password.
    pub password_hash: PasswordHash,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: PasswordHash) -> Self {
        User {
            username: username.into(),
            password_hash,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_has_no_id() {
        let item = Item::new("Laptop", 10);
        assert_eq!(item.id, None);
        assert!(!item.is_stored());
    }

    #[test]
    fn test_new_item_clamps_negative_quantity() {
        let item = Item::new("Laptop", -5);
        assert_eq!(item.quantity, 0);
    }

    #[test]
    fn test_adjust_quantity_clamps_at_zero() {
        assert_eq!(adjust_quantity(0, -1), 0);
        assert_eq!(adjust_quantity(3, -5), 0);
        assert_eq!(adjust_quantity(3, -3), 0);
        assert_eq!(adjust_quantity(3, 2), 5);
    }

    #[test]
    fn test_item_adjust_quantity() {
        let mut item = Item::with_id(1, "Laptop", 1);
        item.adjust_quantity(-1);
        assert_eq!(item.quantity, 0);
        item.adjust_quantity(-1);
        assert_eq!(item.quantity, 0);
        item.adjust_quantity(4);
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn test_item_wire_shape() {
        let item = Item::with_id(7, "Cable", 3);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "item_id": 7, "name": "Cable", "quantity": 3 })
        );
    }

    #[test]
    fn test_item_wire_roundtrip() {
        let parsed: Item =
            serde_json::from_str(r#"{"item_id":42,"name":"Monitor","quantity":0}"#).unwrap();
        assert_eq!(parsed, Item::with_id(42, "Monitor", 0));
    }
}
