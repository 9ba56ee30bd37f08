//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! This crate is the **heart** of Stockroom. It contains the domain types and
//! all pure logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockroom Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       apps/cli                                  │   │
//! │  │    register, login, items list/search/add/update/delete        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          stockroom-db            stockroom-client               │   │
//! │  │    SQLite repositories      REST client + search pipeline       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────────────────┐    │   │
//! │  │   │   types   │  │   auth    │  │      validation        │    │   │
//! │  │   │   Item    │  │  hashing  │  │        rules           │    │   │
//! │  │   │   User    │  │  verify   │  │       checks           │    │   │
//! │  │   └───────────┘  └───────────┘  └────────────────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, User, quantity adjustment)
//! - [`auth`] - Credential hashing (SHA-256, explicit failure)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **No Ambient State**: Callers pass context in; nothing is process-global

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockroom_core::Item` instead of
// `use stockroom_core::types::Item`

pub use auth::{hash_password, HashError, PasswordHash};
pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an item name.
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 50;

/// Maximum length of a password (plaintext, before hashing).
///
/// ## Why a limit?
/// The hash input is unbounded in principle, but accepting megabytes of
/// "password" is a denial-of-service vector on the hashing path. Real
/// passwords fit comfortably under this cap.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Maximum length of a search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Maximum quantity a single item record can hold.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;
