//! # stockroom-client: Remote API Client and Search Pipeline
//!
//! This crate connects Stockroom to its backend: an authenticated
//! JSON-over-HTTP client, an explicit session context, and the debounced
//! search-and-sync pipeline that keeps the visible item list current.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Search-and-Sync Data Flow                           │
//! │                                                                         │
//! │  keystroke                                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  SearchHandle::set_query ──► debounce window (300 ms, rearmed on       │
//! │      │                       every change; a rearmed window never      │
//! │      │                       fires for the old value)                  │
//! │      ▼                                                                  │
//! │  exactly one fetch for the latest text                                 │
//! │      │                                                                  │
//! │      ├──► ApiClient (remote)  GET /getItems?search=…  (bearer token)   │
//! │      └──► LocalSource (local) LIKE '%…%' over SQLite                   │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  completion carries a generation number                                │
//! │      │                                                                  │
//! │      ├── newest generation → replace ItemList, notify listener         │
//! │      └── superseded        → discarded silently                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST client (register, login, item CRUD, search)
//! - [`session`] - Explicit login session (token + role), passed to the client
//! - [`search`] - Debounce/supersede pipeline over an [`search::ItemSource`]
//! - [`list`] - Visible item buffer + selection dispatch
//! - [`local`] - SQLite-backed item source for the offline revision
//! - [`config`] - Base URL, timeout, and debounce configuration
//! - [`error`] - Client error taxonomy (rejection vs transport, distinctly)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod list;
pub mod local;
pub mod search;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use list::ItemList;
pub use local::LocalSource;
pub use search::{
    ItemSource, SearchConfig, SearchHandle, SearchListener, SearchPipeline, SearchState,
};
pub use session::Session;
