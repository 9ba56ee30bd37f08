//! # Login Session
//!
//! Explicit session context holding the bearer token and user role.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Lifecycle                                │
//! │                                                                         │
//! │  (absent) ──► login succeeds ──► establish(token, role)                │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │              every authenticated call reads token()                    │
//! │                                       │                                 │
//! │              next login overwrites ◄──┤                                 │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                    clear() (logout) ──► (absent)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is an explicit object passed to every component that needs
//! the token; nothing here is process-global. Token expiry is server-enforced
//! only - the client treats the token as opaque and keeps no expiry clock.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Data held for an established session.
#[derive(Debug, Clone)]
pub struct SessionData {
    /// Opaque bearer token issued by the server at login.
    pub token: String,
    /// Role the server assigned to the user (e.g. "user", "admin").
    pub role: Option<String>,
    /// When the session was established.
    pub logged_in_at: DateTime<Utc>,
}

/// Cloneable handle to the current session.
///
/// All clones share the same state: establishing or clearing the session
/// through one handle is visible through every other.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<SessionData>>>,
}

impl Session {
    /// Creates an empty (logged-out) session.
    pub fn new() -> Self {
        Session::default()
    }

    /// Establishes the session after a successful login.
    ///
    /// Overwrites any previous session data.
    pub async fn establish(&self, token: impl Into<String>, role: Option<String>) {
        let data = SessionData {
            token: token.into(),
            role,
            logged_in_at: Utc::now(),
        };

        info!(role = ?data.role, "Session established");
        *self.inner.write().await = Some(data);
    }

    /// Returns the bearer token, if logged in.
    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.token.clone())
    }

    /// Returns the user's role, if logged in and assigned.
    pub async fn role(&self) -> Option<String> {
        self.inner.read().await.as_ref().and_then(|s| s.role.clone())
    }

    /// Returns when the current session was established.
    pub async fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.as_ref().map(|s| s.logged_in_at)
    }

    /// Returns true if a session is established.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Clears the session (logout).
    pub async fn clear(&self) {
        info!("Session cleared");
        *self.inner.write().await = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_logged_out() {
        let session = Session::new();
        assert!(!session.is_authenticated().await);
        assert_eq!(session.token().await, None);
        assert_eq!(session.role().await, None);
    }

    #[tokio::test]
    async fn test_establish_and_read() {
        let session = Session::new();
        session.establish("tok-123", Some("admin".into())).await;

        assert!(session.is_authenticated().await);
        assert_eq!(session.token().await.as_deref(), Some("tok-123"));
        assert_eq!(session.role().await.as_deref(), Some("admin"));
        assert!(session.logged_in_at().await.is_some());
    }

    #[tokio::test]
    async fn test_next_login_overwrites() {
        let session = Session::new();
        session.establish("tok-1", Some("user".into())).await;
        session.establish("tok-2", None).await;

        assert_eq!(session.token().await.as_deref(), Some("tok-2"));
        assert_eq!(session.role().await, None);
    }

    #[tokio::test]
    async fn test_clear() {
        let session = Session::new();
        session.establish("tok-123", None).await;
        session.clear().await;

        assert!(!session.is_authenticated().await);
        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let session = Session::new();
        let other = session.clone();

        session.establish("tok-123", None).await;
        assert_eq!(other.token().await.as_deref(), Some("tok-123"));

        other.clear().await;
        assert!(!session.is_authenticated().await);
    }
}
