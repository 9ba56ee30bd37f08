//! # User Repository
//!
//! Database operations for user credentials.
//!
//! ## Credential Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Credential Operations                              │
//! │                                                                         │
//! │  Register                              Login                            │
//! │  ────────                              ─────                            │
//! │  insert("alice", "secret123")          verify_credentials(...)          │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  hash_password ── Err? abort ──        hash_password ── Err? abort ──  │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  INSERT (username, digest)             SELECT stored digest            │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  UNIQUE violation → Duplicate          exact equality → true           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A hashing failure aborts the operation before any SQL runs; a failed
//! digest never reaches a comparison.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{hash_password, PasswordHash};

/// Repository for user credential operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Registers a new user, storing only the password digest.
    ///
    /// ## Returns
    /// * `Ok(())` - User stored
    /// * `Err(DbError::UniqueViolation)` - Username already exists
    /// * `Err(DbError::HashFailed)` - Hashing failed, nothing was stored
    pub async fn insert(&self, username: &str, password: &str) -> DbResult<()> {
        let digest = hash_password(password)?;

        debug!(username = %username, "Registering user");

        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?1, ?2)
            "#,
        )
        .bind(username)
        .bind(digest.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Verifies a username/password pair.
    ///
    /// ## Returns
    /// True only if the user exists and the freshly computed digest equals
    /// the stored one. An unknown username is `Ok(false)`, not an error.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> DbResult<bool> {
        let candidate = hash_password(password)?;

        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let Some(stored) = stored else {
            return Ok(false);
        };

        // A malformed stored digest fails closed rather than comparing raw strings.
        let stored = PasswordHash::from_hex(&stored)?;

        Ok(stored == candidate)
    }

    /// Checks whether a username is already taken.
    pub async fn exists(&self, username: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert("alice", "secret123").await.unwrap();

        assert!(repo.verify_credentials("alice", "secret123").await.unwrap());
        assert!(!repo.verify_credentials("alice", "wrong").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_user_is_false_not_error() {
        let db = test_db().await;

        let ok = db.users().verify_credentials("nobody", "pw").await.unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert("alice", "secret123").await.unwrap();
        let err = repo.insert("alice", "other").await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_exists() {
        let db = test_db().await;
        let repo = db.users();

        assert!(!repo.exists("alice").await.unwrap());
        repo.insert("alice", "secret123").await.unwrap();
        assert!(repo.exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_plaintext_is_never_stored() {
        let db = test_db().await;
        db.users().insert("alice", "secret123").await.unwrap();

        let stored: String =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'alice'")
                .fetch_one(db.pool())
                .await
                .unwrap();

        assert_ne!(stored, "secret123");
        assert_eq!(stored.len(), 64);
    }
}
